//! Prompt-to-image client for Google's generative AI API.
//!
//! [`StudioClient`] validates a request, sends it through a [`GenerativeBackend`]
//! and turns whatever comes back into PNG data URIs, an enhanced prompt, or one
//! of a fixed set of user-facing errors.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;

pub use config::StudioConfig;
pub use credentials::{
    resolve_credential, store_api_key, Credential, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, GEMINI_API_KEY_SLOT,
};
pub use error::{Result, ServiceError, StudioError};
pub use gemini::{save_images, GeminiHttpBackend, GenerativeBackend, RawFailure, StudioClient};
pub use models::{AspectRatio, ImageModel, SUPPORTED_IMAGE_MODEL};
