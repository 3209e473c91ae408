pub mod http;
pub mod normalize;
pub mod request;

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::StudioConfig,
    credentials::Credential,
    error::{Result, StudioError},
    logger,
    models::{decode_data_uri, AspectRatio, ContentPayload, EnhanceRequest, ImageRequest, ImagesPayload},
};

pub use http::GeminiHttpBackend;
pub use normalize::{classify_failure, extract_error_message, normalize_images, normalize_text};
pub use request::{build_enhance_request, build_image_request};

/// Failure as raised by the generative service client, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    Message(String),
    /// Failure carrying no readable message.
    Opaque,
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawFailure::Message(message) => f.write_str(message),
            RawFailure::Opaque => f.write_str("<no message>"),
        }
    }
}

/// The two operations consumed from the hosted generative service.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_images(
        &self,
        credential: &Credential,
        request: &ImageRequest,
    ) -> std::result::Result<ImagesPayload, RawFailure>;

    async fn generate_content(
        &self,
        credential: &Credential,
        request: &EnhanceRequest,
    ) -> std::result::Result<ContentPayload, RawFailure>;
}

#[derive(Clone)]
pub struct StudioClient {
    backend: Arc<dyn GenerativeBackend>,
}

impl StudioClient {
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let backend = GeminiHttpBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    pub fn with_backend(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Returns one PNG data URI per generated image, in service order.
    pub async fn generate_images(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        model_id: &str,
        credential: &Credential,
    ) -> Result<Vec<String>> {
        let request = build_image_request(prompt, aspect_ratio, model_id, credential)?;
        let request_id = Uuid::new_v4();

        log::info!(
            "[req:{}] Generating {} images with {} at {}",
            request_id,
            request.number_of_images,
            request.model_id,
            request.aspect_ratio
        );
        log::debug!("[req:{}] Prompt: {}", request_id, request.prompt);

        let outcome = {
            let _timer = logger::timer(format!("[req:{}] image generation", request_id));
            self.backend.generate_images(credential, &request).await
        };

        let images = outcome
            .map_err(normalize::normalize_failure)
            .and_then(normalize_images)?;
        log::info!("[req:{}] ✅ Received {} images", request_id, images.len());
        Ok(images)
    }

    pub async fn enhance_prompt(&self, seed: &str, credential: &Credential) -> Result<String> {
        let request = build_enhance_request(seed, credential)?;
        let request_id = Uuid::new_v4();

        log::info!("[req:{}] Enhancing prompt ({} chars)", request_id, seed.len());

        let outcome = {
            let _timer = logger::timer(format!("[req:{}] prompt enhancement", request_id));
            self.backend.generate_content(credential, &request).await
        };

        let text = outcome
            .map_err(normalize::normalize_failure)
            .and_then(normalize_text)?;
        log::info!("[req:{}] ✅ Enhanced prompt ready ({} chars)", request_id, text.len());
        Ok(text)
    }
}

/// Writes each data URI to `generated-image-<n>.png` under `dir`, numbering from 1.
pub async fn save_images(dir: &Path, uris: &[String]) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StudioError::StorageError(e.to_string()))?;

    let mut written = Vec::with_capacity(uris.len());
    for (index, uri) in uris.iter().enumerate() {
        let bytes = decode_data_uri(uri)?;
        let path = dir.join(format!("generated-image-{}.png", index + 1));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StudioError::StorageError(format!("{}: {}", path.display(), e)))?;
        log::debug!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}
