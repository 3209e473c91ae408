use thiserror::Error;

/// Classified failure of the external generative service.
///
/// Only the classification is kept; the raw failure never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    InvalidCredential,
    PermissionOrOriginRestricted,
    QuotaExceeded,
    BillingRequired,
    Unclassified,
}

impl ServiceError {
    pub fn message(&self) -> &'static str {
        match self {
            ServiceError::InvalidCredential => {
                "The API key is invalid. Please check your key and try again."
            }
            ServiceError::PermissionOrOriginRestricted => {
                "API request blocked. Your API key may have domain restrictions. Please check your Google Cloud Console to ensure your domain is whitelisted."
            }
            ServiceError::QuotaExceeded => {
                "You have exceeded your API quota. Please check your usage limits in your Google Cloud account."
            }
            ServiceError::BillingRequired => {
                "This model requires a project with active billing. Please ensure billing is enabled for your Google Cloud project."
            }
            ServiceError::Unclassified => {
                "Failed to communicate with the AI service. The service may be busy or the prompt may have been blocked."
            }
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("API Key is missing. Please set your Gemini API key.")]
    MissingCredential,
    #[error("Prompt cannot be empty.")]
    EmptyPrompt,
    #[error("Unsupported model for image generation: {0}")]
    UnsupportedModel(String),
    #[error("Unsupported aspect ratio: {0}")]
    InvalidAspectRatio(String),
    #[error("{0}")]
    EmptyResult(String),
    #[error("{0}")]
    Service(ServiceError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StudioError {
    /// True for errors raised before any request left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            StudioError::MissingCredential
                | StudioError::EmptyPrompt
                | StudioError::UnsupportedModel(_)
                | StudioError::InvalidAspectRatio(_)
        )
    }

    pub fn service_kind(&self) -> Option<ServiceError> {
        match self {
            StudioError::Service(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<ServiceError> for StudioError {
    fn from(kind: ServiceError) -> Self {
        StudioError::Service(kind)
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_display_fixed_text() {
        let err = StudioError::from(ServiceError::QuotaExceeded);
        assert_eq!(
            err.to_string(),
            "You have exceeded your API quota. Please check your usage limits in your Google Cloud account."
        );
        assert_eq!(err.service_kind(), Some(ServiceError::QuotaExceeded));
    }

    #[test]
    fn local_errors_are_flagged() {
        assert!(StudioError::MissingCredential.is_local());
        assert!(StudioError::EmptyPrompt.is_local());
        assert!(StudioError::UnsupportedModel("imagen-3".into()).is_local());
        assert!(!StudioError::EmptyResult("none".into()).is_local());
        assert!(!StudioError::Service(ServiceError::Unclassified).is_local());
    }

    #[test]
    fn unsupported_model_names_the_model() {
        let err = StudioError::UnsupportedModel("imagen-4-ultra".into());
        assert_eq!(
            err.to_string(),
            "Unsupported model for image generation: imagen-4-ultra"
        );
    }
}
