use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{Result, ServiceError, StudioError},
    gemini::RawFailure,
    models::{ContentPayload, ImagesPayload},
};

/// `[429] {"error":{...}}` as embedded by the client in failure messages.
static EMBEDDED_ERROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d{3}\]\s*(\{.*\})").expect("embedded error pattern"));

struct ClassificationRule {
    matches: fn(&str) -> bool,
    kind: ServiceError,
}

/// Evaluated top to bottom, first match wins. A message mentioning both
/// quota and billing is a quota failure.
const CLASSIFICATION_RULES: [ClassificationRule; 4] = [
    ClassificationRule {
        matches: |m| m.contains("api key not valid"),
        kind: ServiceError::InvalidCredential,
    },
    ClassificationRule {
        matches: |m| m.contains("permission denied") || m.contains("origin"),
        kind: ServiceError::PermissionOrOriginRestricted,
    },
    ClassificationRule {
        matches: |m| m.contains("quota"),
        kind: ServiceError::QuotaExceeded,
    },
    ClassificationRule {
        matches: |m| m.contains("billing"),
        kind: ServiceError::BillingRequired,
    },
];

pub fn normalize_images(payload: ImagesPayload) -> Result<Vec<String>> {
    if payload.generated_images.is_empty() {
        return Err(StudioError::EmptyResult(
            "The AI model did not return any valid images.".to_string(),
        ));
    }

    Ok(payload
        .generated_images
        .iter()
        .map(|image| image.to_data_uri())
        .collect())
}

pub fn normalize_text(payload: ContentPayload) -> Result<String> {
    match payload.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(StudioError::EmptyResult(
            "The AI model did not return any text.".to_string(),
        )),
    }
}

/// Pulls `error.message` out of an embedded JSON fragment, or returns the message unchanged.
pub fn extract_error_message(message: &str) -> String {
    let inner = EMBEDDED_ERROR
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|json| serde_json::from_str::<serde_json::Value>(json.as_str()).ok())
        .and_then(|value| {
            value["error"]["message"]
                .as_str()
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        });

    inner.unwrap_or_else(|| message.to_string())
}

pub fn classify_failure(failure: &RawFailure) -> ServiceError {
    let message = match failure {
        RawFailure::Message(message) => extract_error_message(message).to_lowercase(),
        RawFailure::Opaque => return ServiceError::Unclassified,
    };

    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.matches)(&message))
        .map(|rule| rule.kind)
        .unwrap_or(ServiceError::Unclassified)
}

pub fn normalize_failure(failure: RawFailure) -> StudioError {
    log::error!("Gemini service error: {}", failure);
    StudioError::Service(classify_failure(&failure))
}
