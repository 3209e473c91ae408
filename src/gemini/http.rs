use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    config::StudioConfig,
    credentials::Credential,
    error::{Result, StudioError},
    gemini::{GenerativeBackend, RawFailure},
    models::{
        ContentPayload, EnhanceRequest, GenerateContentRequest, GenerateContentResponse,
        GeneratedImage, ImageRequest, ImagesPayload, PredictRequest, PredictResponse,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Talks to the Generative Language REST API.
#[derive(Clone)]
pub struct GeminiHttpBackend {
    client: Client,
    base_url: String,
    text_model: String,
}

impl GeminiHttpBackend {
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StudioError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
        })
    }

    fn predict_url(&self, model_id: &str) -> String {
        format!("{}/models/{}:predict", self.base_url, model_id)
    }

    fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.text_model)
    }

    fn build_headers(credential: &Credential) -> std::result::Result<HeaderMap, RawFailure> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(credential.expose())
            .map_err(|e| RawFailure::Message(format!("API key not valid: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    async fn post_json<B, R>(
        &self,
        url: &str,
        credential: &Credential,
        body: &B,
    ) -> std::result::Result<R, RawFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .headers(Self::build_headers(credential)?)
            .json(body)
            .send()
            .await
            .map_err(|e| RawFailure::Message(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RawFailure::Message(e.to_string()))?;

        if !status.is_success() {
            return Err(failure_from_status(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| RawFailure::Message(format!("Failed to parse service response: {}", e)))
    }
}

/// Embeds the status code and body the way the normalizer expects: `[<code>] <body>`.
pub(crate) fn failure_from_status(status: StatusCode, body: &str) -> RawFailure {
    let body = body.trim();
    if body.is_empty() {
        RawFailure::Message(format!(
            "[{}] {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown status")
        ))
    } else {
        RawFailure::Message(format!("[{}] {}", status.as_u16(), body))
    }
}

/// Filtered predictions carry no bytes and are dropped.
pub(crate) fn images_from_predictions(
    response: PredictResponse,
) -> std::result::Result<ImagesPayload, RawFailure> {
    let mut generated_images = Vec::with_capacity(response.predictions.len());
    for prediction in response.predictions {
        match prediction.bytes_base64_encoded {
            Some(encoded) => {
                let bytes = STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| RawFailure::Message(format!("Invalid image payload: {}", e)))?;
                generated_images.push(GeneratedImage::new(bytes));
            }
            None => {
                log::warn!(
                    "Dropping prediction without image data (reason: {})",
                    prediction.rai_filtered_reason.as_deref().unwrap_or("none")
                );
            }
        }
    }
    Ok(ImagesPayload { generated_images })
}

#[async_trait]
impl GenerativeBackend for GeminiHttpBackend {
    async fn generate_images(
        &self,
        credential: &Credential,
        request: &ImageRequest,
    ) -> std::result::Result<ImagesPayload, RawFailure> {
        let body = PredictRequest::from(request);
        let response: PredictResponse = self
            .post_json(&self.predict_url(&request.model_id), credential, &body)
            .await?;
        images_from_predictions(response)
    }

    async fn generate_content(
        &self,
        credential: &Credential,
        request: &EnhanceRequest,
    ) -> std::result::Result<ContentPayload, RawFailure> {
        let body = GenerateContentRequest::from(request);
        let response: GenerateContentResponse = self
            .post_json(&self.generate_content_url(), credential, &body)
            .await?;
        Ok(ContentPayload {
            text: response.text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::gemini::classify_failure;

    fn backend() -> GeminiHttpBackend {
        let config = StudioConfig::new()
            .with_base_url("https://example.test/v1beta/")
            .with_text_model("gemini-2.5-flash");
        GeminiHttpBackend::new(&config).unwrap()
    }

    #[test]
    fn endpoints_are_built_from_config() {
        let backend = backend();
        assert_eq!(
            backend.predict_url("imagen-4.0-generate-001"),
            "https://example.test/v1beta/models/imagen-4.0-generate-001:predict"
        );
        assert_eq!(
            backend.generate_content_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn headers_carry_api_key() {
        let headers = GeminiHttpBackend::build_headers(&Credential::new("AIza-1")).unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "AIza-1");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn status_failures_feed_the_classifier() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let failure = failure_from_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(failure, RawFailure::Message(format!("[400] {}", body)));
        assert_eq!(classify_failure(&failure), ServiceError::InvalidCredential);
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        let failure = failure_from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            failure,
            RawFailure::Message("[503] Service Unavailable".to_string())
        );
        assert_eq!(classify_failure(&failure), ServiceError::Unclassified);
    }

    #[test]
    fn predictions_decode_and_filtered_ones_drop() {
        let body = r#"{"predictions":[
            {"bytesBase64Encoded":"AQI=","mimeType":"image/png"},
            {"raiFilteredReason":"blocked"},
            {"bytesBase64Encoded":"AwQ=","mimeType":"image/png"}
        ]}"#;
        let response: PredictResponse = serde_json::from_str(body).unwrap();
        let payload = images_from_predictions(response).unwrap();
        assert_eq!(payload.generated_images.len(), 2);
        assert_eq!(payload.generated_images[0].image_bytes, vec![1, 2]);
        assert_eq!(payload.generated_images[1].image_bytes, vec![3, 4]);
    }

    #[test]
    fn corrupt_prediction_is_a_failure() {
        let body = r#"{"predictions":[{"bytesBase64Encoded":"%%%"}]}"#;
        let response: PredictResponse = serde_json::from_str(body).unwrap();
        assert!(images_from_predictions(response).is_err());
    }
}
