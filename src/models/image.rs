use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};
use crate::models::AspectRatio;

pub const IMAGE_COUNT: u32 = 4;
pub const OUTPUT_MIME_TYPE: &str = "image/png";
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Validated image generation call, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub model_id: String,
    pub number_of_images: u32,
    pub output_mime_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub image_bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn new(image_bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            image_bytes: image_bytes.into(),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(&self.image_bytes))
    }
}

/// Successful image generation outcome as returned by a backend.
#[derive(Debug, Clone, Default)]
pub struct ImagesPayload {
    pub generated_images: Vec<GeneratedImage>,
}

/// Recovers the PNG bytes from a data URI produced by `GeneratedImage::to_data_uri`.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let encoded = uri.strip_prefix(PNG_DATA_URI_PREFIX).ok_or_else(|| {
        StudioError::SerializationError("Not a PNG data URI".to_string())
    })?;
    STANDARD
        .decode(encoded)
        .map_err(|e| StudioError::SerializationError(e.to_string()))
}

// Imagen `:predict` wire format

#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
    pub aspect_ratio: AspectRatio,
    pub output_options: PredictOutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictOutputOptions {
    pub mime_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
    pub rai_filtered_reason: Option<String>,
}

impl From<&ImageRequest> for PredictRequest {
    fn from(request: &ImageRequest) -> Self {
        PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: request.number_of_images,
                aspect_ratio: request.aspect_ratio,
                output_options: PredictOutputOptions {
                    mime_type: request.output_mime_type.to_string(),
                },
            },
        }
    }
}
