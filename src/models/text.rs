use serde::{Deserialize, Serialize};

pub const ENHANCE_TEMPERATURE: f32 = 0.8;
pub const ENHANCE_TOP_P: f32 = 0.9;

/// Stands in for an empty idea so the model invents a concept of its own.
pub const FROM_SCRATCH_INSTRUCTION: &str =
    "generate a creative model photography concept from scratch";

pub const ENHANCE_SYSTEM_INSTRUCTION: &str = "You are an expert prompt writer for AI model photography. \
Rewrite the user's idea into a single, richly detailed image generation prompt. \
Add concrete photographic detail: the lighting setup, the camera lens and depth of field, \
the model's wardrobe and styling, the emotion on the model's face, and the background or location. \
Respond with only the resulting prompt text, with no preamble, title, quotes or explanation.";

#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceRequest {
    pub contents: String,
    pub system_instruction: &'static str,
    pub temperature: f32,
    pub top_p: f32,
}

/// Successful text generation outcome as returned by a backend.
#[derive(Debug, Clone, Default)]
pub struct ContentPayload {
    pub text: Option<String>,
}

// Gemini `:generateContent` wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate. `None` when there are none.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let parts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

impl From<&EnhanceRequest> for GenerateContentRequest {
    fn from(request: &EnhanceRequest) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.contents.clone()),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(request.system_instruction.to_string()),
                }],
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
            },
        }
    }
}
