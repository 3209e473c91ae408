use crate::{
    credentials::Credential,
    error::{Result, StudioError},
    models::{
        AspectRatio, EnhanceRequest, ImageModel, ImageRequest, ENHANCE_SYSTEM_INSTRUCTION,
        ENHANCE_TEMPERATURE, ENHANCE_TOP_P, FROM_SCRATCH_INSTRUCTION, IMAGE_COUNT,
        OUTPUT_MIME_TYPE,
    },
};

pub fn build_image_request(
    prompt: &str,
    aspect_ratio: AspectRatio,
    model_id: &str,
    credential: &Credential,
) -> Result<ImageRequest> {
    if credential.is_empty() {
        return Err(StudioError::MissingCredential);
    }
    if prompt.trim().is_empty() {
        return Err(StudioError::EmptyPrompt);
    }
    if !ImageModel::is_supported(model_id) {
        return Err(StudioError::UnsupportedModel(model_id.to_string()));
    }

    Ok(ImageRequest {
        prompt: prompt.to_string(),
        aspect_ratio,
        model_id: model_id.to_string(),
        number_of_images: IMAGE_COUNT,
        output_mime_type: OUTPUT_MIME_TYPE,
    })
}

/// An empty seed is valid and asks the model for a concept of its own.
pub fn build_enhance_request(seed: &str, credential: &Credential) -> Result<EnhanceRequest> {
    if credential.is_empty() {
        return Err(StudioError::MissingCredential);
    }

    let contents = if seed.trim().is_empty() {
        FROM_SCRATCH_INSTRUCTION.to_string()
    } else {
        seed.to_string()
    };

    Ok(EnhanceRequest {
        contents,
        system_instruction: ENHANCE_SYSTEM_INSTRUCTION,
        temperature: ENHANCE_TEMPERATURE,
        top_p: ENHANCE_TOP_P,
    })
}
