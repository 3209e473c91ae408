use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    Tall,
}

impl AspectRatio {
    pub fn all() -> &'static [AspectRatio] {
        &[
            AspectRatio::Square,
            AspectRatio::Landscape,
            AspectRatio::Portrait,
            AspectRatio::Standard,
            AspectRatio::Tall,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Standard => "4:3",
            AspectRatio::Tall => "3:4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Square",
            AspectRatio::Landscape => "Landscape",
            AspectRatio::Portrait => "Portrait",
            AspectRatio::Standard => "Standard",
            AspectRatio::Tall => "Tall",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AspectRatio::all()
            .iter()
            .copied()
            .find(|ratio| ratio.as_str() == wanted || ratio.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StudioError::InvalidAspectRatio(s.to_string()))
    }
}

/// Image engines offered to the user. Only one is reachable through the API;
/// the rest are listed as disabled choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageModel {
    pub id: &'static str,
    pub name: &'static str,
    pub enabled: bool,
}

pub const SUPPORTED_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

pub const IMAGE_MODELS: [ImageModel; 4] = [
    ImageModel {
        id: SUPPORTED_IMAGE_MODEL,
        name: "Imagen 4",
        enabled: true,
    },
    ImageModel {
        id: "imagen-4-fast",
        name: "Imagen 4 Fast",
        enabled: false,
    },
    ImageModel {
        id: "imagen-4-ultra",
        name: "Imagen 4 Ultra",
        enabled: false,
    },
    ImageModel {
        id: "imagen-3",
        name: "Imagen 3",
        enabled: false,
    },
];

impl ImageModel {
    pub fn catalog() -> &'static [ImageModel] {
        &IMAGE_MODELS
    }

    pub fn find(id: &str) -> Option<&'static ImageModel> {
        IMAGE_MODELS.iter().find(|model| model.id == id)
    }

    pub fn is_supported(id: &str) -> bool {
        id == SUPPORTED_IMAGE_MODEL
    }
}
