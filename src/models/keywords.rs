/// A group of quick-add keywords shown next to the prompt enhancer.
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub keywords: &'static [&'static str],
}

pub const QUICK_ELEMENTS: [KeywordGroup; 4] = [
    KeywordGroup {
        id: "lighting",
        title: "LIGHTING",
        keywords: &[
            "Soft studio light",
            "Golden hour sunlight",
            "Dramatic rim lighting",
            "Neon glow",
            "Chiaroscuro lighting",
            "Moonlight",
        ],
    },
    KeywordGroup {
        id: "lens",
        title: "LENS & CAMERA EFFECTS",
        keywords: &[
            "85mm f/1.4 lens",
            "35mm lens",
            "Cinematic bokeh",
            "Shallow depth of field",
            "Motion blur",
            "Fisheye lens effect",
        ],
    },
    KeywordGroup {
        id: "style",
        title: "STYLE & AESTHETICS",
        keywords: &[
            "Vintage film look",
            "Sci-fi aesthetic",
            "Minimalist composition",
            "Hyperrealistic detail",
            "Impressionistic style",
            "Gothic fashion",
        ],
    },
    KeywordGroup {
        id: "mood",
        title: "MOOD & EMOTION",
        keywords: &[
            "Serene and contemplative",
            "Energetic and joyful",
            "Mysterious and enigmatic",
            "Powerful and confident",
            "Dreamy and ethereal",
            "Playful and whimsical",
        ],
    },
];

pub fn find_group(id: &str) -> Option<&'static KeywordGroup> {
    QUICK_ELEMENTS.iter().find(|group| group.id == id)
}

pub fn append_keyword(seed: &str, keyword: &str) -> String {
    if seed.is_empty() {
        keyword.to_string()
    } else {
        format!("{}, {}", seed, keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appending_builds_comma_list() {
        let seed = append_keyword("", "Neon glow");
        assert_eq!(seed, "Neon glow");
        let seed = append_keyword(&seed, "35mm lens");
        assert_eq!(seed, "Neon glow, 35mm lens");
    }

    #[test]
    fn every_group_has_six_keywords() {
        for group in QUICK_ELEMENTS.iter() {
            assert_eq!(group.keywords.len(), 6, "{}", group.id);
        }
        assert_eq!(find_group("mood").unwrap().title, "MOOD & EMOTION");
        assert!(find_group("colour").is_none());
    }
}
