use serde::{Deserialize, Serialize};

/// Filters the external editor knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Brightness,
    Sharpen,
    Grayscale,
    Invert,
    Sepia,
    Pixelate,
    Blur,
    Noise,
    ColorFilter,
    RemoveWhite,
}

const CANONICAL_KEYS: &[(&str, FilterKind)] = &[
    ("brightness", FilterKind::Brightness),
    ("sharpen", FilterKind::Sharpen),
    ("grayscale", FilterKind::Grayscale),
    ("invert", FilterKind::Invert),
    ("sepia", FilterKind::Sepia),
    ("pixelate", FilterKind::Pixelate),
    ("blur", FilterKind::Blur),
    ("noise", FilterKind::Noise),
    ("colorfilter", FilterKind::ColorFilter),
    ("removewhite", FilterKind::RemoveWhite),
];

// Keys are already stripped of case and separators.
const ALIASES: &[(&str, &str)] = &[
    ("removewhite", "removewhite"),
    ("white", "removewhite"),
    ("colorfilter", "colorfilter"),
    ("color", "colorfilter"),
    ("tint", "colorfilter"),
    ("threshold", "colorfilter"),
    ("blackandwhite", "grayscale"),
    ("greyscale", "grayscale"),
    ("monochrome", "grayscale"),
    ("bw", "grayscale"),
    ("exposure", "brightness"),
    ("sharpness", "sharpen"),
    ("grain", "noise"),
    ("pixel", "pixelate"),
    ("mosaic", "pixelate"),
    ("negative", "invert"),
];

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Brightness,
        FilterKind::Sharpen,
        FilterKind::Grayscale,
        FilterKind::Invert,
        FilterKind::Sepia,
        FilterKind::Pixelate,
        FilterKind::Blur,
        FilterKind::Noise,
        FilterKind::ColorFilter,
        FilterKind::RemoveWhite,
    ];

    /// Name passed to the editor's apply/remove filter calls.
    pub fn identifier(self) -> &'static str {
        match self {
            FilterKind::Brightness => "brightness",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Invert => "invert",
            FilterKind::Sepia => "sepia",
            FilterKind::Pixelate => "pixelate",
            FilterKind::Blur => "blur",
            FilterKind::Noise => "noise",
            FilterKind::ColorFilter => "colorFilter",
            FilterKind::RemoveWhite => "removeWhite",
        }
    }

    /// Filters that take no parameters and behave as on/off toggles.
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            FilterKind::Sharpen | FilterKind::Grayscale | FilterKind::Invert | FilterKind::Sepia
        )
    }

    fn from_canonical_key(key: &str) -> Option<Self> {
        CANONICAL_KEYS
            .iter()
            .find(|(canonical, _)| *canonical == key)
            .map(|(_, kind)| *kind)
    }
}

/// Lower-cases and drops whitespace, `-` and `_` so "Color Filter",
/// "color-filter" and "color_filter" share one key.
pub fn normalize_tool_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_')
        .collect()
}

pub fn resolve_canonical_name(raw: &str) -> Option<FilterKind> {
    let key = normalize_tool_key(raw);
    if key.is_empty() {
        return None;
    }
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key.as_str());
    FilterKind::from_canonical_key(canonical)
}
