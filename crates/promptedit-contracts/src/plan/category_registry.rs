use super::types::{ControlKind, ToolSuggestion};

#[derive(Clone, Copy, Debug)]
pub struct SuggestionSpec {
    pub name: &'static str,
    pub value: &'static str,
    pub percent: u8,
    pub reason: &'static str,
    pub control: ControlKind,
}

impl SuggestionSpec {
    const fn slider(
        name: &'static str,
        value: &'static str,
        percent: u8,
        reason: &'static str,
    ) -> Self {
        Self {
            name,
            value,
            percent,
            reason,
            control: ControlKind::Slider,
        }
    }

    const fn checkbox(name: &'static str, reason: &'static str) -> Self {
        Self {
            name,
            value: "On",
            percent: 100,
            reason,
            control: ControlKind::Checkbox,
        }
    }

    pub fn to_suggestion(&self) -> ToolSuggestion {
        ToolSuggestion {
            name: self.name.to_string(),
            value: self.value.to_string(),
            percent: self.percent,
            reason: self.reason.to_string(),
            control: self.control,
        }
    }
}

/// A mood/style category. A prompt matches when its lower-cased text contains
/// any keyword.
#[derive(Clone, Copy, Debug)]
pub struct CategorySpec {
    pub keywords: &'static [&'static str],
    pub suggestions: &'static [SuggestionSpec],
}

impl CategorySpec {
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

// Order matters: earlier categories win when two suggest the same tool.
pub const CATEGORIES: &[CategorySpec] = &[
    // cinematic
    CategorySpec {
        keywords: &[
            "cinematic",
            "movie",
            "film look",
            "teal and orange",
            "golden hour",
        ],
        suggestions: &[
            SuggestionSpec::slider(
                "Brightness",
                "+8",
                50,
                "Lifts exposure slightly while keeping contrast.",
            ),
            SuggestionSpec::slider(
                "Color Filter",
                "Warm 22",
                70,
                "Adds warm highlights for a cinematic tone.",
            ),
            SuggestionSpec::slider(
                "Sharpen",
                "+10",
                65,
                "Brings out edge detail like a graded film still.",
            ),
            SuggestionSpec::slider(
                "Noise",
                "+6",
                40,
                "Adds subtle grain for a film-like texture.",
            ),
        ],
    },
    // aesthetic
    CategorySpec {
        keywords: &["pinterest", "aesthetic", "pinteresty", "soft vibe", "cozy"],
        suggestions: &[
            SuggestionSpec::slider(
                "Brightness",
                "+12",
                65,
                "Brightens the scene for a soft, airy feel.",
            ),
            SuggestionSpec::slider(
                "Color Filter",
                "Warm 18",
                60,
                "Adds gentle warmth for a friendly aesthetic.",
            ),
            SuggestionSpec::slider(
                "Blur",
                "2",
                25,
                "Softens edges slightly for a dreamy look.",
            ),
        ],
    },
    // moody
    CategorySpec {
        keywords: &["moody", "dark vibe", "dramatic shadows", "low key"],
        suggestions: &[
            SuggestionSpec::slider(
                "Brightness",
                "-10",
                60,
                "Pulls the image darker for moodier contrast.",
            ),
            SuggestionSpec::slider(
                "Color Filter",
                "Cool 18",
                55,
                "Shifts tones cooler for a moody palette.",
            ),
            SuggestionSpec::slider(
                "Sharpen",
                "+8",
                45,
                "Keeps details crisp in the shadows.",
            ),
        ],
    },
    // dreamy
    CategorySpec {
        keywords: &["dreamy", "soft", "hazy", "ethereal"],
        suggestions: &[
            SuggestionSpec::slider(
                "Blur",
                "4",
                40,
                "Softens edges for a dreamy, hazy feel.",
            ),
            SuggestionSpec::slider(
                "Brightness",
                "+6",
                40,
                "Gently lifts exposure to keep it light.",
            ),
        ],
    },
    // film
    CategorySpec {
        keywords: &["film", "grainy", "analog", "retro"],
        suggestions: &[
            SuggestionSpec::slider(
                "Noise",
                "+12",
                70,
                "Adds visible grain for an analog feel.",
            ),
            SuggestionSpec::slider(
                "Color Filter",
                "Warm 20",
                60,
                "Warms tones like classic film stocks.",
            ),
            SuggestionSpec::slider(
                "Fade",
                "+8",
                50,
                "Softens blacks for a faded film look.",
            ),
        ],
    },
    // vibrant
    CategorySpec {
        keywords: &["vibrant", "vivid", "pop", "color", "colorful", "saturat"],
        suggestions: &[
            SuggestionSpec::slider(
                "Color Filter",
                "Warm 20",
                65,
                "Boosts color energy without clipping highlights.",
            ),
            SuggestionSpec::slider(
                "Brightness",
                "+12",
                55,
                "Lifts midtones for a cleaner, brighter feel.",
            ),
            SuggestionSpec::slider(
                "Sharpen",
                "+8",
                40,
                "Adds clarity so details feel crisper.",
            ),
        ],
    },
    // underexposed
    CategorySpec {
        keywords: &[
            "dark",
            "dim",
            "underexposed",
            "brighten",
            "exposure",
            "lighten",
        ],
        suggestions: &[SuggestionSpec::slider(
            "Brightness",
            "+18",
            70,
            "Raises overall exposure for readability.",
        )],
    },
    // soft
    CategorySpec {
        keywords: &["soft", "dreamy", "haze"],
        suggestions: &[SuggestionSpec::slider(
            "Blur",
            "4",
            25,
            "Softens harsh edges for a dreamy look.",
        )],
    },
    // sharp
    CategorySpec {
        keywords: &["sharp", "clarity", "detail"],
        suggestions: &[SuggestionSpec::slider(
            "Sharpen",
            "+14",
            75,
            "Improves micro-contrast on edges.",
        )],
    },
    // grainy
    CategorySpec {
        keywords: &["grain", "noise", "film"],
        suggestions: &[SuggestionSpec::slider(
            "Noise",
            "+10",
            55,
            "Adds controlled texture for film-like grain.",
        )],
    },
    // monochrome
    CategorySpec {
        keywords: &["black and white", "bw", "monochrome", "grayscale"],
        suggestions: &[SuggestionSpec::checkbox(
            "Grayscale",
            "Removes color for a true monochrome look.",
        )],
    },
    // vintage
    CategorySpec {
        keywords: &["vintage", "retro", "sepia"],
        suggestions: &[SuggestionSpec::checkbox(
            "Sepia",
            "Adds warm vintage tones.",
        )],
    },
    // pixelated
    CategorySpec {
        keywords: &["pixel", "pixelate", "mosaic"],
        suggestions: &[SuggestionSpec::slider(
            "Pixelate",
            "12",
            60,
            "Creates a stylized mosaic effect.",
        )],
    },
    // inverted
    CategorySpec {
        keywords: &["invert", "negative"],
        suggestions: &[SuggestionSpec::checkbox(
            "Invert",
            "Flips tones for a negative-style look.",
        )],
    },
];

pub const FALLBACK_SUGGESTIONS: &[SuggestionSpec] = &[
    SuggestionSpec::slider(
        "Brightness",
        "+8",
        40,
        "A safe first adjustment for most photos.",
    ),
    SuggestionSpec::slider(
        "Sharpen",
        "+6",
        30,
        "Adds subtle detail without harshness.",
    ),
];
