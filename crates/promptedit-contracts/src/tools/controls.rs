use serde::{Deserialize, Serialize};

use super::names::{normalize_tool_key, resolve_canonical_name};
use super::ranges::{SliderRange, ToolRangeTable};
use crate::plan::{ControlKind, SeedValue, ToolSuggestion};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ComponentSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registration entry for the chat panel's generative slider component.
pub const TOOL_SLIDER_COMPONENT: ComponentSpec = ComponentSpec {
    name: "ToolSlider",
    description: "A slider for adjusting an image editing parameter",
};

const FALLBACK_RANGE: SliderRange = SliderRange {
    min: 0.0,
    max: 30.0,
    default: 0.0,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSliderProps {
    pub tool_id: String,
    pub label: String,
    pub description: String,
    pub min: f64,
    pub max: f64,
    pub default_value: f64,
}

/// Props for rendering a slider suggestion. Checkbox suggestions have none.
pub fn slider_props(suggestion: &ToolSuggestion, ranges: &ToolRangeTable) -> Option<ToolSliderProps> {
    if suggestion.control != ControlKind::Slider {
        return None;
    }
    let range = ranges.get(&suggestion.name).copied().unwrap_or(FALLBACK_RANGE);
    let default_value = match suggestion.seed_value() {
        Some(SeedValue::Number(value)) => range.clamp(value),
        _ => range.default,
    };
    let tool_id = resolve_canonical_name(&suggestion.name)
        .map(|kind| kind.identifier().to_string())
        .unwrap_or_else(|| normalize_tool_key(&suggestion.name));
    Some(ToolSliderProps {
        tool_id,
        label: suggestion.name.clone(),
        description: suggestion.reason.clone(),
        min: range.min,
        max: range.max,
        default_value,
    })
}
