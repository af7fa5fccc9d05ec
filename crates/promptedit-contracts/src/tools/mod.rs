mod controls;
mod names;
mod normalize;
mod options;
mod ranges;

pub use controls::{slider_props, ComponentSpec, ToolSliderProps, TOOL_SLIDER_COMPONENT};
pub use names::{normalize_tool_key, resolve_canonical_name, FilterKind};
pub use normalize::{
    normalize_blur, normalize_brightness, normalize_distance, normalize_noise,
    normalize_pixel_size,
};
pub use options::{build_filter_options, FilterOptions, REFERENCE_COLOR};
pub use ranges::{SliderRange, ToolRangeTable};
