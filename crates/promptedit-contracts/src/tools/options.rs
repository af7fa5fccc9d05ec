use serde_json::{json, Map, Value};

use super::names::FilterKind;
use super::normalize::{
    normalize_blur, normalize_brightness, normalize_distance, normalize_noise,
    normalize_pixel_size,
};

/// Options object handed to the editor alongside a filter identifier.
pub type FilterOptions = Map<String, Value>;

/// Reference color for the color-keyed filters.
pub const REFERENCE_COLOR: &str = "#FFFFFF";

pub fn build_filter_options(kind: FilterKind, raw: f64) -> FilterOptions {
    let value = match kind {
        FilterKind::Brightness => json!({ "brightness": normalize_brightness(raw) }),
        FilterKind::Sharpen | FilterKind::Grayscale | FilterKind::Invert | FilterKind::Sepia => {
            json!({})
        }
        FilterKind::Pixelate => json!({ "blocksize": normalize_pixel_size(raw) }),
        FilterKind::Blur => json!({ "blur": normalize_blur(raw) }),
        FilterKind::Noise => json!({ "noise": normalize_noise(raw) }),
        FilterKind::ColorFilter => json!({
            "color": REFERENCE_COLOR,
            "distance": normalize_distance(raw),
        }),
        FilterKind::RemoveWhite => json!({
            "color": REFERENCE_COLOR,
            "useAlpha": false,
            "distance": normalize_distance(raw),
        }),
    };
    value.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{build_filter_options, FilterKind};

    #[test]
    fn parameterless_filters_take_empty_options() {
        for kind in [
            FilterKind::Sharpen,
            FilterKind::Grayscale,
            FilterKind::Invert,
            FilterKind::Sepia,
        ] {
            assert!(build_filter_options(kind, 14.0).is_empty());
        }
    }

    #[test]
    fn numeric_filters_carry_normalized_values() {
        assert_eq!(
            build_filter_options(FilterKind::Brightness, 15.0)["brightness"],
            json!(0.5)
        );
        assert_eq!(
            build_filter_options(FilterKind::Pixelate, 12.0)["blocksize"],
            json!(12)
        );
        assert_eq!(build_filter_options(FilterKind::Blur, 4.0)["blur"], json!(0.4));
        assert_eq!(
            build_filter_options(FilterKind::Noise, 12.0)["noise"],
            json!(400)
        );
    }

    #[test]
    fn color_keyed_filters_share_reference_color() {
        let color = build_filter_options(FilterKind::ColorFilter, 15.0);
        assert_eq!(
            serde_json::Value::Object(color),
            json!({"color": "#FFFFFF", "distance": 0.5})
        );

        let white = build_filter_options(FilterKind::RemoveWhite, 0.1);
        assert_eq!(
            serde_json::Value::Object(white),
            json!({"color": "#FFFFFF", "useAlpha": false, "distance": 0.1})
        );
    }
}
