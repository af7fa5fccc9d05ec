//! UI slider values to the numeric domains the editor's filters expect.
//!
//! Sliders show small, friendly ranges (for example -30..30) whatever the
//! underlying effect takes. Every function here is total: out-of-range and
//! non-finite input is clamped or replaced by a fixed fallback.

const BRIGHTNESS_UI_SCALE: f64 = 30.0;
const BLUR_UI_SCALE: f64 = 10.0;
const DISTANCE_UI_SCALE: f64 = 30.0;
const DISTANCE_PERCENT_SCALE: f64 = 100.0;
const NOISE_UI_MAX: f64 = 30.0;
const NOISE_DOMAIN_MAX: f64 = 1000.0;
const NOISE_PASSTHROUGH_ABOVE: f64 = 100.0;
const PIXEL_SIZE_MIN: f64 = 2.0;
const PIXEL_SIZE_MAX: f64 = 20.0;

/// Signed brightness in [-1, 1].
pub fn normalize_brightness(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    if (-1.0..=1.0).contains(&raw) {
        return raw;
    }
    (raw / BRIGHTNESS_UI_SCALE).clamp(-1.0, 1.0)
}

/// Blur strength in [0, 1].
pub fn normalize_blur(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.1;
    }
    if (0.0..=1.0).contains(&raw) {
        return raw;
    }
    (raw / BLUR_UI_SCALE).clamp(0.0, 1.0)
}

/// Distance/threshold in [0, 1] for color-keyed filters. Values up to 30 are
/// read as slider units, larger ones as percentages.
pub fn normalize_distance(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.2;
    }
    if (0.0..=1.0).contains(&raw) {
        return raw;
    }
    if raw <= DISTANCE_UI_SCALE {
        return (raw / DISTANCE_UI_SCALE).clamp(0.0, 1.0);
    }
    (raw / DISTANCE_PERCENT_SCALE).clamp(0.0, 1.0)
}

/// Noise intensity as an integer count. Slider values (0..=30) are stretched
/// onto 0..=1000; anything above 100 is already in the editor's domain.
pub fn normalize_noise(raw: f64) -> u32 {
    if !raw.is_finite() {
        return 0;
    }
    if raw > NOISE_PASSTHROUGH_ABOVE {
        return raw.round() as u32;
    }
    let scaled = raw.clamp(0.0, NOISE_UI_MAX) * NOISE_DOMAIN_MAX / NOISE_UI_MAX;
    scaled.round() as u32
}

/// Pixelate block size in [2, 20].
pub fn normalize_pixel_size(raw: f64) -> u32 {
    if !raw.is_finite() {
        return PIXEL_SIZE_MIN as u32;
    }
    raw.abs().round().clamp(PIXEL_SIZE_MIN, PIXEL_SIZE_MAX) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_boundaries() {
        assert_eq!(normalize_brightness(-1.0), -1.0);
        assert_eq!(normalize_brightness(0.25), 0.25);
        assert_eq!(normalize_brightness(30.0), 1.0);
        assert_eq!(normalize_brightness(60.0), 1.0);
        assert_eq!(normalize_brightness(-15.0), -0.5);
        assert_eq!(normalize_brightness(-300.0), -1.0);
        assert_eq!(normalize_brightness(f64::NAN), 0.0);
        assert_eq!(normalize_brightness(f64::INFINITY), 0.0);
    }

    #[test]
    fn blur_boundaries() {
        assert_eq!(normalize_blur(0.5), 0.5);
        assert_eq!(normalize_blur(4.0), 0.4);
        assert_eq!(normalize_blur(25.0), 1.0);
        assert_eq!(normalize_blur(-3.0), 0.0);
        assert_eq!(normalize_blur(f64::NAN), 0.1);
    }

    #[test]
    fn distance_switches_scale_above_thirty() {
        assert_eq!(normalize_distance(0.3), 0.3);
        assert_eq!(normalize_distance(15.0), 0.5);
        assert_eq!(normalize_distance(30.0), 1.0);
        assert_eq!(normalize_distance(45.0), 0.45);
        assert_eq!(normalize_distance(500.0), 1.0);
        assert_eq!(normalize_distance(-4.0), 0.0);
        assert_eq!(normalize_distance(f64::NEG_INFINITY), 0.2);
    }

    #[test]
    fn noise_boundaries() {
        assert_eq!(normalize_noise(30.0), 1000);
        assert_eq!(normalize_noise(0.0), 0);
        assert_eq!(normalize_noise(150.0), 150);
        assert_eq!(normalize_noise(6.0), 200);
        assert_eq!(normalize_noise(100.0), 1000);
        assert_eq!(normalize_noise(-8.0), 0);
        assert_eq!(normalize_noise(f64::NAN), 0);
    }

    #[test]
    fn pixel_size_boundaries() {
        assert_eq!(normalize_pixel_size(12.0), 12);
        assert_eq!(normalize_pixel_size(-7.4), 7);
        assert_eq!(normalize_pixel_size(0.0), 2);
        assert_eq!(normalize_pixel_size(99.0), 20);
        assert_eq!(normalize_pixel_size(f64::NAN), 2);
    }
}
