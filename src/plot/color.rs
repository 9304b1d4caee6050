use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Density gradient
// ---------------------------------------------------------------------------

/// Colour for a normalised density `t` in `[0, 1]`: a light-to-dark blue
/// ramp used by the 2D histogram cells.
pub fn density_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0) as f32;
    let hsl = Hsl::new(222.0, 0.65, 0.92 - 0.62 * t);
    let rgb: Srgb = hsl.into_color();
    RGBColor(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        assert!(generate_palette(0).is_empty());
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for pair in palette.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn density_ramp_darkens_with_t() {
        let lo = density_color(0.0);
        let hi = density_color(1.0);
        let brightness = |c: &RGBColor| c.0 as u32 + c.1 as u32 + c.2 as u32;
        assert!(brightness(&lo) > brightness(&hi));
    }
}
