use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Plot style configuration
// ---------------------------------------------------------------------------

/// Which way axis tick marks point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickDirection {
    Inward,
    Outward,
}

/// Explicit per-call style configuration for the chart producers. This
/// replaces process-wide style defaults: every producer takes a
/// `&PlotStyle`, so two callers can render with different styles without
/// touching shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    /// Output raster size in pixels.
    pub figure_size: (u32, u32),
    /// Axis label and legend font size in points.
    pub font_size: u32,
    /// Axis stroke width in pixels.
    pub axis_line_width: u32,
    /// Tick mark direction.
    pub tick_direction: TickDirection,
    /// Reserve label strips on the top and right edges as well, giving the
    /// boxed look with ticks on all four sides.
    pub ticks_on_all_sides: bool,
}

impl Default for PlotStyle {
    /// Clean publication-style defaults: 800×600 px, 12 pt labels, 2 px
    /// axes, inward ticks on all four sides.
    fn default() -> Self {
        PlotStyle {
            figure_size: (800, 600),
            font_size: 12,
            axis_line_width: 2,
            tick_direction: TickDirection::Inward,
            ticks_on_all_sides: true,
        }
    }
}

impl PlotStyle {
    /// Font for axis labels and legends.
    pub fn label_font(&self) -> (&'static str, u32) {
        ("sans-serif", self.font_size)
    }

    /// Font for chart titles, a step larger than the labels.
    pub fn title_font(&self) -> (&'static str, u32) {
        ("sans-serif", self.font_size + 6)
    }

    /// Tick length in pixels; negative values point into the plot area.
    pub fn tick_mark_size(&self) -> i32 {
        match self.tick_direction {
            TickDirection::Inward => -4,
            TickDirection::Outward => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_style() {
        let style = PlotStyle::default();
        assert_eq!(style.figure_size, (800, 600));
        assert_eq!(style.font_size, 12);
        assert_eq!(style.tick_mark_size(), -4);
        assert!(style.ticks_on_all_sides);
    }

    #[test]
    fn outward_ticks_flip_the_sign() {
        let style = PlotStyle {
            tick_direction: TickDirection::Outward,
            ..Default::default()
        };
        assert_eq!(style.tick_mark_size(), 4);
    }
}
