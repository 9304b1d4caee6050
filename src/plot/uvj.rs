use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::catalog::model::{Catalog, REST_U_V, REST_V_J};
use crate::stats;

use super::color::density_color;
use super::style::PlotStyle;
use super::{PlotError, Result, draw_err, output};

/// Grid resolution of the density map.
const DENSITY_BINS: usize = 50;

/// Fixed plot window: V-J on x, U-V on y.
const X_RANGE: (f64, f64) = (-0.5, 2.5);
const Y_RANGE: (f64, f64) = (0.0, 2.5);

/// Quiescent selection box, closed polygon of (V-J, U-V) vertices.
const QUIESCENT_BOX: [(f64, f64); 5] = [
    (0.6, 1.3),
    (1.6, 1.3),
    (1.6, 2.1),
    (0.6, 2.01),
    (0.6, 1.3),
];

/// Diagonal boundary UV = 0.88 · VJ + 0.59 for VJ in [0.6, 1.5].
fn diagonal_boundary() -> Vec<(f64, f64)> {
    (0..100)
        .map(|i| {
            let vj = 0.6 + (1.5 - 0.6) * i as f64 / 99.0;
            (vj, 0.88 * vj + 0.59)
        })
        .collect()
}

/// Plot the rest-frame UVJ color–color diagram as a log-scaled density map,
/// optionally with the quiescent selection boundary overlaid.
///
/// Rows with NaN in either colour are dropped; cells with zero counts are
/// left blank. Requires the `rest_U_V` and `rest_V_J` columns.
pub fn plot_uvj_diagram(
    catalog: &Catalog,
    highlight_quiescent: bool,
    style: &PlotStyle,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let uv = catalog
        .float_column(REST_U_V)
        .ok_or(PlotError::MissingColumn(REST_U_V))?;
    let vj = catalog
        .float_column(REST_V_J)
        .ok_or(PlotError::MissingColumn(REST_V_J))?;

    let hist = stats::histogram2d(vj, uv, DENSITY_BINS).ok_or(PlotError::EmptyInput)?;
    let max_count = hist.max_count() as f64;

    let target = output::resolve(output_path);
    {
        let root = BitMapBackend::new(&target.path, style.figure_size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption("UVJ Color-Color Diagram", style.title_font())
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(55);
        if style.ticks_on_all_sides {
            builder.top_x_label_area_size(8).right_y_label_area_size(8);
        }
        let mut chart = builder
            .build_cartesian_2d(X_RANGE.0..X_RANGE.1, Y_RANGE.0..Y_RANGE.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Rest-frame V-J [mag]")
            .y_desc("Rest-frame U-V [mag]")
            .axis_style(BLACK.stroke_width(style.axis_line_width))
            .label_style(style.label_font())
            .light_line_style(BLACK.mix(0.1))
            .set_all_tick_mark_size(style.tick_mark_size())
            .draw()
            .map_err(draw_err)?;

        // Density cells, log-normalised so sparse cells stay visible.
        let mut cells = Vec::new();
        for iy in 0..hist.bins() {
            for ix in 0..hist.bins() {
                let count = hist.count(ix, iy);
                if count == 0 {
                    continue;
                }
                let t = if max_count > 1.0 {
                    (count as f64).ln() / max_count.ln()
                } else {
                    1.0
                };
                cells.push(Rectangle::new(
                    [
                        (hist.x_edges[ix], hist.y_edges[iy]),
                        (hist.x_edges[ix + 1], hist.y_edges[iy + 1]),
                    ],
                    density_color(t).filled(),
                ));
            }
        }
        chart.draw_series(cells).map_err(draw_err)?;

        if highlight_quiescent {
            chart
                .draw_series(LineSeries::new(QUIESCENT_BOX, RED.stroke_width(2)))
                .map_err(draw_err)?
                .label("Quiescent region")
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2))
                });
            chart
                .draw_series(LineSeries::new(diagonal_boundary(), RED.stroke_width(2)))
                .map_err(draw_err)?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK.stroke_width(1))
                .label_font(style.label_font())
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
    }
    output::finish(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Column;

    #[test]
    fn quiescent_box_is_a_closed_polygon() {
        assert_eq!(QUIESCENT_BOX.first(), QUIESCENT_BOX.last());
        assert_eq!(QUIESCENT_BOX[3], (0.6, 2.01));
    }

    #[test]
    fn diagonal_boundary_matches_its_equation() {
        let diag = diagonal_boundary();
        assert_eq!(diag[0].0, 0.6);
        assert!((diag[0].1 - (0.88 * 0.6 + 0.59)).abs() < 1e-12);
        let last = diag.last().unwrap();
        assert!((last.0 - 1.5).abs() < 1e-12);
        assert!((last.1 - (0.88 * 1.5 + 0.59)).abs() < 1e-12);
    }

    #[test]
    fn missing_color_column_is_a_typed_error() {
        let cat = Catalog::from_columns(vec![(
            REST_U_V.to_string(),
            Column::Float(vec![1.5]),
        )])
        .unwrap();
        let err = plot_uvj_diagram(&cat, true, &PlotStyle::default(), None).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(REST_V_J)));
    }

    #[test]
    fn all_nan_colors_are_empty_input() {
        let cat = Catalog::from_columns(vec![
            (REST_U_V.to_string(), Column::Float(vec![f64::NAN])),
            (REST_V_J.to_string(), Column::Float(vec![f64::NAN])),
        ])
        .unwrap();
        let err = plot_uvj_diagram(&cat, false, &PlotStyle::default(), None).unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput));
    }
}
