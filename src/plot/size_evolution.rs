use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::catalog::model::{Catalog, EFFECTIVE_RADIUS, LOG_STELLAR_MASS, REDSHIFT};
use crate::stats;

use super::style::PlotStyle;
use super::{PlotError, Result, draw_err, output, padded_range};

/// `(redshift, size)` pairs for rows with `mass_lo <= log M* < mass_hi`
/// (half-open upper bound) and finite redshift and size.
fn rows_in_mass_range(
    z: &[f64],
    mass: &[f64],
    size: &[f64],
    mass_range: (f64, f64),
) -> Vec<(f64, f64)> {
    z.iter()
        .zip(mass)
        .zip(size)
        .filter(|((_, &m), _)| m >= mass_range.0 && m < mass_range.1)
        .map(|((&zv, _), &sv)| (zv, sv))
        .filter(|(zv, sv)| zv.is_finite() && sv.is_finite())
        .collect()
}

/// Plot size against redshift at fixed mass: a scatter of effective radius
/// for rows in the given log-mass range, with an optional running-median
/// overlay.
///
/// With `z_bin_edges` the running median and its standard error are drawn
/// per half-open redshift bin; bins with three or fewer rows are silently
/// omitted. Requires the `redshift`, `log_stellar_mass`, and
/// `effective_radius` columns.
pub fn plot_size_evolution(
    catalog: &Catalog,
    mass_range: (f64, f64),
    z_bin_edges: Option<&[f64]>,
    style: &PlotStyle,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let z_col = catalog
        .float_column(REDSHIFT)
        .ok_or(PlotError::MissingColumn(REDSHIFT))?;
    let mass_col = catalog
        .float_column(LOG_STELLAR_MASS)
        .ok_or(PlotError::MissingColumn(LOG_STELLAR_MASS))?;
    let size_col = catalog
        .float_column(EFFECTIVE_RADIUS)
        .ok_or(PlotError::MissingColumn(EFFECTIVE_RADIUS))?;

    let points = rows_in_mass_range(z_col, mass_col, size_col, mass_range);
    if points.is_empty() {
        return Err(PlotError::EmptyInput);
    }

    let zs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let sizes: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x_lo, x_hi) = padded_range(
        stats::nan_min(&zs).unwrap_or(0.0),
        stats::nan_max(&zs).unwrap_or(1.0),
    );
    let (y_lo, y_hi) = padded_range(
        stats::nan_min(&sizes).unwrap_or(0.0),
        stats::nan_max(&sizes).unwrap_or(1.0),
    );

    let target = output::resolve(output_path);
    {
        let root = BitMapBackend::new(&target.path, style.figure_size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(
                format!(
                    "Size Evolution ({:.1} < log M*/M☉ < {:.1})",
                    mass_range.0, mass_range.1
                ),
                style.title_font(),
            )
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(55);
        if style.ticks_on_all_sides {
            builder.top_x_label_area_size(8).right_y_label_area_size(8);
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Redshift")
            .y_desc("Re [kpc]")
            .axis_style(BLACK.stroke_width(style.axis_line_width))
            .label_style(style.label_font())
            .light_line_style(BLACK.mix(0.1))
            .set_all_tick_mark_size(style.tick_mark_size())
            .draw()
            .map_err(draw_err)?;

        let scatter = RGBColor(0, 0, 139);
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(zv, sv)| Circle::new((zv, sv), 3, scatter.mix(0.3).filled())),
            )
            .map_err(draw_err)?;

        if let Some(edges) = z_bin_edges {
            let medians = stats::running_median(&zs, &sizes, edges);

            chart
                .draw_series(medians.iter().map(|p| {
                    ErrorBar::new_vertical(
                        p.center,
                        p.median - p.stderr,
                        p.median,
                        p.median + p.stderr,
                        RED.stroke_width(2),
                        10,
                    )
                }))
                .map_err(draw_err)?;
            chart
                .draw_series(LineSeries::new(
                    medians.iter().map(|p| (p.center, p.median)),
                    RED.stroke_width(2),
                ))
                .map_err(draw_err)?;
            chart
                .draw_series(
                    medians
                        .iter()
                        .map(|p| Circle::new((p.center, p.median), 5, RED.filled())),
                )
                .map_err(draw_err)?
                .label("Median")
                .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
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
    fn mass_range_upper_bound_is_exclusive() {
        let z = [0.5, 0.6, 0.7];
        let mass = [11.0, 11.5, 11.2];
        let size = [1.0, 2.0, 3.0];
        let rows = rows_in_mass_range(&z, &mass, &size, (11.0, 11.5));
        // log M* = 11.5 sits on the upper bound and is excluded.
        assert_eq!(rows, vec![(0.5, 1.0), (0.7, 3.0)]);
    }

    #[test]
    fn nan_redshift_or_size_rows_are_dropped() {
        let z = [0.5, f64::NAN, 0.7];
        let mass = [11.0, 11.1, 11.2];
        let size = [1.0, 2.0, f64::NAN];
        let rows = rows_in_mass_range(&z, &mass, &size, (10.0, 12.0));
        assert_eq!(rows, vec![(0.5, 1.0)]);
    }

    #[test]
    fn empty_mass_slice_is_empty_input() {
        let cat = Catalog::from_columns(vec![
            (REDSHIFT.to_string(), Column::Float(vec![0.5])),
            (LOG_STELLAR_MASS.to_string(), Column::Float(vec![10.2])),
            (EFFECTIVE_RADIUS.to_string(), Column::Float(vec![1.4])),
        ])
        .unwrap();
        let err = plot_size_evolution(
            &cat,
            (11.0, 11.5),
            None,
            &PlotStyle::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput));
    }
}
