use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::catalog::model::{Catalog, REDSHIFT};
use crate::stats;

use super::style::PlotStyle;
use super::{PlotError, Result, draw_err, output, padded_range};

/// Plot the redshift distribution as a histogram with `bins` bins over the
/// data range, annotated with the sample size, median, and range.
///
/// NaN redshifts are dropped. Requires the `redshift` column.
pub fn plot_redshift_distribution(
    catalog: &Catalog,
    bins: usize,
    style: &PlotStyle,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let z_col = catalog
        .float_column(REDSHIFT)
        .ok_or(PlotError::MissingColumn(REDSHIFT))?;
    let z = stats::finite(z_col);
    if z.is_empty() {
        return Err(PlotError::EmptyInput);
    }

    let hist = stats::histogram(&z, bins, None).ok_or(PlotError::EmptyInput)?;
    let n = z.len();
    let median = stats::nan_median(&z).unwrap_or(f64::NAN);
    let z_min = stats::nan_min(&z).unwrap_or(f64::NAN);
    let z_max = stats::nan_max(&z).unwrap_or(f64::NAN);

    let (x_lo, x_hi) = padded_range(hist.edges[0], hist.edges[hist.counts.len()]);
    let y_hi = hist.max_count() as f64 * 1.1;

    let target = output::resolve(output_path);
    {
        let root = BitMapBackend::new(&target.path, style.figure_size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption("Redshift Distribution", style.title_font())
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(55);
        if style.ticks_on_all_sides {
            builder.top_x_label_area_size(8).right_y_label_area_size(8);
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Redshift")
            .y_desc("Number of galaxies")
            .axis_style(BLACK.stroke_width(style.axis_line_width))
            .label_style(style.label_font())
            .light_line_style(BLACK.mix(0.1))
            .set_all_tick_mark_size(style.tick_mark_size())
            .draw()
            .map_err(draw_err)?;

        let fill = RGBColor(0, 0, 139);
        chart
            .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
                Rectangle::new(
                    [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                    fill.mix(0.7).filled(),
                )
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
                Rectangle::new(
                    [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                    BLACK.stroke_width(1),
                )
            }))
            .map_err(draw_err)?;

        // Sample statistics, anchored near the top-right corner.
        let lines = [
            format!("N = {n}"),
            format!("Median z = {median:.2}"),
            format!("Range: {z_min:.2} - {z_max:.2}"),
        ];
        let anchor_x = style.figure_size.0 as i32 - 200;
        for (i, line) in lines.iter().enumerate() {
            root.draw(&Text::new(
                line.as_str(),
                (anchor_x, 50 + 20 * i as i32),
                style.label_font(),
            ))
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
    fn missing_redshift_column_is_a_typed_error() {
        let cat = Catalog::from_columns(vec![(
            "log_stellar_mass".to_string(),
            Column::Float(vec![11.0]),
        )])
        .unwrap();
        let err =
            plot_redshift_distribution(&cat, 30, &PlotStyle::default(), None).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(REDSHIFT)));
    }

    #[test]
    fn all_nan_redshifts_are_empty_input() {
        let cat = Catalog::from_columns(vec![(
            REDSHIFT.to_string(),
            Column::Float(vec![f64::NAN, f64::NAN]),
        )])
        .unwrap();
        let err =
            plot_redshift_distribution(&cat, 30, &PlotStyle::default(), None).unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput));
    }
}
