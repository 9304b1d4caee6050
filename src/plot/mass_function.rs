use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::catalog::model::{Catalog, LOG_STELLAR_MASS, REDSHIFT};
use crate::stats;

use super::style::PlotStyle;
use super::{PlotError, Result, draw_err, output, padded_range};

/// Log masses of the rows with `z_min <= redshift < z_max` (half-open upper
/// bound), NaN masses dropped.
fn mass_in_z_range(z: &[f64], mass: &[f64], z_min: f64, z_max: f64) -> Vec<f64> {
    z.iter()
        .zip(mass)
        .filter(|(&zv, _)| zv >= z_min && zv < z_max)
        .map(|(_, &m)| m)
        .filter(|m| m.is_finite())
        .collect()
}

/// Plot the stellar mass function for the redshift slice `[z_min, z_max)`:
/// a histogram of log stellar mass with a log-scaled count axis.
///
/// Requires the `redshift` and `log_stellar_mass` columns.
pub fn plot_mass_function(
    catalog: &Catalog,
    z_min: f64,
    z_max: f64,
    bins: usize,
    style: &PlotStyle,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let z = catalog
        .float_column(REDSHIFT)
        .ok_or(PlotError::MissingColumn(REDSHIFT))?;
    let mass_col = catalog
        .float_column(LOG_STELLAR_MASS)
        .ok_or(PlotError::MissingColumn(LOG_STELLAR_MASS))?;

    let mass = mass_in_z_range(z, mass_col, z_min, z_max);
    if mass.is_empty() {
        return Err(PlotError::EmptyInput);
    }
    let hist = stats::histogram(&mass, bins, None).ok_or(PlotError::EmptyInput)?;

    let (x_lo, x_hi) = padded_range(hist.edges[0], hist.edges[hist.counts.len()]);
    // Log-scaled count axis; the baseline sits below the smallest nonzero
    // count so single-galaxy bins stay visible.
    let y_base = 0.8;
    let y_hi = hist.max_count() as f64 * 1.5;

    let target = output::resolve(output_path);
    {
        let root = BitMapBackend::new(&target.path, style.figure_size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(
                format!("Stellar Mass Function ({z_min:.1} < z < {z_max:.1})"),
                style.title_font(),
            )
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(55);
        if style.ticks_on_all_sides {
            builder.top_x_label_area_size(8).right_y_label_area_size(8);
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, (y_base..y_hi).log_scale())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("log(M*/M☉)")
            .y_desc("Number of galaxies")
            .axis_style(BLACK.stroke_width(style.axis_line_width))
            .label_style(style.label_font())
            .light_line_style(BLACK.mix(0.1))
            .set_all_tick_mark_size(style.tick_mark_size())
            .draw()
            .map_err(draw_err)?;

        let fill = RGBColor(139, 0, 0);
        let bars: Vec<_> = hist
            .counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(i, &count)| (hist.edges[i], hist.edges[i + 1], count as f64))
            .collect();
        chart
            .draw_series(bars.iter().map(|&(lo, hi, count)| {
                Rectangle::new([(lo, y_base), (hi, count)], fill.mix(0.7).filled())
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(bars.iter().map(|&(lo, hi, count)| {
                Rectangle::new([(lo, y_base), (hi, count)], BLACK.stroke_width(1))
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }
    output::finish(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Column;

    #[test]
    fn upper_redshift_bound_is_exclusive() {
        let z = [0.5, 0.99, 1.0, 1.2];
        let mass = [10.5, 10.8, 11.0, 11.3];
        let selected = mass_in_z_range(&z, &mass, 0.5, 1.0);
        // z = 0.99 is included, z = 1.0 is excluded.
        assert_eq!(selected, vec![10.5, 10.8]);
    }

    #[test]
    fn nan_masses_are_dropped() {
        let z = [0.6, 0.7];
        let mass = [f64::NAN, 11.0];
        assert_eq!(mass_in_z_range(&z, &mass, 0.5, 1.0), vec![11.0]);
    }

    #[test]
    fn empty_redshift_slice_is_empty_input() {
        let cat = Catalog::from_columns(vec![
            (REDSHIFT.to_string(), Column::Float(vec![2.5, 3.0])),
            (LOG_STELLAR_MASS.to_string(), Column::Float(vec![11.0, 11.2])),
        ])
        .unwrap();
        let err = plot_mass_function(&cat, 0.5, 1.0, 15, &PlotStyle::default(), None)
            .unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput));
    }
}
