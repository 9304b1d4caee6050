use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::catalog::model::{Catalog, EFFECTIVE_RADIUS, LOG_STELLAR_MASS, REDSHIFT};

use super::color::generate_palette;
use super::style::PlotStyle;
use super::{PlotError, Result, draw_err, output, padded_range};

/// Mass range of the reference relation, log(M*/M☉).
const REF_MASS_RANGE: (f64, f64) = (10.5, 12.0);

/// Reference mass–size relation at z ~ 1 (van der Wel et al. 2014):
/// log10(Re) = 0.75 · (log M* − 11.0) − 0.19.
fn reference_curve() -> Vec<(f64, f64)> {
    (0..100)
        .map(|i| {
            let m = REF_MASS_RANGE.0
                + (REF_MASS_RANGE.1 - REF_MASS_RANGE.0) * i as f64 / 99.0;
            (m, 0.75 * (m - 11.0) - 0.19)
        })
        .collect()
}

/// Plot the mass–size relation: log10(Re) against log stellar mass, with
/// the z ~ 1 reference relation overlaid as a dashed line.
///
/// With `z_bins` the sample is split into the given `[lo, hi)` redshift
/// bins, one colour and legend entry per bin; rows whose redshift falls in
/// no bin (including NaN redshifts) are not drawn. Requires the
/// `log_stellar_mass` and `effective_radius` columns, plus `redshift` when
/// bins are given.
pub fn plot_mass_size(
    catalog: &Catalog,
    z_bins: Option<&[(f64, f64)]>,
    style: &PlotStyle,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let mass_col = catalog
        .float_column(LOG_STELLAR_MASS)
        .ok_or(PlotError::MissingColumn(LOG_STELLAR_MASS))?;
    let size_col = catalog
        .float_column(EFFECTIVE_RADIUS)
        .ok_or(PlotError::MissingColumn(EFFECTIVE_RADIUS))?;
    let z_col = match z_bins {
        Some(_) => Some(
            catalog
                .float_column(REDSHIFT)
                .ok_or(PlotError::MissingColumn(REDSHIFT))?,
        ),
        None => None,
    };

    // (mass, log10 size, redshift) for rows with usable mass and size.
    let mut points: Vec<(f64, f64, f64)> = Vec::new();
    for i in 0..catalog.len() {
        let (m, s) = (mass_col[i], size_col[i]);
        if !m.is_finite() {
            continue;
        }
        let log_size = s.log10();
        if !log_size.is_finite() {
            continue;
        }
        let z = z_col.map(|z| z[i]).unwrap_or(f64::NAN);
        points.push((m, log_size, z));
    }
    if points.is_empty() {
        return Err(PlotError::EmptyInput);
    }

    let reference = reference_curve();
    let x_values = points
        .iter()
        .map(|p| p.0)
        .chain([REF_MASS_RANGE.0, REF_MASS_RANGE.1]);
    let y_values = points.iter().map(|p| p.1).chain(reference.iter().map(|p| p.1));
    let (x_lo, x_hi) = padded_range(
        x_values.clone().fold(f64::INFINITY, f64::min),
        x_values.fold(f64::NEG_INFINITY, f64::max),
    );
    let (y_lo, y_hi) = padded_range(
        y_values.clone().fold(f64::INFINITY, f64::min),
        y_values.fold(f64::NEG_INFINITY, f64::max),
    );

    let target = output::resolve(output_path);
    {
        let root = BitMapBackend::new(&target.path, style.figure_size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption("Mass-Size Relation", style.title_font())
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
            .x_desc("log(M*/M☉)")
            .y_desc("log(Re / kpc)")
            .axis_style(BLACK.stroke_width(style.axis_line_width))
            .label_style(style.label_font())
            .light_line_style(BLACK.mix(0.1))
            .set_all_tick_mark_size(style.tick_mark_size())
            .draw()
            .map_err(draw_err)?;

        match z_bins {
            None => {
                let color = RGBColor(139, 0, 0);
                chart
                    .draw_series(points.iter().map(|&(m, ls, _)| {
                        Circle::new((m, ls), 3, color.mix(0.5).filled())
                    }))
                    .map_err(draw_err)?;
            }
            Some(bins) => {
                let palette = generate_palette(bins.len());
                for (&(lo, hi), &color) in bins.iter().zip(&palette) {
                    let in_bin: Vec<(f64, f64)> = points
                        .iter()
                        .filter(|&&(_, _, z)| z >= lo && z < hi)
                        .map(|&(m, ls, _)| (m, ls))
                        .collect();
                    chart
                        .draw_series(in_bin.into_iter().map(move |(m, ls)| {
                            Circle::new((m, ls), 3, color.mix(0.6).filled())
                        }))
                        .map_err(draw_err)?
                        .label(format!("{lo:.1} < z < {hi:.1}"))
                        .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
                }
            }
        }

        chart
            .draw_series(DashedLineSeries::new(
                reference.into_iter(),
                8,
                5,
                BLACK.mix(0.5).stroke_width(2),
            ))
            .map_err(draw_err)?
            .label("van der Wel+14 (z~1)")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.5).stroke_width(2))
            });

        if z_bins.is_some() {
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
