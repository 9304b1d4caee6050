use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use quiescat::catalog::export::write_csv;
use quiescat::catalog::loader::load_catalog;
use quiescat::catalog::select::{SelectionCuts, select_subsample};
use quiescat::catalog::summary::print_summary;
use quiescat::plot::mass_function::plot_mass_function;
use quiescat::plot::mass_size::plot_mass_size;
use quiescat::plot::redshift::plot_redshift_distribution;
use quiescat::plot::size_evolution::plot_size_evolution;
use quiescat::plot::style::PlotStyle;
use quiescat::plot::uvj::plot_uvj_diagram;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let catalog_path = PathBuf::from(
        args.next()
            .context("usage: quiescat <catalog.{parquet,csv,json}> [output_dir]")?,
    );
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "plots".to_string()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let catalog = load_catalog(&catalog_path)?;
    print_summary(&catalog)?;

    info!("Selecting low-redshift subsample (z <= 1.0)");
    let low_z = select_subsample(&catalog, &SelectionCuts::z_range(None, Some(1.0)));
    write_csv(&low_z, &out_dir.join("low_redshift_subsample.csv"))?;

    info!("Selecting very massive galaxies (log M*/M☉ >= 11.0)");
    let massive = select_subsample(&catalog, &SelectionCuts::mass_range(Some(11.0), None));
    write_csv(&massive, &out_dir.join("massive_subsample.csv"))?;

    let style = PlotStyle::default();
    let z_bins = [(0.0, 0.5), (0.5, 1.0), (1.0, 1.5), (1.5, 2.0), (2.0, 2.5)];
    plot_mass_size(
        &catalog,
        Some(&z_bins),
        &style,
        Some(&out_dir.join("mass_size.png")),
    )?;
    plot_uvj_diagram(&catalog, true, &style, Some(&out_dir.join("uvj_diagram.png")))?;
    plot_redshift_distribution(
        &catalog,
        30,
        &style,
        Some(&out_dir.join("redshift_distribution.png")),
    )?;
    plot_mass_function(
        &catalog,
        0.5,
        1.0,
        15,
        &style,
        Some(&out_dir.join("mass_function.png")),
    )?;
    plot_size_evolution(
        &catalog,
        (11.0, 11.5),
        Some(&[0.25, 0.75, 1.25, 1.75, 2.25]),
        &style,
        Some(&out_dir.join("size_evolution.png")),
    )?;

    info!("Wrote plots to {}", out_dir.display());
    Ok(())
}
