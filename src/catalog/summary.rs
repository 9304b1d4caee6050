use std::io::{self, Write};

use anyhow::{Context, Result, bail};

use super::model::{
    Catalog, EFFECTIVE_RADIUS, LOG_STELLAR_MASS, REDSHIFT, REDSHIFT_TYPE, Z_TYPE_PHOT,
    Z_TYPE_SPEC,
};
use crate::stats;

// ---------------------------------------------------------------------------
// Capability probe
// ---------------------------------------------------------------------------

/// Which optional summary statistics a given catalog can support. Probed
/// once up front so every column access below is already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCapabilities {
    pub redshift: bool,
    pub stellar_mass: bool,
    pub effective_radius: bool,
    pub redshift_type: bool,
}

impl SummaryCapabilities {
    pub fn probe(catalog: &Catalog) -> Self {
        SummaryCapabilities {
            redshift: catalog.float_column(REDSHIFT).is_some(),
            stellar_mass: catalog.float_column(LOG_STELLAR_MASS).is_some(),
            effective_radius: catalog.float_column(EFFECTIVE_RADIUS).is_some(),
            redshift_type: catalog.text_column(REDSHIFT_TYPE).is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary report
// ---------------------------------------------------------------------------

/// Print the catalog summary to stdout.
pub fn print_summary(catalog: &Catalog) -> Result<()> {
    write_summary(catalog, &mut io::stdout().lock())
}

/// Write the catalog summary: total row count, per-column ranges and
/// medians (NaN values excluded), and the spectroscopic/photometric
/// redshift breakdown. Absent columns are skipped without error.
///
/// Percentages divide by the total row count; an empty catalog that still
/// carries a `redshift_type` column is reported as an error rather than
/// dividing by zero.
pub fn write_summary<W: Write>(catalog: &Catalog, out: &mut W) -> Result<()> {
    let caps = SummaryCapabilities::probe(catalog);
    let rule = "=".repeat(60);

    writeln!(out, "\n{rule}")?;
    writeln!(out, "CATALOG SUMMARY")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "\nTotal number of galaxies: {}", catalog.len())?;

    if caps.redshift {
        let z = catalog.float_column(REDSHIFT).context("redshift column")?;
        if let (Some(min), Some(max), Some(med)) =
            (stats::nan_min(z), stats::nan_max(z), stats::nan_median(z))
        {
            writeln!(out, "\nRedshift range: {min:.3} - {max:.3}")?;
            writeln!(out, "Median redshift: {med:.3}")?;
        }
    }

    if caps.stellar_mass {
        let mass = catalog
            .float_column(LOG_STELLAR_MASS)
            .context("log_stellar_mass column")?;
        if let (Some(min), Some(max), Some(med)) = (
            stats::nan_min(mass),
            stats::nan_max(mass),
            stats::nan_median(mass),
        ) {
            writeln!(out, "\nlog(M*/M☉) range: {min:.2} - {max:.2}")?;
            writeln!(out, "Median log(M*/M☉): {med:.2}")?;
        }
    }

    if caps.effective_radius {
        let sizes = catalog
            .float_column(EFFECTIVE_RADIUS)
            .context("effective_radius column")?;
        if let (Some(min), Some(max), Some(med)) = (
            stats::nan_min(sizes),
            stats::nan_max(sizes),
            stats::nan_median(sizes),
        ) {
            writeln!(out, "\nEffective radius range: {min:.2} - {max:.2} kpc")?;
            writeln!(out, "Median effective radius: {med:.2} kpc")?;
        }
    }

    if caps.redshift_type {
        if catalog.is_empty() {
            bail!("cannot report redshift-type percentages for an empty catalog");
        }
        let types = catalog
            .text_column(REDSHIFT_TYPE)
            .context("redshift_type column")?;
        let total = catalog.len() as f64;
        let spec = types.iter().filter(|t| *t == Z_TYPE_SPEC).count();
        let phot = types.iter().filter(|t| *t == Z_TYPE_PHOT).count();
        writeln!(
            out,
            "\nSpectroscopic redshifts: {spec} ({:.1}%)",
            100.0 * spec as f64 / total
        )?;
        writeln!(
            out,
            "Photometric redshifts: {phot} ({:.1}%)",
            100.0 * phot as f64 / total
        )?;
    }

    writeln!(out, "{rule}")?;
    Ok(())
}
