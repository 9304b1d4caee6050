//! Chart producers rendering catalog views as PNG files.
//!
//! Each producer is an independent pure function of `(catalog, parameters)`:
//! it pulls named columns, drops rows with NaN in any required column,
//! computes its derived quantities, and renders through the [`plotters`]
//! bitmap backend. With an explicit output path the chart is saved there;
//! without one it is written to a temp file and handed to the platform
//! image viewer. Every producer returns the path of the written image.

pub mod color;
pub mod mass_function;
pub mod mass_size;
pub mod output;
pub mod redshift;
pub mod size_evolution;
pub mod style;
pub mod uvj;

use thiserror::Error;

/// Errors that can occur during plot generation.
#[derive(Error, Debug)]
pub enum PlotError {
    /// The catalog lacks a column the producer unconditionally reads.
    /// Producers do not guard optional behavior around this; the required
    /// columns are a documented precondition.
    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("no rows left to plot after filtering")]
    EmptyInput,

    #[error("failed to draw chart: {0}")]
    Drawing(String),

    #[error("failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, PlotError>;

/// Map any plotters error into [`PlotError::Drawing`].
pub(crate) fn draw_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}

/// Pad a data range by 5% on both sides for axis limits.
pub(crate) fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_degenerate_spans() {
        assert_eq!(padded_range(1.0, 1.0), (0.5, 1.5));
        let (lo, hi) = padded_range(0.0, 10.0);
        assert_eq!(lo, -0.5);
        assert_eq!(hi, 10.5);
    }
}
