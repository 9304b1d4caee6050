use log::info;
use serde::{Deserialize, Serialize};

use super::model::{Catalog, LOG_STELLAR_MASS, REDSHIFT};

// ---------------------------------------------------------------------------
// Selection cuts: optional redshift / mass bounds
// ---------------------------------------------------------------------------

/// Optional range cuts for subsample selection. An unset bound contributes
/// no constraint; the default selects everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionCuts {
    /// Inclusive lower redshift bound.
    pub z_min: Option<f64>,
    /// Inclusive upper redshift bound.
    pub z_max: Option<f64>,
    /// Inclusive lower log stellar-mass bound.
    pub mass_min: Option<f64>,
    /// Inclusive upper log stellar-mass bound.
    pub mass_max: Option<f64>,
}

impl SelectionCuts {
    pub fn z_range(z_min: Option<f64>, z_max: Option<f64>) -> Self {
        SelectionCuts {
            z_min,
            z_max,
            ..Default::default()
        }
    }

    pub fn mass_range(mass_min: Option<f64>, mass_max: Option<f64>) -> Self {
        SelectionCuts {
            mass_min,
            mass_max,
            ..Default::default()
        }
    }
}

/// Select the rows passing all supplied cuts, preserving row order.
///
/// A bound whose column is absent from the catalog is ignored, even when it
/// was explicitly supplied: a mass cut against a catalog without a
/// `log_stellar_mass` column returns the input unfiltered on mass, with no
/// warning. Rows with NaN in a bounded column never satisfy that bound.
/// The resulting row count is reported through the log.
pub fn select_subsample(catalog: &Catalog, cuts: &SelectionCuts) -> Catalog {
    let mut mask = vec![true; catalog.len()];

    let z = catalog.float_column(REDSHIFT);
    apply_bound(&mut mask, z, cuts.z_min, |v, b| v >= b);
    apply_bound(&mut mask, z, cuts.z_max, |v, b| v <= b);

    let mass = catalog.float_column(LOG_STELLAR_MASS);
    apply_bound(&mut mask, mass, cuts.mass_min, |v, b| v >= b);
    apply_bound(&mut mask, mass, cuts.mass_max, |v, b| v <= b);

    let subsample = catalog.filter(&mask);
    info!("Selected {} galaxies", subsample.len());
    subsample
}

/// AND one range predicate into the mask, when both the bound and its
/// column are present.
fn apply_bound(
    mask: &mut [bool],
    column: Option<&[f64]>,
    bound: Option<f64>,
    pred: impl Fn(f64, f64) -> bool,
) {
    if let (Some(values), Some(b)) = (column, bound) {
        for (m, &v) in mask.iter_mut().zip(values) {
            *m &= pred(v, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Column;

    fn catalog() -> Catalog {
        Catalog::from_columns(vec![
            (
                REDSHIFT.to_string(),
                Column::Float(vec![0.3, 0.9, 1.5, 2.4, f64::NAN]),
            ),
            (
                LOG_STELLAR_MASS.to_string(),
                Column::Float(vec![10.2, 11.1, 11.4, 10.8, 11.9]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn no_cuts_returns_the_full_catalog() {
        let cat = catalog();
        let sub = select_subsample(&cat, &SelectionCuts::default());
        assert_eq!(sub.len(), cat.len());
        assert_eq!(
            sub.float_column(LOG_STELLAR_MASS).unwrap(),
            cat.float_column(LOG_STELLAR_MASS).unwrap()
        );
    }

    #[test]
    fn cuts_are_inclusive_and_anded() {
        let cat = catalog();
        let cuts = SelectionCuts {
            z_min: Some(0.9),
            z_max: Some(2.4),
            mass_min: Some(11.0),
            mass_max: None,
        };
        let sub = select_subsample(&cat, &cuts);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.float_column(REDSHIFT).unwrap(), &[0.9, 1.5]);

        let z = sub.float_column(REDSHIFT).unwrap();
        let mass = sub.float_column(LOG_STELLAR_MASS).unwrap();
        for (&zv, &mv) in z.iter().zip(mass) {
            assert!(zv >= 0.9 && zv <= 2.4 && mv >= 11.0);
        }
    }

    #[test]
    fn subsample_is_never_larger_than_the_input() {
        let cat = catalog();
        for cuts in [
            SelectionCuts::z_range(Some(0.0), None),
            SelectionCuts::z_range(None, Some(1.0)),
            SelectionCuts::mass_range(Some(11.0), Some(11.5)),
        ] {
            assert!(select_subsample(&cat, &cuts).len() <= cat.len());
        }
    }

    #[test]
    fn nan_rows_fail_any_supplied_bound() {
        let cat = catalog();
        let sub = select_subsample(&cat, &SelectionCuts::z_range(Some(0.0), None));
        // The NaN-redshift row is dropped once a redshift bound exists.
        assert_eq!(sub.len(), 4);
    }

    #[test]
    fn bound_on_absent_column_is_ignored() {
        // Observed source behavior, preserved deliberately: a mass cut on a
        // catalog without a mass column filters nothing.
        let cat = Catalog::from_columns(vec![(
            REDSHIFT.to_string(),
            Column::Float(vec![0.3, 0.9, 1.5]),
        )])
        .unwrap();
        let sub = select_subsample(&cat, &SelectionCuts::mass_range(Some(11.0), None));
        assert_eq!(sub.len(), 3);
    }
}
