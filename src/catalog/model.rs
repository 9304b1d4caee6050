use std::collections::BTreeMap;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

pub const REDSHIFT: &str = "redshift";
pub const LOG_STELLAR_MASS: &str = "log_stellar_mass";
pub const EFFECTIVE_RADIUS: &str = "effective_radius";
pub const REST_U_V: &str = "rest_U_V";
pub const REST_V_J: &str = "rest_V_J";
pub const REDSHIFT_TYPE: &str = "redshift_type";

/// Spectroscopic redshift marker in the `redshift_type` column.
pub const Z_TYPE_SPEC: &str = "spec";
/// Photometric redshift marker in the `redshift_type` column.
pub const Z_TYPE_PHOT: &str = "phot";

// ---------------------------------------------------------------------------
// Column – one named column of the catalog
// ---------------------------------------------------------------------------

/// A single catalog column. Missing numeric cells are `f64::NAN`; missing
/// text cells are empty strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the numeric values, if this is a float column.
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    /// Borrow the text values, if this is a text column.
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Column::Text(v) => Some(v),
            Column::Float(_) => None,
        }
    }

    /// New column keeping only the rows where `mask` is true.
    fn filtered(&self, mask: &[bool]) -> Column {
        match self {
            Column::Float(v) => Column::Float(
                v.iter()
                    .zip(mask)
                    .filter(|(_, &keep)| keep)
                    .map(|(&x, _)| x)
                    .collect(),
            ),
            Column::Text(v) => Column::Text(
                v.iter()
                    .zip(mask)
                    .filter(|(_, &keep)| keep)
                    .map(|(s, _)| s.clone())
                    .collect(),
            ),
        }
    }

    /// Render one cell for delimited-text output.
    pub fn cell_to_string(&self, row: usize) -> String {
        match self {
            Column::Float(v) => {
                let x = v[row];
                if x.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{x}")
                }
            }
            Column::Text(v) => v[row].clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded table
// ---------------------------------------------------------------------------

/// An in-memory galaxy catalog: an ordered set of named columns over N rows.
/// Immutable after loading, except for producing filtered copies.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Column names in file order.
    names: Vec<String>,
    /// Column storage, keyed by name.
    columns: BTreeMap<String, Column>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(name, column)` pairs, preserving their order.
    pub fn from_columns(cols: Vec<(String, Column)>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for (name, col) in cols {
            catalog.push_column(name, col)?;
        }
        Ok(catalog)
    }

    /// Append a column. All columns must have the same length.
    pub fn push_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.columns.contains_key(&name) {
            bail!("duplicate column '{name}'");
        }
        if let Some(first) = self.names.first() {
            let expected = self.columns[first].len();
            if column.len() != expected {
                bail!(
                    "column '{name}' has {} rows, expected {expected}",
                    column.len()
                );
            }
        }
        self.names.push(name.clone());
        self.columns.insert(name, column);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.names
            .first()
            .map(|n| self.columns[n].len())
            .unwrap_or(0)
    }

    /// Whether the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in file order.
    pub fn colnames(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Numeric values of a column, or `None` when the column is absent or
    /// non-numeric.
    pub fn float_column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).and_then(Column::as_float)
    }

    /// Text values of a column, or `None` when absent or non-text.
    pub fn text_column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).and_then(Column::as_text)
    }

    /// New catalog keeping exactly the rows where `mask` is true, in the
    /// original row order.
    pub fn filter(&self, mask: &[bool]) -> Catalog {
        debug_assert_eq!(mask.len(), self.len());
        Catalog {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.filtered(mask)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Catalog {
        Catalog::from_columns(vec![
            (
                REDSHIFT.to_string(),
                Column::Float(vec![0.5, 1.2, 2.0]),
            ),
            (
                REDSHIFT_TYPE.to_string(),
                Column::Text(vec!["spec".into(), "phot".into(), "spec".into()]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn column_order_is_preserved() {
        let cat = small_catalog();
        assert_eq!(cat.colnames(), [REDSHIFT, REDSHIFT_TYPE]);
        assert_eq!(cat.len(), 3);
    }

    #[test]
    fn mismatched_length_is_rejected() {
        let mut cat = small_catalog();
        let err = cat
            .push_column("extra".into(), Column::Float(vec![1.0]))
            .unwrap_err();
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn filter_keeps_masked_rows_in_order() {
        let cat = small_catalog();
        let sub = cat.filter(&[true, false, true]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.float_column(REDSHIFT).unwrap(), &[0.5, 2.0]);
        assert_eq!(
            sub.text_column(REDSHIFT_TYPE).unwrap(),
            &["spec".to_string(), "spec".to_string()]
        );
    }

    #[test]
    fn nan_cells_render_as_nan_text() {
        let col = Column::Float(vec![1.5, f64::NAN]);
        assert_eq!(col.cell_to_string(0), "1.5");
        assert_eq!(col.cell_to_string(1), "NaN");
    }
}
