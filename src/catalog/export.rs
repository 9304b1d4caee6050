use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::model::Catalog;

/// Write the catalog as delimited text: header row of column names, one
/// record per row. NaN cells are written as `NaN`; an existing file at
/// `path` is overwritten. The saved path is reported through the log.
pub fn write_csv(catalog: &Catalog, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(catalog.colnames())
        .context("writing CSV header")?;

    for row in 0..catalog.len() {
        let record: Vec<String> = catalog
            .colnames()
            .iter()
            .map(|name| {
                catalog
                    .column(name)
                    .map(|col| col.cell_to_string(row))
                    .unwrap_or_default()
            })
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    writer.flush().context("flushing CSV")?;
    info!("Saved catalog to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::loader::load_catalog;
    use crate::catalog::model::{Column, EFFECTIVE_RADIUS, REDSHIFT, REDSHIFT_TYPE};

    fn temp_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("quiescat-{}-{tag}.csv", std::process::id()))
    }

    #[test]
    fn round_trip_preserves_rows_and_values() {
        let cat = Catalog::from_columns(vec![
            (
                REDSHIFT.to_string(),
                Column::Float(vec![0.31, 1.275, 2.04]),
            ),
            (
                EFFECTIVE_RADIUS.to_string(),
                Column::Float(vec![1.8, f64::NAN, 0.65]),
            ),
            (
                REDSHIFT_TYPE.to_string(),
                Column::Text(vec!["spec".into(), "phot".into(), "phot".into()]),
            ),
        ])
        .unwrap();

        let path = temp_path("roundtrip");
        write_csv(&cat, &path).unwrap();
        let reloaded = load_catalog(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.len(), cat.len());
        assert_eq!(reloaded.colnames(), cat.colnames());

        let before = cat.float_column(REDSHIFT).unwrap();
        let after = reloaded.float_column(REDSHIFT).unwrap();
        for (&a, &b) in before.iter().zip(after) {
            assert!((a - b).abs() < 1e-12);
        }

        let radius = reloaded.float_column(EFFECTIVE_RADIUS).unwrap();
        assert!(radius[1].is_nan());
        assert_eq!(
            reloaded.text_column(REDSHIFT_TYPE).unwrap(),
            cat.text_column(REDSHIFT_TYPE).unwrap()
        );
    }

    #[test]
    fn export_overwrites_an_existing_file() {
        let path = temp_path("overwrite");
        std::fs::write(&path, "stale contents").unwrap();

        let cat = Catalog::from_columns(vec![(
            REDSHIFT.to_string(),
            Column::Float(vec![0.5]),
        )])
        .unwrap();
        write_csv(&cat, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.starts_with("redshift"));
        assert!(!text.contains("stale"));
    }
}
