use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Catalog, Column};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a galaxy catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with one scalar column per field (recommended)
/// * `.csv`     – delimited text with a header row
/// * `.json`    – records-oriented: `[{ "redshift": 0.8, ... }, ...]`
///
/// Fails up front when `path` does not exist, naming the path. On success
/// the row count and column names are reported through the log.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        bail!(
            "catalog not found at {}; check the file path or download the data",
            path.display()
        );
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalog = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    info!("Loaded {} galaxies", catalog.len());
    info!("Available columns: {:?}", catalog.colnames());
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one scalar cell per column.
/// A column is numeric when every non-empty cell parses as a float
/// (empty cells and the literal `NaN` become the NaN sentinel); any other
/// column is kept as text.
fn load_csv(path: &Path) -> Result<Catalog> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: has {} fields, expected {}",
                record.len(),
                headers.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.to_string());
        }
    }

    let cols = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| (name, infer_column(raw)))
        .collect();
    Catalog::from_columns(cols)
}

/// Turn one column of raw CSV cells into a typed [`Column`].
fn infer_column(raw: Vec<String>) -> Column {
    let is_float = raw
        .iter()
        .all(|s| s.trim().is_empty() || s.trim().parse::<f64>().is_ok());

    if is_float {
        Column::Float(
            raw.iter()
                .map(|s| {
                    let t = s.trim();
                    if t.is_empty() {
                        f64::NAN
                    } else {
                        t.parse::<f64>().unwrap_or(f64::NAN)
                    }
                })
                .collect(),
        )
    } else {
        Column::Text(raw)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "redshift": 0.82, "log_stellar_mass": 11.1, "redshift_type": "spec" },
///   ...
/// ]
/// ```
///
/// The columns are the union of the record keys; a key missing from a
/// record contributes a NaN (or empty) cell for that row.
fn load_json(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let mut cols = Vec::with_capacity(names.len());
    for name in names {
        let values: Vec<&JsonValue> = records
            .iter()
            .map(|rec| rec.get(&name).unwrap_or(&JsonValue::Null))
            .collect();

        // Column kind follows the first non-null value.
        let numeric = values
            .iter()
            .find(|v| !v.is_null())
            .map(|v| v.is_number())
            .unwrap_or(true);

        let column = if numeric {
            Column::Float(
                values
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(f64::NAN))
                    .collect(),
            )
        } else {
            Column::Text(
                values
                    .iter()
                    .map(|v| match v {
                        JsonValue::Null => String::new(),
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )
        };
        cols.push((name, column));
    }

    Catalog::from_columns(cols)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog.
///
/// Expected schema: one scalar column per field.  Float and integer columns
/// become numeric columns (nulls → NaN); string columns become text columns
/// (nulls → empty string).  Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut cols: Vec<(String, Column)> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for (idx, field) in schema.fields().iter().enumerate() {
            let array = batch.column(idx);
            let fname = field.name().as_str();
            let chunk =
                extract_column(array).with_context(|| format!("column '{fname}'"))?;

            match cols.iter_mut().find(|(name, _)| name.as_str() == fname) {
                Some((_, existing)) => append_chunk(existing, chunk),
                None => cols.push((fname.to_string(), chunk)),
            }
        }
    }

    Catalog::from_columns(cols)
}

// -- Parquet / Arrow helpers --

/// Extract a typed [`Column`] chunk from an Arrow array.
fn extract_column(col: &Arc<dyn Array>) -> Result<Column> {
    let n = col.len();
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(Column::Float(
                (0..n)
                    .map(|i| if arr.is_null(i) { f64::NAN } else { arr.value(i) })
                    .collect(),
            ))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(Column::Float(
                (0..n)
                    .map(|i| {
                        if arr.is_null(i) {
                            f64::NAN
                        } else {
                            arr.value(i) as f64
                        }
                    })
                    .collect(),
            ))
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(Column::Float(
                (0..n)
                    .map(|i| {
                        if arr.is_null(i) {
                            f64::NAN
                        } else {
                            arr.value(i) as f64
                        }
                    })
                    .collect(),
            ))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(Column::Float(
                (0..n)
                    .map(|i| {
                        if arr.is_null(i) {
                            f64::NAN
                        } else {
                            arr.value(i) as f64
                        }
                    })
                    .collect(),
            ))
        }
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(Column::Text(
                (0..n)
                    .map(|i| {
                        if arr.is_null(i) {
                            String::new()
                        } else {
                            arr.value(i).to_string()
                        }
                    })
                    .collect(),
            ))
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Ok(Column::Text(
                (0..n)
                    .map(|i| {
                        if arr.is_null(i) {
                            String::new()
                        } else {
                            arr.value(i).to_string()
                        }
                    })
                    .collect(),
            ))
        }
        other => bail!("unsupported column type {other:?}"),
    }
}

/// Append a later record batch's chunk onto an already-seen column.
fn append_chunk(existing: &mut Column, chunk: Column) {
    match (existing, chunk) {
        (Column::Float(dst), Column::Float(src)) => dst.extend(src),
        (Column::Text(dst), Column::Text(src)) => dst.extend(src),
        // Mixed chunk types cannot happen: the Arrow schema is fixed
        // across batches of one file.
        _ => unreachable!("column type changed between record batches"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_error_names_the_path() {
        let err = load_catalog(Path::new("/no/such/catalog.csv")).unwrap_err();
        assert!(err.to_string().contains("/no/such/catalog.csv"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        // The path must exist for the extension check to be reached.
        let path = std::env::temp_dir().join(format!("quiescat-{}.fits", std::process::id()));
        std::fs::write(&path, b"not a table").unwrap();
        let err = load_catalog(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains(".fits"));
    }

    #[test]
    fn infer_column_prefers_float_when_all_cells_parse() {
        let col = infer_column(vec!["1.5".into(), String::new(), "NaN".into()]);
        let values = col.as_float().unwrap();
        assert_eq!(values[0], 1.5);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
    }

    #[test]
    fn infer_column_falls_back_to_text() {
        let col = infer_column(vec!["spec".into(), "phot".into()]);
        assert!(col.as_text().is_some());
    }

    #[test]
    fn json_records_round_into_columns() {
        let path = std::env::temp_dir().join(format!("quiescat-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[
                {"redshift": 0.8, "redshift_type": "spec"},
                {"redshift": 1.4, "redshift_type": "phot"},
                {"redshift_type": "phot"}
            ]"#,
        )
        .unwrap();
        let catalog = load_catalog(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.len(), 3);
        let z = catalog.float_column("redshift").unwrap();
        assert_eq!(z[0], 0.8);
        assert!(z[2].is_nan());
        assert_eq!(catalog.text_column("redshift_type").unwrap()[1], "phot");
    }
}
