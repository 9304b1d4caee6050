//! Generate a synthetic quiescent-galaxy catalog for trying out the
//! summary, selection, and plotting helpers without real survey data.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use quiescat::catalog::export::write_csv;
use quiescat::catalog::model::{
    Catalog, Column, EFFECTIVE_RADIUS, LOG_STELLAR_MASS, REDSHIFT, REDSHIFT_TYPE, REST_U_V,
    REST_V_J, Z_TYPE_PHOT, Z_TYPE_SPEC,
};

const N_GALAXIES: usize = 2000;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Synthesize a catalog with the mass–size relation, a UVJ quiescent clump,
/// and a spec/phot redshift mix baked in. A few percent of the radii are
/// NaN, mimicking failed profile fits.
fn synthesize(rng: &mut SimpleRng) -> Result<Catalog> {
    let mut redshift = Vec::with_capacity(N_GALAXIES);
    let mut log_mass = Vec::with_capacity(N_GALAXIES);
    let mut radius = Vec::with_capacity(N_GALAXIES);
    let mut rest_uv = Vec::with_capacity(N_GALAXIES);
    let mut rest_vj = Vec::with_capacity(N_GALAXIES);
    let mut z_type = Vec::with_capacity(N_GALAXIES);

    for _ in 0..N_GALAXIES {
        let z = 0.1 + 2.9 * rng.next_f64().powf(0.8);
        let mass = rng.gauss(11.0, 0.45).clamp(10.0, 12.2);

        let re = if rng.next_f64() < 0.03 {
            f64::NAN
        } else {
            let log_re =
                0.75 * (mass - 11.0) - 0.19 - 0.15 * (z - 1.0) + rng.gauss(0.0, 0.15);
            10f64.powf(log_re)
        };

        // ~70% quiescent: colors hugging the UVJ box; the rest star-forming.
        let (vj, uv) = if rng.next_f64() < 0.7 {
            let vj = rng.gauss(1.1, 0.25);
            (vj, 0.88 * vj + 0.59 + rng.gauss(0.25, 0.12).abs())
        } else {
            (rng.gauss(0.7, 0.35), rng.gauss(0.9, 0.3))
        };

        redshift.push(z);
        log_mass.push(mass);
        radius.push(re);
        rest_uv.push(uv);
        rest_vj.push(vj);
        z_type.push(
            if rng.next_f64() < 0.3 {
                Z_TYPE_SPEC
            } else {
                Z_TYPE_PHOT
            }
            .to_string(),
        );
    }

    Catalog::from_columns(vec![
        (REDSHIFT.to_string(), Column::Float(redshift)),
        (LOG_STELLAR_MASS.to_string(), Column::Float(log_mass)),
        (EFFECTIVE_RADIUS.to_string(), Column::Float(radius)),
        (REST_U_V.to_string(), Column::Float(rest_uv)),
        (REST_V_J.to_string(), Column::Float(rest_vj)),
        (REDSHIFT_TYPE.to_string(), Column::Text(z_type)),
    ])
}

/// Write the catalog as a Parquet file, one scalar Arrow column per field.
fn write_parquet(catalog: &Catalog, path: &Path) -> Result<()> {
    let mut fields = Vec::new();
    let mut arrays: Vec<Arc<dyn Array>> = Vec::new();

    for name in catalog.colnames() {
        match catalog.column(name).context("column lookup")? {
            Column::Float(values) => {
                fields.push(Field::new(name.as_str(), DataType::Float64, false));
                arrays.push(Arc::new(Float64Array::from(values.clone())));
            }
            Column::Text(values) => {
                fields.push(Field::new(name.as_str(), DataType::Utf8, false));
                arrays.push(Arc::new(StringArray::from(
                    values.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                )));
            }
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("creating RecordBatch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_catalog.parquet".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let catalog = synthesize(&mut rng)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "parquet" | "pq" => write_parquet(&catalog, path)?,
        "csv" => write_csv(&catalog, path)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} galaxies to {output}", catalog.len());
    Ok(())
}
