//! NaN-aware reductions and binning.
//!
//! Reductions skip non-finite values and return `None` for empty input;
//! callers decide whether an empty series is an error. Histogram edge
//! semantics match the usual scientific convention: equal-width half-open
//! bins `[lo, hi)` with the final bin closed above, so a value equal to the
//! upper range limit lands in the last bin.

/// Keep only the finite values of a series.
pub fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Minimum over the finite values.
pub fn nan_min(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::min)
}

/// Maximum over the finite values.
pub fn nan_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max)
}

/// Median over the finite values (mean of the middle two for even counts).
pub fn nan_median(values: &[f64]) -> Option<f64> {
    let mut v = finite(values);
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let n = v.len();
    if n % 2 == 1 {
        Some(v[n / 2])
    } else {
        Some((v[n / 2 - 1] + v[n / 2]) / 2.0)
    }
}

/// Population standard deviation over the finite values.
pub fn nan_std(values: &[f64]) -> Option<f64> {
    let v = finite(values);
    if v.is_empty() {
        return None;
    }
    let n = v.len() as f64;
    let mean = v.iter().sum::<f64>() / n;
    let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Some(var.sqrt())
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// A 1D histogram: `edges` has `counts.len() + 1` entries.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Center of bin `i`.
    pub fn center(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin the finite values into `bins` equal-width bins. With no explicit
/// `range` the bins span the data range. Returns `None` when there is
/// nothing to bin or `bins` is zero.
pub fn histogram(values: &[f64], bins: usize, range: Option<(f64, f64)>) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let v = finite(values);
    let (mut lo, mut hi) = match range {
        Some(r) => r,
        None => (nan_min(&v)?, nan_max(&v)?),
    };
    if lo == hi {
        // Degenerate range: widen by half a unit on both sides.
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for x in v {
        if x < lo || x > hi {
            continue;
        }
        let idx = (((x - lo) / (hi - lo)) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    Some(Histogram { edges, counts })
}

/// A 2D histogram over an x/y grid, `bins × bins` cells.
#[derive(Debug, Clone)]
pub struct Histogram2d {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    counts: Vec<usize>,
    bins: usize,
}

impl Histogram2d {
    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn count(&self, ix: usize, iy: usize) -> usize {
        self.counts[iy * self.bins + ix]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin paired series into a square grid spanning the data range. Pairs with
/// a non-finite member are dropped. `x` and `y` must have equal length.
pub fn histogram2d(x: &[f64], y: &[f64], bins: usize) -> Option<Histogram2d> {
    assert_eq!(x.len(), y.len(), "paired series must have equal length");
    if bins == 0 {
        return None;
    }
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.is_empty() {
        return None;
    }

    let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let x_hist = histogram(&xs, bins, None)?;
    let y_hist = histogram(&ys, bins, None)?;

    let (x_lo, x_hi) = (x_hist.edges[0], x_hist.edges[bins]);
    let (y_lo, y_hi) = (y_hist.edges[0], y_hist.edges[bins]);
    let mut counts = vec![0usize; bins * bins];
    for (a, b) in pairs {
        let ix = ((((a - x_lo) / (x_hi - x_lo)) * bins as f64) as usize).min(bins - 1);
        let iy = ((((b - y_lo) / (y_hi - y_lo)) * bins as f64) as usize).min(bins - 1);
        counts[iy * bins + ix] += 1;
    }
    Some(Histogram2d {
        x_edges: x_hist.edges,
        y_edges: y_hist.edges,
        counts,
        bins,
    })
}

// ---------------------------------------------------------------------------
// Running medians
// ---------------------------------------------------------------------------

/// One running-median point: the bin center, the median of `y` in the bin,
/// and the standard error `std / sqrt(n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MedianPoint {
    pub center: f64,
    pub median: f64,
    pub stderr: f64,
    pub count: usize,
}

/// Median of `y` in half-open `x` bins `[edges[i], edges[i+1])`.
///
/// Bins containing three or fewer rows are omitted from the result rather
/// than reported as empty points.
pub fn running_median(x: &[f64], y: &[f64], edges: &[f64]) -> Vec<MedianPoint> {
    assert_eq!(x.len(), y.len(), "paired series must have equal length");
    let mut points = Vec::new();
    for win in edges.windows(2) {
        let (lo, hi) = (win[0], win[1]);
        let in_bin: Vec<f64> = x
            .iter()
            .zip(y)
            .filter(|(&xv, _)| xv >= lo && xv < hi)
            .map(|(_, &yv)| yv)
            .collect();
        if in_bin.len() > 3 {
            let n = in_bin.len();
            points.push(MedianPoint {
                center: (lo + hi) / 2.0,
                median: nan_median(&in_bin).unwrap_or(f64::NAN),
                stderr: nan_std(&in_bin).unwrap_or(f64::NAN) / (n as f64).sqrt(),
                count: n,
            });
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reductions_skip_nan() {
        let v = [1.0, f64::NAN, 3.0, 2.0];
        assert_eq!(nan_min(&v), Some(1.0));
        assert_eq!(nan_max(&v), Some(3.0));
        assert_eq!(nan_median(&v), Some(2.0));
    }

    #[test]
    fn median_of_even_count_averages_the_middle_pair() {
        assert_eq!(nan_median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(nan_min(&[]), None);
        assert_eq!(nan_median(&[f64::NAN]), None);
        assert_eq!(nan_std(&[]), None);
    }

    #[test]
    fn std_is_population_std() {
        // Values 1..4: mean 2.5, variance 1.25.
        let s = nan_std(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((s - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn histogram_last_bin_is_closed_above() {
        let h = histogram(&[0.0, 0.5, 1.0], 2, Some((0.0, 1.0))).unwrap();
        assert_eq!(h.counts, [1, 2]);
        assert_eq!(h.edges, [0.0, 0.5, 1.0]);
    }

    #[test]
    fn histogram_drops_out_of_range_values() {
        let h = histogram(&[-1.0, 0.25, 2.0], 1, Some((0.0, 1.0))).unwrap();
        assert_eq!(h.counts, [1]);
    }

    #[test]
    fn histogram2d_counts_pairs() {
        let x = [0.0, 0.0, 1.0, 1.0];
        let y = [0.0, 0.0, 1.0, f64::NAN];
        let h = histogram2d(&x, &y, 2).unwrap();
        assert_eq!(h.count(0, 0), 2);
        assert_eq!(h.count(1, 1), 1);
        assert_eq!(h.max_count(), 2);
    }

    #[test]
    fn running_median_omits_sparse_bins() {
        // First bin holds 3 rows (omitted), second holds 4 (kept).
        let x = [0.1, 0.2, 0.3, 1.1, 1.2, 1.3, 1.4];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let pts = running_median(&x, &y, &[0.0, 1.0, 2.0]);
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].center, 1.5);
        assert_eq!(pts[0].median, 5.5);
        assert_eq!(pts[0].count, 4);
    }

    #[test]
    fn running_median_upper_edge_is_exclusive() {
        let x = [0.0, 0.2, 0.4, 0.6, 1.0];
        let y = [1.0; 5];
        // z = 1.0 sits on the upper edge and is excluded, leaving 4 rows.
        let pts = running_median(&x, &y, &[0.0, 1.0]);
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].count, 4);
    }
}
