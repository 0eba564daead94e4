use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Mean and population standard deviation of the finite pixel values.
///
/// Returns `(0.0, 0.0)` when there are no finite values.
pub fn compute_mean_stddev(data: &Array2<f64>) -> (f64, f64) {
    let (n, sum) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0usize, 0.0f64), |(n, s), &v| (n + 1, s + v));
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    let var = data
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| (v - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    (mean, var.sqrt())
}

/// Fixed-width histogram over a closed range `[lower, upper]`.
///
/// Binning follows numpy: values outside the range (and non-finite values)
/// are ignored and the upper edge belongs to the last bin. An upper bound
/// below the lower one is raised to it, and a degenerate range is widened
/// by 0.5 on each side.
#[derive(Clone, Debug)]
pub struct Histogram {
    lower: f64,
    upper: f64,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn build(data: &Array2<f64>, bins: usize, lower: f64, upper: f64) -> Self {
        let bins = bins.max(1);
        let upper = upper.max(lower);
        let (lower, upper) = if upper > lower {
            (lower, upper)
        } else {
            (lower - 0.5, upper + 0.5)
        };

        let counts = if data.len() >= PARALLEL_PIXEL_THRESHOLD {
            let rows: Vec<_> = data.rows().into_iter().collect();
            rows.par_iter()
                .map(|row| {
                    let mut partial = vec![0u64; bins];
                    for &v in row.iter() {
                        if let Some(bin) = bin_index(v, lower, upper, bins) {
                            partial[bin] += 1;
                        }
                    }
                    partial
                })
                .reduce(
                    || vec![0u64; bins],
                    |mut acc, partial| {
                        for (a, p) in acc.iter_mut().zip(partial) {
                            *a += p;
                        }
                        acc
                    },
                )
        } else {
            let mut counts = vec![0u64; bins];
            for &v in data.iter() {
                if let Some(bin) = bin_index(v, lower, upper, bins) {
                    counts[bin] += 1;
                }
            }
            counts
        };

        Self {
            lower,
            upper,
            counts,
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn range(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.lower + (bin as f64 + 0.5) * self.bin_width()
    }

    /// Index of the most populated bin. Ties resolve to the lowest bin.
    pub fn mode_bin(&self) -> usize {
        let mut best_bin = 0;
        let mut best_count = 0;
        for (bin, &count) in self.counts.iter().enumerate() {
            if count > best_count {
                best_count = count;
                best_bin = bin;
            }
        }
        best_bin
    }

    /// Center of the most populated bin.
    pub fn mode_center(&self) -> f64 {
        self.bin_center(self.mode_bin())
    }
}

fn bin_index(v: f64, lower: f64, upper: f64, bins: usize) -> Option<usize> {
    if !v.is_finite() || v < lower || v > upper {
        return None;
    }
    let bin = ((v - lower) / (upper - lower) * bins as f64) as usize;
    Some(bin.min(bins - 1))
}
