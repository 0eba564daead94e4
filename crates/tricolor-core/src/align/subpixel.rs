//! Sub-pixel refinement of the phase correlation peak.
//!
//! Two options:
//! 1. **Paraboloid**: 1D parabola fits through the 3x3 neighbourhood of the
//!    integer peak. Cheap, biased towards whole pixels.
//! 2. **Upsampled DFT** (Guizar-Sicairos et al., 2008): evaluates the
//!    correlation surface by matrix-multiply DFT on a fine grid around the
//!    coarse peak, giving ~1/upsample_factor pixel accuracy without
//!    upsampling the whole spectrum.
//!
//! Reference: "Efficient subpixel image registration algorithms",
//!            M. Guizar-Sicairos, S. T. Thurman, J. R. Fienup, Optics Letters 33(2), 2008.

use std::f64::consts::TAU;

use ndarray::Array2;
use num_complex::Complex;

use crate::consts::UPSAMPLE_SEARCH_WINDOW;

/// Refine peak location using paraboloid fitting on the 3x3 neighborhood.
///
/// The correlation surface is periodic, so neighbours wrap around the edges.
/// Returns (delta_row, delta_col) as fractional pixel offsets from the integer peak.
pub fn refine_peak_paraboloid(
    correlation: &Array2<f64>,
    peak_row: usize,
    peak_col: usize,
) -> (f64, f64) {
    let (h, w) = correlation.dim();
    if h < 3 || w < 3 {
        return (0.0, 0.0);
    }

    let row_prev = (peak_row + h - 1) % h;
    let row_next = (peak_row + 1) % h;
    let col_prev = (peak_col + w - 1) % w;
    let col_next = (peak_col + 1) % w;

    let centre = correlation[[peak_row, peak_col]];
    let delta_row = parabola_vertex(
        correlation[[row_prev, peak_col]],
        centre,
        correlation[[row_next, peak_col]],
    );
    let delta_col = parabola_vertex(
        correlation[[peak_row, col_prev]],
        centre,
        correlation[[peak_row, col_next]],
    );

    (delta_row, delta_col)
}

/// Vertex of the parabola through (-1, prev), (0, curr), (1, next), clamped to ±0.5.
fn parabola_vertex(prev: f64, curr: f64, next: f64) -> f64 {
    let denom = prev - 2.0 * curr + next;
    if denom.abs() > 1e-12 {
        ((prev - next) / (2.0 * denom)).clamp(-0.5, 0.5)
    } else {
        0.0
    }
}

/// Refine a coarse peak `(coarse_dy, coarse_dx)` by evaluating the inverse
/// DFT of `cross_power` on a `1/upsample_factor` grid spanning
/// `UPSAMPLE_SEARCH_WINDOW` pixels around it.
///
/// The grid is centred on the coarse peak, so a flat surface returns the
/// coarse estimate unchanged.
pub fn refine_peak_upsampled(
    cross_power: &Array2<Complex<f64>>,
    coarse_dy: f64,
    coarse_dx: f64,
    upsample_factor: usize,
) -> (f64, f64) {
    let (h, w) = cross_power.dim();
    let upsample = upsample_factor as f64;
    let half = (UPSAMPLE_SEARCH_WINDOW * upsample / 2.0).ceil() as usize;
    let size = 2 * half + 1;

    // (h, size) and (w, size): evaluate the inverse DFT at the fine positions.
    let row_kernel = build_dft_kernel(h, size, half, coarse_dy, upsample);
    let col_kernel = build_dft_kernel(w, size, half, coarse_dx, upsample);

    // (size, h) x (h, w) x (w, size) -> (size, size)
    let upsampled_cc = row_kernel.t().dot(cross_power).dot(&col_kernel);

    let mut best_row = half;
    let mut best_col = half;
    let mut best_val = upsampled_cc[[half, half]].norm();

    for r in 0..size {
        for c in 0..size {
            let val = upsampled_cc[[r, c]].norm();
            if val > best_val {
                best_val = val;
                best_row = r;
                best_col = c;
            }
        }
    }

    let refined_dy = coarse_dy + (best_row as f64 - half as f64) / upsample;
    let refined_dx = coarse_dx + (best_col as f64 - half as f64) / upsample;
    (refined_dy, refined_dx)
}

/// Kernel of shape `(n, size)` with entry (k, j) = exp(+i 2π freq_k pos_j / n).
///
/// `freq_k` follows FFT ordering (non-negative then negative frequencies);
/// `pos_j = center + (j - half) / upsample`.
fn build_dft_kernel(
    n: usize,
    size: usize,
    half: usize,
    center: f64,
    upsample: f64,
) -> Array2<Complex<f64>> {
    let mut kernel = Array2::<Complex<f64>>::zeros((n, size));

    for k in 0..n {
        let freq = if k < n.div_ceil(2) {
            k as f64
        } else {
            k as f64 - n as f64
        };

        for j in 0..size {
            let pos = center + (j as f64 - half as f64) / upsample;
            let phase = TAU * freq * pos / n as f64;
            kernel[[k, j]] = Complex::new(phase.cos(), phase.sin());
        }
    }

    kernel
}
