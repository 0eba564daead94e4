use ndarray::Array2;
use num_complex::Complex;
use tracing::{debug, warn};

use crate::channel::{AlignmentOffset, Channel};
use crate::compute::fft::{fft2d_forward, ifft2d_inverse};
use crate::consts::{CROSS_POWER_RELATIVE_FLOOR, MIN_RELIABLE_PEAK};
use crate::error::{Result, TricolorError};
use crate::pipeline::config::{AlignmentConfig, SubpixelRefinement};

use super::subpixel::{refine_peak_paraboloid, refine_peak_upsampled};

/// Outcome of phase correlation between a reference and a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseCorrelation {
    /// Shift that registers the target onto the reference.
    pub offset: AlignmentOffset,
    /// Height of the integer correlation peak; 1.0 for a perfect circular shift.
    pub peak_value: f64,
    /// Whether `peak_value` clears `MIN_RELIABLE_PEAK`.
    pub reliable: bool,
}

/// Estimate the translation between two channels.
pub fn compute_offset(
    reference: &Channel,
    target: &Channel,
    config: &AlignmentConfig,
) -> Result<PhaseCorrelation> {
    if reference.dim() != target.dim() {
        return Err(TricolorError::shape_mismatch(
            format!("{} alignment target", target.band),
            reference.dim(),
            target.dim(),
        ));
    }
    let result = compute_offset_array(&reference.data, &target.data, config)?;
    if !result.reliable {
        warn!(
            band = %target.band,
            peak = result.peak_value,
            "Weak correlation peak, alignment may be unreliable"
        );
    }
    Ok(result)
}

/// Estimate the translation between two raw arrays using FFT phase correlation.
///
/// If `target` is `reference` moved by `(dy, dx)`, the returned offset is
/// `(-dy, -dx)`: the shift that moves the target back onto the reference.
/// Flat or featureless inputs still produce a deterministic offset with a
/// low `peak_value`.
pub fn compute_offset_array(
    reference: &Array2<f64>,
    target: &Array2<f64>,
    config: &AlignmentConfig,
) -> Result<PhaseCorrelation> {
    let (h, w) = reference.dim();
    if target.dim() != (h, w) {
        return Err(TricolorError::shape_mismatch(
            "alignment target",
            (h, w),
            target.dim(),
        ));
    }
    if h == 0 || w == 0 {
        return Ok(PhaseCorrelation {
            offset: AlignmentOffset::default(),
            peak_value: 0.0,
            reliable: false,
        });
    }

    let (ref_fft, tgt_fft) = if config.window {
        (
            fft2d_forward(&apply_hann(reference)),
            fft2d_forward(&apply_hann(target)),
        )
    } else {
        (fft2d_forward(reference), fft2d_forward(target))
    };

    let cross_power = normalized_cross_power(&ref_fft, &tgt_fft);
    let correlation = ifft2d_inverse(&cross_power);

    let (peak_row, peak_col, peak_value) = find_peak(&correlation);

    // Convert to signed offset (handle wrap-around)
    let coarse_dy = signed_index(peak_row, h);
    let coarse_dx = signed_index(peak_col, w);

    let (dy, dx) = match config.refinement {
        SubpixelRefinement::None => (coarse_dy, coarse_dx),
        SubpixelRefinement::Paraboloid => {
            let (sub_dy, sub_dx) = refine_peak_paraboloid(&correlation, peak_row, peak_col);
            (coarse_dy + sub_dy, coarse_dx + sub_dx)
        }
        SubpixelRefinement::Upsampled { factor } if factor > 1 => {
            refine_peak_upsampled(&cross_power, coarse_dy, coarse_dx, factor)
        }
        SubpixelRefinement::Upsampled { .. } => (coarse_dy, coarse_dx),
    };

    debug!(coarse_dy, coarse_dx, dy, dx, peak_value, "Phase correlation");

    Ok(PhaseCorrelation {
        offset: AlignmentOffset { dx, dy },
        peak_value,
        reliable: peak_value >= MIN_RELIABLE_PEAK,
    })
}

fn signed_index(index: usize, len: usize) -> f64 {
    if index > len / 2 {
        index as f64 - len as f64
    } else {
        index as f64
    }
}

pub(crate) fn apply_hann(data: &Array2<f64>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut result = Array2::<f64>::zeros((h, w));

    for row in 0..h {
        let wy = 0.5 * (1.0 - (std::f64::consts::TAU * row as f64 / h as f64).cos());
        for col in 0..w {
            let wx = 0.5 * (1.0 - (std::f64::consts::TAU * col as f64 / w as f64).cos());
            result[[row, col]] = data[[row, col]] * wy * wx;
        }
    }

    result
}

/// `R * conj(T) / |R * conj(T)|`, with bins below the relative floor zeroed.
pub(crate) fn normalized_cross_power(
    ref_fft: &Array2<Complex<f64>>,
    tgt_fft: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut cross = ndarray::Zip::from(ref_fft)
        .and(tgt_fft)
        .map_collect(|&r, &t| r * t.conj());

    let max_mag = cross.iter().map(|c| c.norm()).fold(0.0f64, f64::max);
    let floor = max_mag * CROSS_POWER_RELATIVE_FLOOR;

    cross.mapv_inplace(|c| {
        let mag = c.norm();
        if mag > floor && mag > 0.0 {
            c / mag
        } else {
            Complex::new(0.0, 0.0)
        }
    });
    cross
}

/// First maximum in row-major order.
pub(crate) fn find_peak(data: &Array2<f64>) -> (usize, usize, f64) {
    let (h, w) = data.dim();
    let mut best_row = 0;
    let mut best_col = 0;
    let mut best_val = f64::NEG_INFINITY;

    for row in 0..h {
        for col in 0..w {
            if data[[row, col]] > best_val {
                best_val = data[[row, col]];
                best_row = row;
                best_col = col;
            }
        }
    }

    (best_row, best_col, best_val)
}
