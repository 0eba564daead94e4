use ndarray::Array2;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, SENTINEL};
use crate::error::{Result, TricolorError};

use super::params::ScaleParameters;

/// Map raw detector counts to `[SENTINEL, 1]` on a log scale.
///
/// 1. Unless `no_sat_clip`, pixels at or above the saturation threshold
///    become `SENTINEL`.
/// 2. Unset black/white points default to the clipped channel's min/max.
/// 3. `scale_min > 0` and `scale_max > scale_min` or `InvalidRange`.
/// 4. `p -> (log10 p - log10 min) / (log10 max - log10 min)`.
/// 5. Results `<= SENTINEL` (including `-inf` and NaN from non-positive
///    pixels) become `SENTINEL`; results `>= 1` become 1.
///
/// The input is not modified.
pub fn scale_log(data: &Array2<f64>, params: &ScaleParameters) -> Result<Array2<f64>> {
    let mut image = data.to_owned();

    if !params.no_sat_clip {
        let threshold = params.saturation_threshold;
        map_inplace(&mut image, move |v| if v >= threshold { SENTINEL } else { v });
    }

    let scale_min = params
        .scale_min
        .unwrap_or_else(|| image.iter().copied().fold(f64::NAN, f64::min));
    let scale_max = params
        .scale_max
        .unwrap_or_else(|| image.iter().copied().fold(f64::NAN, f64::max));

    // Also rejects NaN bounds.
    let valid = scale_min > 0.0 && scale_max > scale_min;
    if !valid {
        return Err(TricolorError::InvalidRange {
            scale_min,
            scale_max,
        });
    }

    let lower_lim = scale_min.log10();
    let factor = scale_max.log10() - lower_lim;

    map_inplace(&mut image, move |p| {
        let v = (p.log10() - lower_lim) / factor;
        if v.is_nan() || v <= SENTINEL {
            SENTINEL
        } else if v >= 1.0 {
            1.0
        } else {
            v
        }
    });

    Ok(image)
}

fn map_inplace<F>(image: &mut Array2<f64>, f: F)
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    if image.len() >= PARALLEL_PIXEL_THRESHOLD {
        image.par_mapv_inplace(f);
    } else {
        image.mapv_inplace(f);
    }
}
