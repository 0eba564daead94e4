//! Cross-channel noise suppression.
//!
//! Hot pixels, cosmic rays and fringing show up in one filter only. A pixel
//! is treated as such an artifact when one channel is at or above
//! `noise_level` while both other channels are at or below `bg_level`; all
//! three channels of that pixel are then zeroed.

use ndarray::{s, Array2, Axis, Zip};

use crate::channel::CompositeImage;

/// Whether a single RGB triple matches the artifact rule for any channel.
pub fn is_single_channel_noise(rgb: [f64; 3], noise_level: f64, bg_level: f64) -> bool {
    (0..3).any(|c| {
        rgb[c] >= noise_level && rgb[(c + 1) % 3] <= bg_level && rgb[(c + 2) % 3] <= bg_level
    })
}

/// Mask of pixels matching the artifact rule, evaluated on an unmodified image.
pub fn noise_mask(image: &CompositeImage, noise_level: f64, bg_level: f64) -> Array2<bool> {
    let data = image.data();
    let mut mask = Array2::from_elem((image.height(), image.width()), false);
    Zip::from(&mut mask)
        .and(data.index_axis(Axis(2), 0))
        .and(data.index_axis(Axis(2), 1))
        .and(data.index_axis(Axis(2), 2))
        .for_each(|m, &r, &g, &b| {
            *m = is_single_channel_noise([r, g, b], noise_level, bg_level);
        });
    mask
}

/// Zero every pixel flagged by [`noise_mask`]. Returns the number of pixels zeroed.
///
/// The whole mask is computed before any pixel is written, so the result
/// does not depend on iteration order.
pub(crate) fn suppress_noise(image: &mut CompositeImage, noise_level: f64, bg_level: f64) -> usize {
    let mask = noise_mask(image, noise_level, bg_level);
    let data = image.data_mut();
    let mut zeroed = 0;
    for ((row, col), &flagged) in mask.indexed_iter() {
        if flagged {
            data.slice_mut(s![row, col, ..]).fill(0.0);
            zeroed += 1;
        }
    }
    zeroed
}
