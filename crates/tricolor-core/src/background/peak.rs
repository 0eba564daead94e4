//! Background level estimation from the histogram mode.
//!
//! In a typical exposure the sky background covers far more pixels than any
//! source, so the most populated histogram bin tracks the background level
//! even with a long tail of bright sources.

use tracing::debug;

use crate::channel::Channel;
use crate::consts::PEAK_HISTOGRAM_BINS;

use super::histogram::{compute_mean_stddev, Histogram};

/// Histogram of a channel over `[0, mean + 1 std]` with 1000 bins.
pub fn peak_histogram(channel: &Channel) -> Histogram {
    let (mean, std) = compute_mean_stddev(&channel.data);
    Histogram::build(&channel.data, PEAK_HISTOGRAM_BINS, 0.0, mean + std)
}

/// Estimate the dominant background intensity of a channel.
///
/// Returns the center of the most populated bin; ties go to the lowest bin.
pub fn estimate_peak(channel: &Channel) -> f64 {
    let hist = peak_histogram(channel);
    let peak = hist.mode_center();
    debug!(
        band = %channel.band,
        peak,
        bin_width = hist.bin_width(),
        "Estimated background peak"
    );
    peak
}
