/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Near-zero placeholder for "no signal": saturated pixels and invalid log results.
pub const SENTINEL: f64 = 1e-10;

/// Detector counts at or above which a pixel is treated as saturated / cosmic ray.
pub const DEFAULT_SATURATION_THRESHOLD: f64 = 60_000.0;

/// Number of bins used for the background histogram.
pub const PEAK_HISTOGRAM_BINS: usize = 1000;

/// Black point sits this fraction above the histogram peak.
pub const BLACK_POINT_OFFSET: f64 = 0.01;

/// Default lower limit of single-channel noise.
pub const DEFAULT_NOISE_LEVEL: f64 = 0.3;

/// Default upper limit of the background in the other two channels.
pub const DEFAULT_BG_LEVEL: f64 = 0.8;

/// Default saturation factor (1 = least saturated, 10 = most).
pub const DEFAULT_SAT_FACTOR: u8 = 5;

/// Valid range of the saturation factor.
pub const SAT_FACTOR_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Number of channels in the composite (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Default upsampling factor for DFT peak refinement.
/// 20 gives ~0.05 px accuracy; 100 gives ~0.01 px accuracy.
pub const DEFAULT_UPSAMPLE_FACTOR: usize = 100;

/// Width (in pixels) of the window searched around the coarse peak during
/// upsampled DFT refinement.
pub const UPSAMPLE_SEARCH_WINDOW: f64 = 1.5;

/// Cross-power bins weaker than this fraction of the strongest bin are
/// dropped before phase normalization.
pub const CROSS_POWER_RELATIVE_FLOOR: f64 = 1e-20;

/// Phase correlation peak height below which an offset is reported as unreliable.
pub const MIN_RELIABLE_PEAK: f64 = 0.05;
