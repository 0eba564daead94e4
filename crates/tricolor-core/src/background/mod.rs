pub mod histogram;
pub mod peak;

pub use histogram::{compute_mean_stddev, Histogram};
pub use peak::{estimate_peak, peak_histogram};
