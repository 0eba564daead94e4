mod log;
mod params;

pub use log::scale_log;
pub use params::{sat_coeff, ScaleParameters};
