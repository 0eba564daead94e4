pub mod config;
mod noise;
mod orchestrator;
mod types;

pub use noise::{is_single_channel_noise, noise_mask};
pub use orchestrator::{compose, compose_reported, scale_channels};
pub use types::{Composite, CompositeReport, CompositeStage, ProgressReporter};
