use crate::align::ChannelAlignment;
use crate::channel::{Band, CompositeImage};
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::scale::ScaleParameters;

/// Compositing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeStage {
    BackgroundEstimation,
    Alignment,
    Scaling,
    NoiseSuppression,
}

impl CompositeStage {
    /// Stages in execution order.
    pub const ALL: [CompositeStage; 4] = [
        Self::BackgroundEstimation,
        Self::Alignment,
        Self::Scaling,
        Self::NoiseSuppression,
    ];
}

impl std::fmt::Display for CompositeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackgroundEstimation => write!(f, "Estimating background"),
            Self::Alignment => write!(f, "Aligning channels"),
            Self::Scaling => write!(f, "Scaling channels"),
            Self::NoiseSuppression => write!(f, "Suppressing noise"),
        }
    }
}

/// Numbers gathered while building a composite.
#[derive(Clone, Debug)]
pub struct CompositeReport {
    /// Histogram peaks of the raw channels, in R, G, B order.
    pub peaks: [f64; COLOR_CHANNEL_COUNT],
    /// Black/white points used per channel, in R, G, B order.
    pub scales: [ScaleParameters; COLOR_CHANNEL_COUNT],
    /// Measured drift of the non-reference channels.
    pub alignments: Vec<ChannelAlignment>,
    pub sat_coeff: f64,
    /// Pixels zeroed by noise suppression.
    pub zeroed_pixels: usize,
}

impl CompositeReport {
    pub fn peak(&self, band: Band) -> f64 {
        self.peaks[band.index()]
    }

    pub fn scale(&self, band: Band) -> &ScaleParameters {
        &self.scales[band.index()]
    }

    pub fn alignment(&self, band: Band) -> Option<&ChannelAlignment> {
        self.alignments.iter().find(|a| a.band == band)
    }
}

/// Finished composite plus the numbers that produced it.
#[derive(Clone, Debug)]
pub struct Composite {
    pub image: CompositeImage,
    pub report: CompositeReport,
}

/// Progress reporting for the compositor.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started.
    fn begin_stage(&self, _stage: CompositeStage) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `compose` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
