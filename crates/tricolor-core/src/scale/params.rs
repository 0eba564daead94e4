use serde::{Deserialize, Serialize};

use crate::consts::{BLACK_POINT_OFFSET, DEFAULT_SATURATION_THRESHOLD};

/// White-point multiplier for a saturation factor in `[1, 10]`.
///
/// Ranges from 2.4 (factor 1) down to 1.5 (factor 10): a lower factor puts
/// the white point higher and gives a dimmer, less saturated result.
pub fn sat_coeff(sat_factor: u8) -> f64 {
    (10.0 - sat_factor as f64) / 10.0 + 1.5
}

/// Black/white points and clipping behaviour for one channel.
///
/// `None` for either point means "use the channel's observed extreme".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleParameters {
    pub scale_min: Option<f64>,
    pub scale_max: Option<f64>,
    pub no_sat_clip: bool,
    pub saturation_threshold: f64,
}

impl Default for ScaleParameters {
    fn default() -> Self {
        Self {
            scale_min: None,
            scale_max: None,
            no_sat_clip: false,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
        }
    }
}

impl ScaleParameters {
    /// Explicit black and white points with default clipping.
    pub fn with_range(scale_min: f64, scale_max: f64) -> Self {
        Self {
            scale_min: Some(scale_min),
            scale_max: Some(scale_max),
            ..Default::default()
        }
    }

    /// Derive black/white points from a background peak:
    /// black = peak + 1%, white = `sat_coeff` * peak.
    pub fn from_peak(peak: f64, sat_coeff: f64) -> Self {
        Self::with_range(peak + BLACK_POINT_OFFSET * peak, sat_coeff * peak)
    }

    pub fn no_sat_clip(mut self, no_sat_clip: bool) -> Self {
        self.no_sat_clip = no_sat_clip;
        self
    }

    pub fn saturation_threshold(mut self, threshold: f64) -> Self {
        self.saturation_threshold = threshold;
        self
    }
}
