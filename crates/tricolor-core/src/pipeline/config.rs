use serde::{Deserialize, Serialize};

use crate::channel::Band;
use crate::consts::{
    DEFAULT_BG_LEVEL, DEFAULT_NOISE_LEVEL, DEFAULT_SATURATION_THRESHOLD, DEFAULT_SAT_FACTOR,
    DEFAULT_UPSAMPLE_FACTOR, SAT_FACTOR_RANGE,
};
use crate::error::{Result, TricolorError};
use crate::scale::sat_coeff;

/// Everything the compositor needs besides the three channels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Skip replacing saturated pixels with the sentinel.
    pub no_sat_clip: bool,
    /// Lower limit of single-channel noise. Lowering this removes more noise
    /// but possibly real data too.
    pub noise_level: f64,
    /// Upper limit of the other two channels when a pixel counts as
    /// single-channel noise. Raising this removes more noise.
    pub bg_level: f64,
    /// 1 (least saturated) to 10 (most saturated).
    pub sat_factor: u8,
    /// Detector counts at or above which a pixel is clipped.
    pub saturation_threshold: f64,
    pub alignment: AlignmentConfig,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            no_sat_clip: false,
            noise_level: DEFAULT_NOISE_LEVEL,
            bg_level: DEFAULT_BG_LEVEL,
            sat_factor: DEFAULT_SAT_FACTOR,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
            alignment: AlignmentConfig::default(),
        }
    }
}

impl CompositeConfig {
    pub fn validate(&self) -> Result<()> {
        if !SAT_FACTOR_RANGE.contains(&self.sat_factor) {
            return Err(TricolorError::InvalidConfig(format!(
                "sat_factor must be in {}..={}, got {}",
                SAT_FACTOR_RANGE.start(),
                SAT_FACTOR_RANGE.end(),
                self.sat_factor
            )));
        }
        if !self.noise_level.is_finite() || !self.bg_level.is_finite() {
            return Err(TricolorError::InvalidConfig(format!(
                "noise_level and bg_level must be finite, got {} and {}",
                self.noise_level, self.bg_level
            )));
        }
        if self.saturation_threshold.is_nan() || self.saturation_threshold <= 0.0 {
            return Err(TricolorError::InvalidConfig(format!(
                "saturation_threshold must be positive, got {}",
                self.saturation_threshold
            )));
        }
        if let SubpixelRefinement::Upsampled { factor: 0 } = self.alignment.refinement {
            return Err(TricolorError::InvalidConfig(
                "upsample factor must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// White-point multiplier derived from `sat_factor`.
    pub fn sat_coeff(&self) -> f64 {
        sat_coeff(self.sat_factor)
    }
}

/// How the translation between channels is measured and applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Turn off to composite the channels exactly as loaded.
    pub enabled: bool,
    /// Band the other two channels are registered onto.
    pub reference: Band,
    /// Apply a Hann window before the FFT.
    pub window: bool,
    pub refinement: SubpixelRefinement,
    pub edge: EdgeMode,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reference: Band::Blue,
            window: false,
            refinement: SubpixelRefinement::default(),
            edge: EdgeMode::default(),
        }
    }
}

/// Sub-pixel refinement of the correlation peak.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SubpixelRefinement {
    /// Integer-pixel offsets only.
    None,
    /// Parabola fit through the 3x3 neighbourhood of the peak.
    Paraboloid,
    /// Matrix-multiply DFT upsampling around the peak.
    Upsampled { factor: usize },
}

impl Default for SubpixelRefinement {
    fn default() -> Self {
        Self::Upsampled {
            factor: DEFAULT_UPSAMPLE_FACTOR,
        }
    }
}

impl std::fmt::Display for SubpixelRefinement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "Integer"),
            Self::Paraboloid => write!(f, "Paraboloid"),
            Self::Upsampled { factor } => write!(f, "Upsampled DFT (x{factor})"),
        }
    }
}

/// Fill rule for pixels shifted in from outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Replicate the nearest border pixel.
    #[default]
    Nearest,
    /// Fill with a constant value.
    Constant(f64),
}
