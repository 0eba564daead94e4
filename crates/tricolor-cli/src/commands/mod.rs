pub mod compose;
pub mod config;
pub mod inspect;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use tricolor_core::channel::Band;
use tricolor_core::pipeline::config::{CompositeConfig, SubpixelRefinement};

use crate::loader::ChannelLoader;

#[derive(Clone, Copy, ValueEnum)]
pub enum BandArg {
    Red,
    Green,
    Blue,
}

impl From<BandArg> for Band {
    fn from(arg: BandArg) -> Self {
        match arg {
            BandArg::Red => Band::Red,
            BandArg::Green => Band::Green,
            BandArg::Blue => Band::Blue,
        }
    }
}

/// Input discovery and compositor settings shared by `compose` and `inspect`.
#[derive(Args)]
pub struct CompositeArgs {
    /// Object name shared by the three exposures (e.g. M42)
    pub object: String,

    /// Directory containing the exposures
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Filter names for the red, green and blue exposures
    #[arg(long, value_delimiter = ',', default_value = "R,V,B")]
    pub filters: Vec<String>,

    /// Compositor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep saturated pixels instead of replacing them
    #[arg(long)]
    pub no_sat_clip: bool,

    /// Lower limit of single-channel noise
    #[arg(long)]
    pub noise_level: Option<f64>,

    /// Upper limit of the other channels for single-channel noise
    #[arg(long)]
    pub bg_level: Option<f64>,

    /// Saturation factor, 1 (least) to 10 (most)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub sat_factor: Option<u8>,

    /// Detector counts at or above which a pixel counts as saturated
    #[arg(long)]
    pub saturation_threshold: Option<f64>,

    /// Band the other channels are aligned onto
    #[arg(long, value_enum)]
    pub reference: Option<BandArg>,

    /// Upsampling factor for sub-pixel alignment (1 = integer offsets)
    #[arg(long)]
    pub upsample: Option<usize>,

    /// Composite the channels as loaded, without alignment
    #[arg(long)]
    pub no_align: bool,
}

impl CompositeArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn load_config(&self) -> Result<CompositeConfig> {
        let mut config = if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid compositor config")?
        } else {
            CompositeConfig::default()
        };

        if self.no_sat_clip {
            config.no_sat_clip = true;
        }
        if let Some(level) = self.noise_level {
            config.noise_level = level;
        }
        if let Some(level) = self.bg_level {
            config.bg_level = level;
        }
        if let Some(factor) = self.sat_factor {
            config.sat_factor = factor;
        }
        if let Some(threshold) = self.saturation_threshold {
            config.saturation_threshold = threshold;
        }
        if let Some(reference) = self.reference {
            config.alignment.reference = reference.into();
        }
        if let Some(factor) = self.upsample {
            config.alignment.refinement = SubpixelRefinement::Upsampled { factor };
        }
        if self.no_align {
            config.alignment.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn loader(&self) -> Result<ChannelLoader> {
        let filters: [String; 3] = match self.filters.as_slice() {
            [r, g, b] => [r.clone(), g.clone(), b.clone()],
            other => bail!(
                "Expected three filter names (red, green, blue), got {}",
                other.len()
            ),
        };
        Ok(ChannelLoader::new(&self.dir).with_filters(filters))
    }
}
