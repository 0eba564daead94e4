//! Exposure discovery and decoding.
//!
//! Exposures are matched by name: `<dir>/*<object>.<filter>.<ext>`, e.g.
//! `ngc7000.V.fit`. Filter names default to `R`, `V` and `B` for the red,
//! green and blue channels.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use ndarray::Array2;
use tracing::{debug, warn};
use tricolor_core::channel::{Band, ChannelSet};
use tricolor_core::error::TricolorError;
use tricolor_core::io::npy::load_channel_npy;

pub const DEFAULT_FILTERS: [&str; 3] = ["R", "V", "B"];

/// Extensions tried in order; the first one with a match wins.
const EXTENSIONS: [&str; 3] = ["fit", "fits", "npy"];

/// Three decoded exposures and the files they came from, in R, G, B order.
#[derive(Debug)]
pub struct LoadedChannels {
    pub channels: ChannelSet,
    pub paths: [PathBuf; 3],
}

#[derive(Clone, Debug)]
pub struct ChannelLoader {
    dir: PathBuf,
    filters: [String; 3],
}

impl ChannelLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            filters: DEFAULT_FILTERS.map(String::from),
        }
    }

    pub fn with_filters(mut self, filters: [String; 3]) -> Self {
        self.filters = filters;
        self
    }

    pub fn filter(&self, band: Band) -> &str {
        &self.filters[band.index()]
    }

    /// Locate the exposure of `object` taken through the filter mapped to `band`.
    pub fn find(&self, object: &str, band: Band) -> Result<PathBuf> {
        let filter = self.filter(band);
        let dir = Pattern::escape(&self.dir.to_string_lossy());
        let object_pat = Pattern::escape(object);
        let filter_pat = Pattern::escape(filter);

        for ext in EXTENSIONS {
            let pattern = format!("{dir}/*{object_pat}.{filter_pat}.{ext}");
            let mut matches: Vec<PathBuf> = glob::glob(&pattern)
                .with_context(|| format!("Invalid search pattern {pattern}"))?
                .filter_map(|entry| entry.ok())
                .collect();
            matches.sort();
            if let Some(first) = matches.first() {
                if matches.len() > 1 {
                    warn!(
                        band = %band,
                        count = matches.len(),
                        using = %first.display(),
                        "Several exposures match, using the first"
                    );
                }
                return Ok(first.clone());
            }
        }

        Err(TricolorError::MissingInput(format!(
            "no {band} exposure matching *{object}.{filter}.{{{}}} in {}",
            EXTENSIONS.join(","),
            self.dir.display()
        ))
        .into())
    }

    /// Find and decode all three exposures of `object`.
    pub fn load(&self, object: &str) -> Result<LoadedChannels> {
        let paths = [
            self.find(object, Band::Red)?,
            self.find(object, Band::Green)?,
            self.find(object, Band::Blue)?,
        ];
        let [red, green, blue] = [
            load_channel(&paths[0])?,
            load_channel(&paths[1])?,
            load_channel(&paths[2])?,
        ];
        let channels = ChannelSet::new(red, green, blue)
            .with_context(|| format!("Exposures of {object} cannot be combined"))?;
        Ok(LoadedChannels { channels, paths })
    }
}

/// Decode one exposure as raw detector counts.
pub fn load_channel(path: &Path) -> Result<Array2<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let data = match ext.as_str() {
        "npy" => load_channel_npy(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        "fit" | "fits" => load_fits(path)?,
        _ => anyhow::bail!("Unsupported exposure format: {}", path.display()),
    };
    debug!(path = %path.display(), height = data.nrows(), width = data.ncols(), "Loaded exposure");
    Ok(data)
}

#[cfg(feature = "fits")]
fn load_fits(path: &Path) -> Result<Array2<f64>> {
    use fitsio::hdu::HduInfo;
    use fitsio::FitsFile;

    let mut fptr = FitsFile::open(path)
        .with_context(|| format!("Failed to open FITS file: {}", path.display()))?;
    let hdu = fptr.primary_hdu().context("Failed to access primary HDU")?;

    // Shape comes back as [NAXIS2, NAXIS1], i.e. (height, width).
    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => anyhow::bail!("Primary HDU of {} is not an image", path.display()),
    };
    if shape.len() != 2 {
        anyhow::bail!(
            "Expected a 2D image in {}, got {} axes",
            path.display(),
            shape.len()
        );
    }

    let pixels: Vec<f64> = hdu
        .read_image(&mut fptr)
        .context("Failed to read image data")?;
    Array2::from_shape_vec((shape[0], shape[1]), pixels)
        .with_context(|| format!("Pixel count mismatch in {}", path.display()))
}

#[cfg(not(feature = "fits"))]
fn load_fits(path: &Path) -> Result<Array2<f64>> {
    anyhow::bail!(
        "{} is a FITS file; rebuild with `--features fits` to read it",
        path.display()
    )
}
