use ndarray::Array2;
use tracing::{info, warn};

use crate::align::align_channels;
use crate::background::estimate_peak;
use crate::channel::{Band, Channel, ChannelSet, CompositeImage};
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::Result;
use crate::scale::{scale_log, ScaleParameters};

use super::config::CompositeConfig;
use super::noise::suppress_noise;
use super::types::{Composite, CompositeReport, CompositeStage, NoOpReporter, ProgressReporter};

/// Build the denoised RGB composite from three raw channels.
pub fn compose(channels: &ChannelSet, config: &CompositeConfig) -> Result<Composite> {
    compose_reported(channels, config, &NoOpReporter)
}

/// Build the composite, reporting stage progress to `reporter`.
///
/// Any failure aborts the whole run; no partial composite is returned.
pub fn compose_reported(
    channels: &ChannelSet,
    config: &CompositeConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Composite> {
    config.validate()?;
    let (h, w) = channels.dim();
    info!(
        width = w,
        height = h,
        sat_factor = config.sat_factor,
        noise_level = config.noise_level,
        bg_level = config.bg_level,
        no_sat_clip = config.no_sat_clip,
        "Building composite"
    );

    // Peaks come from the raw exposures, before resampling.
    reporter.begin_stage(CompositeStage::BackgroundEstimation);
    let peaks = Band::ALL.map(|band| estimate_peak(channels.get(band)));
    info!(
        red = peaks[0],
        green = peaks[1],
        blue = peaks[2],
        "Background peaks"
    );
    reporter.finish_stage();

    reporter.begin_stage(CompositeStage::Alignment);
    let aligned = align_channels(channels, &config.alignment)?;
    reporter.finish_stage();

    reporter.begin_stage(CompositeStage::Scaling);
    let sat_coeff = config.sat_coeff();
    let scales = peaks.map(|peak| {
        ScaleParameters::from_peak(peak, sat_coeff)
            .no_sat_clip(config.no_sat_clip)
            .saturation_threshold(config.saturation_threshold)
    });
    let [red, green, blue] = scale_channels(&aligned.channels, &scales)?;
    let mut image = CompositeImage::from_planes([red.view(), green.view(), blue.view()])?;
    reporter.finish_stage();

    reporter.begin_stage(CompositeStage::NoiseSuppression);
    let zeroed_pixels = suppress_noise(&mut image, config.noise_level, config.bg_level);
    info!(zeroed_pixels, "Noise suppression complete");
    reporter.finish_stage();

    Ok(Composite {
        image,
        report: CompositeReport {
            peaks,
            scales,
            alignments: aligned.alignments,
            sat_coeff,
            zeroed_pixels,
        },
    })
}

/// Log-scale each channel with its own parameters, in R, G, B order.
///
/// The first `InvalidRange` aborts the run and is returned as-is.
pub fn scale_channels(
    channels: &[Channel; COLOR_CHANNEL_COUNT],
    scales: &[ScaleParameters; COLOR_CHANNEL_COUNT],
) -> Result<[Array2<f64>; COLOR_CHANNEL_COUNT]> {
    let scale = |i: usize| -> Result<Array2<f64>> {
        let channel = &channels[i];
        scale_log(&channel.data, &scales[i]).inspect_err(|e| {
            warn!(band = %channel.band, error = %e, "Channel scaling failed");
        })
    };
    Ok([scale(0)?, scale(1)?, scale(2)?])
}
