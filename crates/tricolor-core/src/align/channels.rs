use tracing::info;

use crate::channel::{Band, Channel, ChannelSet};
use crate::error::Result;
use crate::pipeline::config::AlignmentConfig;

use super::interpolation::shift_channel;
use super::phase_correlation::{compute_offset, PhaseCorrelation};

/// Measured drift of one channel relative to the reference band.
#[derive(Clone, Copy, Debug)]
pub struct ChannelAlignment {
    pub band: Band,
    pub correlation: PhaseCorrelation,
}

/// Channels resampled onto the reference grid, in R, G, B order.
#[derive(Clone, Debug)]
pub struct AlignedChannels {
    pub channels: [Channel; 3],
    pub alignments: Vec<ChannelAlignment>,
}

impl AlignedChannels {
    pub fn get(&self, band: Band) -> &Channel {
        &self.channels[band.index()]
    }
}

/// Register the non-reference channels onto `config.reference`.
///
/// The reference channel is passed through untouched. With alignment
/// disabled all channels are passed through.
pub fn align_channels(set: &ChannelSet, config: &AlignmentConfig) -> Result<AlignedChannels> {
    let reference = set.get(config.reference);
    let mut alignments = Vec::with_capacity(2);

    let mut aligned = |band: Band| -> Result<Channel> {
        let channel = set.get(band);
        if !config.enabled || band == config.reference {
            return Ok(channel.clone());
        }
        let correlation = compute_offset(reference, channel, config)?;
        info!(
            band = %band,
            reference = %config.reference,
            dy = correlation.offset.dy,
            dx = correlation.offset.dx,
            peak = correlation.peak_value,
            "Aligned channel"
        );
        alignments.push(ChannelAlignment { band, correlation });
        Ok(shift_channel(channel, &correlation.offset, config.edge))
    };

    let channels = [aligned(Band::Red)?, aligned(Band::Green)?, aligned(Band::Blue)?];

    Ok(AlignedChannels {
        channels,
        alignments,
    })
}
