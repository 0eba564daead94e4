mod channels;
pub mod interpolation;
pub mod phase_correlation;
pub mod subpixel;

pub use channels::{align_channels, AlignedChannels, ChannelAlignment};
pub use interpolation::{bicubic_sample, shift_channel};
pub use phase_correlation::{compute_offset, compute_offset_array, PhaseCorrelation};
