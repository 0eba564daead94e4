use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, TricolorError};

/// Color band of a single-filter exposure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Red,
    Green,
    Blue,
}

impl Band {
    /// All bands in composite plane order.
    pub const ALL: [Band; COLOR_CHANNEL_COUNT] = [Band::Red, Band::Green, Band::Blue];

    /// Plane index of this band in a [`CompositeImage`].
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

/// A single-filter intensity grid in detector counts.
#[derive(Clone, Debug)]
pub struct Channel {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f64>,
    pub band: Band,
}

impl Channel {
    pub fn new(data: Array2<f64>, band: Band) -> Self {
        Self { data, band }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// The three exposures that make up one composite.
///
/// Construction guarantees all channels are non-empty and share one shape.
#[derive(Clone, Debug)]
pub struct ChannelSet {
    red: Channel,
    green: Channel,
    blue: Channel,
}

impl ChannelSet {
    pub fn new(red: Array2<f64>, green: Array2<f64>, blue: Array2<f64>) -> Result<Self> {
        let set = Self {
            red: Channel::new(red, Band::Red),
            green: Channel::new(green, Band::Green),
            blue: Channel::new(blue, Band::Blue),
        };
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<()> {
        let (h, w) = self.red.dim();
        for band in Band::ALL {
            let channel = self.get(band);
            let (ch, cw) = channel.dim();
            if ch == 0 || cw == 0 {
                return Err(TricolorError::EmptyChannel(band));
            }
            if ch != h || cw != w {
                return Err(TricolorError::shape_mismatch(
                    format!("{band} channel"),
                    (h, w),
                    (ch, cw),
                ));
            }
        }
        Ok(())
    }

    pub fn get(&self, band: Band) -> &Channel {
        match band {
            Band::Red => &self.red,
            Band::Green => &self.green,
            Band::Blue => &self.blue,
        }
    }

    pub fn red(&self) -> &Channel {
        &self.red
    }

    pub fn green(&self) -> &Channel {
        &self.green
    }

    pub fn blue(&self) -> &Channel {
        &self.blue
    }

    pub fn dim(&self) -> (usize, usize) {
        self.red.dim()
    }
}

/// Translation that registers a target channel onto the reference.
///
/// Applying it moves target content by `(dy, dx)` pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlignmentOffset {
    pub dx: f64,
    pub dy: f64,
}

/// Normalized RGB composite, shape = (height, width, 3), values in [SENTINEL, 1]
/// (or exactly 0 where noise suppression removed a pixel).
#[derive(Clone, Debug)]
pub struct CompositeImage {
    data: Array3<f64>,
}

impl CompositeImage {
    /// Stack three equally shaped normalized planes in R, G, B order.
    pub fn from_planes(planes: [ArrayView2<'_, f64>; COLOR_CHANNEL_COUNT]) -> Result<Self> {
        let expected = planes[0].dim();
        for (band, plane) in Band::ALL.iter().zip(planes.iter()) {
            if plane.dim() != expected {
                return Err(TricolorError::shape_mismatch(
                    format!("{band} composite plane"),
                    expected,
                    plane.dim(),
                ));
            }
        }
        let data = ndarray::stack(Axis(2), &planes)
            .map_err(|e| TricolorError::InvalidArray(e.to_string()))?;
        Ok(Self { data })
    }

    pub(crate) fn data_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// View of one color plane.
    pub fn plane(&self, band: Band) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(2), band.index())
    }

    /// RGB triple at (row, col).
    pub fn pixel(&self, row: usize, col: usize) -> [f64; COLOR_CHANNEL_COUNT] {
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ]
    }
}
