//! Sub-pixel resampling with a Catmull-Rom cubic spline.

use ndarray::Array2;

use crate::channel::{AlignmentOffset, Channel};
use crate::compute::map_pixels;
use crate::pipeline::config::EdgeMode;

/// Catmull-Rom cubic convolution kernel (a = -0.5).
#[inline]
fn cubic_kernel(x: f64) -> f64 {
    const A: f64 = -0.5;
    let abs_x = x.abs();

    if abs_x <= 1.0 {
        ((A + 2.0) * abs_x - (A + 3.0)) * abs_x * abs_x + 1.0
    } else if abs_x < 2.0 {
        ((A * abs_x - 5.0 * A) * abs_x + 8.0 * A) * abs_x - 4.0 * A
    } else {
        0.0
    }
}

#[inline]
fn tap(data: &Array2<f64>, r: i64, c: i64, edge: EdgeMode) -> f64 {
    let (h, w) = data.dim();
    match edge {
        EdgeMode::Nearest => {
            let r = r.clamp(0, h as i64 - 1) as usize;
            let c = c.clamp(0, w as i64 - 1) as usize;
            data[[r, c]]
        }
        EdgeMode::Constant(value) => {
            if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
                data[[r as usize, c as usize]]
            } else {
                value
            }
        }
    }
}

/// Sample `data` at fractional position `(y, x)` using a 4x4 bicubic kernel.
///
/// Positions outside the grid are extrapolated according to `edge`.
pub fn bicubic_sample(data: &Array2<f64>, y: f64, x: f64, edge: EdgeMode) -> f64 {
    let y0 = y.floor();
    let x0 = x.floor();
    let fy = y - y0;
    let fx = x - x0;
    let (y0, x0) = (y0 as i64, x0 as i64);

    let wy = [
        cubic_kernel(fy + 1.0),
        cubic_kernel(fy),
        cubic_kernel(fy - 1.0),
        cubic_kernel(fy - 2.0),
    ];
    let wx = [
        cubic_kernel(fx + 1.0),
        cubic_kernel(fx),
        cubic_kernel(fx - 1.0),
        cubic_kernel(fx - 2.0),
    ];

    let mut sum = 0.0;
    for (i, &ky) in wy.iter().enumerate() {
        if ky == 0.0 {
            continue;
        }
        let r = y0 - 1 + i as i64;
        let mut row_sum = 0.0;
        for (j, &kx) in wx.iter().enumerate() {
            if kx == 0.0 {
                continue;
            }
            row_sum += kx * tap(data, r, x0 - 1 + j as i64, edge);
        }
        sum += ky * row_sum;
    }
    sum
}

/// Shift a channel by `offset`: output pixel (row, col) takes the value at
/// `(row - dy, col - dx)` in the input. Shape is preserved.
pub fn shift_channel(channel: &Channel, offset: &AlignmentOffset, edge: EdgeMode) -> Channel {
    let (h, w) = channel.dim();
    let data = &channel.data;
    let shifted = map_pixels(h, w, |row, col| {
        bicubic_sample(data, row as f64 - offset.dy, col as f64 - offset.dx, edge)
    });
    Channel::new(shifted, channel.band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Band;

    #[test]
    fn test_kernel_interpolates_at_integers() {
        assert_eq!(cubic_kernel(0.0), 1.0);
        assert_eq!(cubic_kernel(1.0), 0.0);
        assert_eq!(cubic_kernel(2.0), 0.0);
    }

    #[test]
    fn test_integer_shift_is_exact() {
        let data = Array2::from_shape_fn((6, 6), |(r, c)| (r * 6 + c) as f64);
        let channel = Channel::new(data.clone(), Band::Red);
        let offset = AlignmentOffset { dx: 1.0, dy: 2.0 };
        let shifted = shift_channel(&channel, &offset, EdgeMode::Nearest);
        assert!((shifted.data[[3, 3]] - data[[1, 2]]).abs() < 1e-12);
        // Rows above the shifted content replicate the top edge.
        assert!((shifted.data[[0, 3]] - data[[0, 2]]).abs() < 1e-12);
    }

    #[test]
    fn test_constant_edge_fills_outside() {
        let data = Array2::from_elem((4, 4), 7.0);
        let channel = Channel::new(data, Band::Green);
        let shifted = shift_channel(
            &channel,
            &AlignmentOffset { dx: 4.0, dy: 0.0 },
            EdgeMode::Constant(0.0),
        );
        assert_eq!(shifted.data[[2, 1]], 0.0);
    }

    #[test]
    fn test_linear_ramp_half_pixel() {
        let data = Array2::from_shape_fn((8, 8), |(_, c)| c as f64);
        let v = bicubic_sample(&data, 3.0, 3.5, EdgeMode::Nearest);
        assert!((v - 3.5).abs() < 1e-12, "{v}");
    }
}
