#![allow(dead_code)]

use ndarray::Array2;

/// A synthetic star: centre (row, col), peak amplitude above background, Gaussian sigma.
#[derive(Clone, Copy, Debug)]
pub struct Star {
    pub row: f64,
    pub col: f64,
    pub amplitude: f64,
    pub sigma: f64,
}

/// Stars placed well inside a 128x128 grid so shifts of up to ~10 px keep
/// them away from the borders.
pub const STARS: [Star; 6] = [
    Star { row: 40.0, col: 45.0, amplitude: 3000.0, sigma: 2.5 },
    Star { row: 60.0, col: 80.0, amplitude: 5000.0, sigma: 2.8 },
    Star { row: 85.0, col: 50.0, amplitude: 2000.0, sigma: 3.0 },
    Star { row: 70.0, col: 64.0, amplitude: 4000.0, sigma: 3.5 },
    Star { row: 50.0, col: 90.0, amplitude: 2500.0, sigma: 2.6 },
    Star { row: 88.0, col: 85.0, amplitude: 3500.0, sigma: 2.5 },
];

pub const FIELD_SIZE: usize = 128;
pub const FIELD_BACKGROUND: f64 = 200.0;

/// Evaluate a star field with every star moved by `(dy, dx)`.
///
/// Stars are sampled analytically, so fractional shifts are exact rather
/// than interpolated.
pub fn star_field(
    h: usize,
    w: usize,
    background: f64,
    stars: &[Star],
    dy: f64,
    dx: f64,
) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        let mut value = background;
        for star in stars {
            let ry = r as f64 - (star.row + dy);
            let rx = c as f64 - (star.col + dx);
            let two_sigma_sq = 2.0 * star.sigma * star.sigma;
            value += star.amplitude * (-(ry * ry + rx * rx) / two_sigma_sq).exp();
        }
        value
    })
}

/// The default 128x128 test field moved by `(dy, dx)`.
pub fn shifted_field(dy: f64, dx: f64) -> Array2<f64> {
    star_field(FIELD_SIZE, FIELD_SIZE, FIELD_BACKGROUND, &STARS, dy, dx)
}

pub fn constant(h: usize, w: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((h, w), value)
}

/// Constant background with a bright outlier every `stride` pixels.
pub fn background_with_outliers(
    h: usize,
    w: usize,
    background: f64,
    outlier: f64,
    stride: usize,
) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        if (r * w + c) % stride == 0 {
            outlier
        } else {
            background
        }
    })
}

/// Largest absolute difference over the interior, `margin` pixels from each border.
pub fn max_interior_diff(a: &Array2<f64>, b: &Array2<f64>, margin: usize) -> f64 {
    let (h, w) = a.dim();
    let mut max_diff = 0.0f64;
    for r in margin..h - margin {
        for c in margin..w - margin {
            max_diff = max_diff.max((a[[r, c]] - b[[r, c]]).abs());
        }
    }
    max_diff
}
