use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// 2D forward FFT: row-wise FFT, then column-wise FFT.
pub fn fft2d_forward(data: &Array2<f64>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    let mut result = data.mapv(|v| Complex::new(v, 0.0));

    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;
    process_rows(&mut result, &fft_row, parallel);
    process_cols(&mut result, &fft_col, parallel);

    result
}

/// 2D inverse FFT, returning the real part normalized by `1/(h*w)`.
pub fn ifft2d_inverse(data: &Array2<Complex<f64>>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);

    let mut work = data.clone();

    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;
    process_cols(&mut work, &ifft_col, parallel);
    process_rows(&mut work, &ifft_row, parallel);

    let scale = 1.0 / (h * w) as f64;
    work.mapv(|v| v.re * scale)
}

fn process_rows(data: &mut Array2<Complex<f64>>, fft: &Arc<dyn Fft<f64>>, parallel: bool) {
    let (h, w) = data.dim();
    if parallel {
        let processed: Vec<Vec<Complex<f64>>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| data[[row, c]]).collect();
                fft.process(&mut row_data);
                row_data
            })
            .collect();
        for (row, row_data) in processed.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| data[[row, c]]).collect();
            fft.process(&mut row_data);
            for (col, val) in row_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    }
}

fn process_cols(data: &mut Array2<Complex<f64>>, fft: &Arc<dyn Fft<f64>>, parallel: bool) {
    let (h, w) = data.dim();
    if parallel {
        let processed: Vec<Vec<Complex<f64>>> = (0..w)
            .into_par_iter()
            .map(|col| {
                let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| data[[r, col]]).collect();
                fft.process(&mut col_data);
                col_data
            })
            .collect();
        for (col, col_data) in processed.into_iter().enumerate() {
            for (row, val) in col_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    } else {
        for col in 0..w {
            let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| data[[r, col]]).collect();
            fft.process(&mut col_data);
            for (row, val) in col_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    }
}
