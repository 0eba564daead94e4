//! NumPy `.npy` form of channels and composites.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array2, ShapeBuilder};
use npyz::{DType, NpyFile, Order, TypeChar, WriterBuilder};

use crate::channel::CompositeImage;
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, TricolorError};

/// Write the composite as a C-ordered `f64` array of shape `[height, width, 3]`.
pub fn write_composite_npy<W: Write>(image: &CompositeImage, writer: W) -> Result<()> {
    let shape = [
        image.height() as u64,
        image.width() as u64,
        COLOR_CHANNEL_COUNT as u64,
    ];
    let mut npy = npyz::WriteOptions::new()
        .default_dtype()
        .shape(&shape)
        .writer(writer)
        .begin_nd()?;
    // Logical iteration order is C order regardless of memory layout.
    for v in image.data().iter() {
        npy.push(v)?;
    }
    npy.finish()?;
    Ok(())
}

/// Save the composite to `path` as `.npy`.
pub fn save_composite_npy(image: &CompositeImage, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_composite_npy(image, BufWriter::new(file))
}

/// Decode a 2D `.npy` array into `f64` detector counts.
///
/// Float and integer dtypes are accepted, in C or Fortran order.
pub fn read_channel_npy(bytes: &[u8]) -> Result<Array2<f64>> {
    let npy = NpyFile::new(bytes)?;
    let shape = npy.shape().to_vec();
    let fortran = matches!(npy.order(), Order::Fortran);
    if shape.len() != 2 {
        return Err(TricolorError::InvalidArray(format!(
            "expected a 2D array, got shape {shape:?}"
        )));
    }
    let (h, w) = (shape[0] as usize, shape[1] as usize);

    let values = decode_values(npy)?;
    let array = if fortran {
        Array2::from_shape_vec((h, w).f(), values)
    } else {
        Array2::from_shape_vec((h, w), values)
    };
    array.map_err(|e| TricolorError::InvalidArray(e.to_string()))
}

/// Load a 2D `.npy` file from disk.
pub fn load_channel_npy(path: &Path) -> Result<Array2<f64>> {
    let bytes = std::fs::read(path)?;
    read_channel_npy(&bytes)
}

fn decode_values(npy: NpyFile<&[u8]>) -> Result<Vec<f64>> {
    let dtype = npy.dtype();
    let plain = match &dtype {
        DType::Plain(ty) => Some((ty.type_char(), ty.size_field())),
        _ => None,
    };

    macro_rules! widen {
        ($t:ty) => {
            npy.into_vec::<$t>()?.into_iter().map(|v| v as f64).collect()
        };
    }
    let values: Vec<f64> = match plain {
        Some((TypeChar::Float, 8)) => widen!(f64),
        Some((TypeChar::Float, 4)) => widen!(f32),
        Some((TypeChar::Uint, 1)) => widen!(u8),
        Some((TypeChar::Uint, 2)) => widen!(u16),
        Some((TypeChar::Uint, 4)) => widen!(u32),
        Some((TypeChar::Uint, 8)) => widen!(u64),
        Some((TypeChar::Int, 1)) => widen!(i8),
        Some((TypeChar::Int, 2)) => widen!(i16),
        Some((TypeChar::Int, 4)) => widen!(i32),
        Some((TypeChar::Int, 8)) => widen!(i64),
        _ => {
            return Err(TricolorError::InvalidArray(format!(
                "unsupported dtype {}",
                dtype.descr()
            )));
        }
    };
    Ok(values)
}
