use std::path::Path;

use ndarray::{array, Array2};
use npyz::{NpyFile, Order, WriterBuilder};

use tricolor_core::channel::CompositeImage;
use tricolor_core::consts::SENTINEL;
use tricolor_core::error::TricolorError;
use tricolor_core::io::image_io::{save_composite_image, ImageKind};
use tricolor_core::io::npy::{
    load_channel_npy, read_channel_npy, save_composite_npy, write_composite_npy,
};
use tricolor_core::io::present::{DisplayRequest, FilePresenter, Presenter};

fn sample_composite() -> CompositeImage {
    let red = array![[1.0, 0.5, SENTINEL], [0.0, 0.25, 1.0]];
    let green = array![[SENTINEL, 0.5, 1.0], [0.0, 0.75, 1.0]];
    let blue = array![[0.5, 0.5, SENTINEL], [0.0, 1.0, 1.0]];
    CompositeImage::from_planes([red.view(), green.view(), blue.view()]).unwrap()
}

fn npy_bytes_2d<T: npyz::AutoSerialize>(shape: [u64; 2], values: &[T], order: Order) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut writer = npyz::WriteOptions::new()
        .default_dtype()
        .shape(&shape)
        .order(order)
        .writer(&mut buf)
        .begin_nd()
        .unwrap();
    for v in values {
        writer.push(v).unwrap();
    }
    writer.finish().unwrap();
    buf
}

/// Hand-built `.npy` with an arbitrary dtype descriptor.
fn raw_npy(descr: &str, shape: [u64; 2], payload: &[u8]) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '{descr}', 'fortran_order': False, 'shape': ({}, {}), }}",
        shape[0], shape[1]
    )
    .into_bytes();
    // Magic, version and length take 10 bytes; the header ends on a 64-byte boundary.
    while (10 + header.len() + 1) % 64 != 0 {
        header.push(b' ');
    }
    header.push(b'\n');

    let mut out = b"\x93NUMPY\x01\x00".to_vec();
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend(header);
    out.extend_from_slice(payload);
    out
}

// ---------------------------------------------------------------------------
// .npy
// ---------------------------------------------------------------------------

#[test]
fn test_composite_npy_layout() {
    let image = sample_composite();
    let mut buf = Vec::new();
    write_composite_npy(&image, &mut buf).unwrap();

    let npy = NpyFile::new(&buf[..]).unwrap();
    assert_eq!(npy.shape(), &[2, 3, 3]);
    let values = npy.into_vec::<f64>().unwrap();
    let expected: Vec<f64> = image.data().iter().copied().collect();
    assert_eq!(values, expected);
    // [row 0, col 1] in R, G, B order
    assert_eq!(&values[3..6], &[0.5, 0.5, 0.5]);
}

#[test]
fn test_save_composite_npy_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("M42_img_array.npy");
    save_composite_npy(&sample_composite(), &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let npy = NpyFile::new(&bytes[..]).unwrap();
    assert_eq!(npy.shape(), &[2, 3, 3]);
}

#[test]
fn test_read_channel_f32() {
    let bytes = npy_bytes_2d([2, 3], &[1.5f32, 2.0, 3.0, 4.0, 5.0, 6.5], Order::C);
    let channel = read_channel_npy(&bytes).unwrap();
    assert_eq!(channel, array![[1.5, 2.0, 3.0], [4.0, 5.0, 6.5]]);
}

#[test]
fn test_read_channel_u16() {
    let bytes = npy_bytes_2d([2, 2], &[0u16, 1000, 60_000, 65_535], Order::C);
    let channel = read_channel_npy(&bytes).unwrap();
    assert_eq!(channel, array![[0.0, 1000.0], [60_000.0, 65_535.0]]);
}

#[test]
fn test_read_channel_fortran_order() {
    // Column-major storage of [[1, 2, 3], [4, 5, 6]]
    let bytes = npy_bytes_2d([2, 3], &[1.0f64, 4.0, 2.0, 5.0, 3.0, 6.0], Order::Fortran);
    let channel = read_channel_npy(&bytes).unwrap();
    assert_eq!(channel, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
}

#[test]
fn test_read_channel_signed_integers() {
    let bytes = npy_bytes_2d([1, 3], &[-40_000i64, 0, 7], Order::C);
    assert_eq!(read_channel_npy(&bytes).unwrap(), array![[-40_000.0, 0.0, 7.0]]);

    let bytes = npy_bytes_2d([1, 2], &[-3i8, 100], Order::C);
    assert_eq!(read_channel_npy(&bytes).unwrap(), array![[-3.0, 100.0]]);
}

#[test]
fn test_read_channel_big_endian() {
    let mut payload = Vec::new();
    for v in [1.5f64, -2.0] {
        payload.extend_from_slice(&v.to_be_bytes());
    }
    let bytes = raw_npy(">f8", [1, 2], &payload);
    assert_eq!(read_channel_npy(&bytes).unwrap(), array![[1.5, -2.0]]);
}

#[test]
fn test_read_channel_rejects_unsupported_dtype() {
    let bytes = raw_npy("|b1", [2, 2], &[0, 1, 1, 0]);
    let err = read_channel_npy(&bytes).unwrap_err();
    match err {
        TricolorError::InvalidArray(msg) => assert!(msg.contains("b1"), "{msg}"),
        other => panic!("expected InvalidArray, got {other:?}"),
    }
}

#[test]
fn test_read_channel_rejects_3d() {
    let mut buf = Vec::new();
    write_composite_npy(&sample_composite(), &mut buf).unwrap();
    let err = read_channel_npy(&buf).unwrap_err();
    assert!(matches!(err, TricolorError::InvalidArray(_)), "got {err:?}");
}

#[test]
fn test_read_channel_rejects_garbage() {
    assert!(read_channel_npy(b"not an npy file").is_err());
}

#[test]
fn test_load_channel_npy_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("M42.B.npy");
    let bytes = npy_bytes_2d([1, 4], &[10.0f64, 20.0, 30.0, 40.0], Order::C);
    std::fs::write(&path, bytes).unwrap();

    let channel: Array2<f64> = load_channel_npy(&path).unwrap();
    assert_eq!(channel.dim(), (1, 4));
    assert_eq!(channel[[0, 3]], 40.0);
}

#[test]
fn test_load_channel_missing_file() {
    let err = load_channel_npy(Path::new("/nonexistent/M42.R.npy")).unwrap_err();
    assert!(matches!(err, TricolorError::Io(_)));
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[test]
fn test_image_kind_from_path() {
    assert_eq!(ImageKind::from_path(Path::new("out/M42.tiff")), ImageKind::Tiff);
    assert_eq!(ImageKind::from_path(Path::new("out/M42.tif")), ImageKind::Tiff);
    assert_eq!(ImageKind::from_path(Path::new("out/M42.png")), ImageKind::Png);
    assert_eq!(ImageKind::from_path(Path::new("out/M42")), ImageKind::Png);
}

#[test]
fn test_save_png_quantizes_to_8_bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("M42.png");
    save_composite_image(&sample_composite(), &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 128]);
    assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(2, 1).0, [255, 255, 255]);
}

#[test]
fn test_save_tiff_keeps_16_bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("M42.tiff");
    save_composite_image(&sample_composite(), &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb16();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [65535, 65535, 65535]);
    assert_eq!(img.get_pixel(1, 1).0, [16384, 49151, 65535]);
}

#[test]
fn test_file_presenter_writes_titled_image() {
    let dir = tempfile::tempdir().unwrap();
    let presenter = FilePresenter::new(dir.path(), ImageKind::Png);
    let image = sample_composite();
    let request = DisplayRequest::new("M42", &image);

    let path = presenter.output_path(&request);
    assert_eq!(path, dir.path().join("M42.png"));

    presenter.present(&request).unwrap();
    assert!(path.exists());
}
