mod common;

use std::sync::Mutex;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};

use tricolor_core::channel::{Band, ChannelSet, CompositeImage};
use tricolor_core::consts::SENTINEL;
use tricolor_core::error::TricolorError;
use tricolor_core::pipeline::config::{AlignmentConfig, CompositeConfig};
use tricolor_core::pipeline::{
    compose, compose_reported, is_single_channel_noise, noise_mask, CompositeStage,
    ProgressReporter,
};

use common::{constant, shifted_field};

fn unaligned_config() -> CompositeConfig {
    CompositeConfig {
        alignment: AlignmentConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_constant_channels_end_to_end() {
    let set = ChannelSet::new(
        constant(4, 4, 5000.0),
        constant(4, 4, 5000.0),
        constant(4, 4, 5000.0),
    )
    .unwrap();
    let composite = compose(&set, &CompositeConfig::default()).unwrap();

    for band in Band::ALL {
        assert_abs_diff_eq!(composite.report.peak(band), 4997.5, epsilon = 1e-9);
    }
    assert_eq!(composite.image.data().dim(), (4, 4, 3));
    assert_eq!(composite.report.zeroed_pixels, 0);
    let red = composite.image.plane(Band::Red);
    for band in [Band::Green, Band::Blue] {
        assert_eq!(composite.image.plane(band), red);
    }
    for &v in composite.image.data().iter() {
        assert_eq!(v, SENTINEL);
    }
}

#[test]
fn test_noise_rule() {
    assert!(is_single_channel_noise([0.9, 0.1, 0.1], 0.3, 0.8));
    assert!(is_single_channel_noise([0.1, 0.9, 0.1], 0.3, 0.8));
    assert!(is_single_channel_noise([0.1, 0.1, 0.9], 0.3, 0.8));
    assert!(!is_single_channel_noise([0.9, 0.9, 0.1], 0.3, 0.8));
    assert!(!is_single_channel_noise([0.2, 0.1, 0.1], 0.3, 0.8));
    // Both thresholds are inclusive.
    assert!(is_single_channel_noise([0.3, 0.8, 0.8], 0.3, 0.8));
}

#[test]
fn test_noise_mask_on_composite() {
    let red = array![[0.9, 0.9], [0.1, 0.95]];
    let green = array![[0.1, 0.9], [0.1, 0.95]];
    let blue = array![[0.1, 0.1], [0.9, 0.95]];
    let image = CompositeImage::from_planes([red.view(), green.view(), blue.view()]).unwrap();
    let mask = noise_mask(&image, 0.3, 0.8);
    assert_eq!(mask, array![[true, false], [true, false]]);
}

#[test]
fn test_composite_planes_must_match() {
    let a = Array2::<f64>::zeros((4, 4));
    let b = Array2::<f64>::zeros((4, 5));
    let err = CompositeImage::from_planes([a.view(), b.view(), a.view()]).unwrap_err();
    assert!(matches!(err, TricolorError::ShapeMismatch { .. }));
}

#[test]
fn test_compose_zeroes_single_channel_hot_pixel() {
    let mut red = constant(16, 16, 1000.0);
    let mut green = constant(16, 16, 1000.0);
    let mut blue = constant(16, 16, 1000.0);
    // Hot pixel in red only.
    red[[8, 8]] = 3000.0;
    // Star seen in every filter.
    for ch in [&mut red, &mut green, &mut blue] {
        ch[[4, 4]] = 3000.0;
    }
    // Bright in two filters.
    red[[12, 3]] = 3000.0;
    green[[12, 3]] = 3000.0;

    let set = ChannelSet::new(red, green, blue).unwrap();
    let composite = compose(&set, &unaligned_config()).unwrap();
    let image = &composite.image;

    assert_eq!(image.pixel(8, 8), [0.0, 0.0, 0.0]);
    assert_eq!(image.pixel(4, 4), [1.0, 1.0, 1.0]);
    assert_eq!(image.pixel(12, 3), [1.0, 1.0, SENTINEL]);
    assert_eq!(image.pixel(0, 0), [SENTINEL; 3]);
    assert_eq!(composite.report.zeroed_pixels, 1);
}

#[test]
fn test_compose_aligns_onto_blue() {
    let set = ChannelSet::new(
        shifted_field(2.5, -1.5),
        shifted_field(-3.0, 2.0),
        shifted_field(0.0, 0.0),
    )
    .unwrap();
    let composite = compose(&set, &CompositeConfig::default()).unwrap();
    let report = &composite.report;

    let red = report.alignment(Band::Red).unwrap().correlation.offset;
    let green = report.alignment(Band::Green).unwrap().correlation.offset;
    assert!((red.dy + 2.5).abs() < 0.1 && (red.dx - 1.5).abs() < 0.1);
    assert!((green.dy - 3.0).abs() < 0.1 && (green.dx + 2.0).abs() < 0.1);
    assert!(report.alignment(Band::Blue).is_none());

    assert_eq!(composite.image.height(), 128);
    assert_eq!(composite.image.width(), 128);
    // Brightest star core after registration.
    assert_eq!(composite.image.pixel(60, 80), [1.0, 1.0, 1.0]);
}

#[test]
fn test_saturated_pixels_clip_through_compose() {
    let mut channels = [
        constant(16, 16, 1000.0),
        constant(16, 16, 1000.0),
        constant(16, 16, 1000.0),
    ];
    for ch in channels.iter_mut() {
        ch[[5, 5]] = 65_000.0;
    }
    let [r, g, b] = channels;
    let set = ChannelSet::new(r, g, b).unwrap();

    let clipped = compose(&set, &unaligned_config()).unwrap();
    assert_eq!(clipped.image.pixel(5, 5), [SENTINEL; 3]);

    let config = CompositeConfig {
        no_sat_clip: true,
        ..unaligned_config()
    };
    let kept = compose(&set, &config).unwrap();
    assert_eq!(kept.image.pixel(5, 5), [1.0, 1.0, 1.0]);
}

#[test]
fn test_higher_sat_factor_is_brighter() {
    let field = shifted_field(0.0, 0.0);
    let set = ChannelSet::new(field.clone(), field.clone(), field).unwrap();
    let run = |sat_factor: u8| {
        let config = CompositeConfig {
            sat_factor,
            noise_level: 2.0,
            ..unaligned_config()
        };
        compose(&set, &config).unwrap()
    };
    let dim = run(3);
    let bright = run(8);
    assert!(bright.report.sat_coeff < dim.report.sat_coeff);
    for (b, d) in bright.image.data().iter().zip(dim.image.data().iter()) {
        assert!(b >= d, "{b} < {d}");
    }
}

#[test]
fn test_mismatched_channels_rejected() {
    let err = ChannelSet::new(
        Array2::zeros((4, 4)),
        Array2::zeros((4, 4)),
        Array2::zeros((5, 4)),
    )
    .unwrap_err();
    assert!(matches!(err, TricolorError::ShapeMismatch { .. }), "got {err:?}");
}

#[test]
fn test_empty_channel_rejected() {
    let err = ChannelSet::new(
        Array2::zeros((0, 0)),
        Array2::zeros((0, 0)),
        Array2::zeros((0, 0)),
    )
    .unwrap_err();
    assert!(matches!(err, TricolorError::EmptyChannel(Band::Red)));
}

#[test]
fn test_invalid_range_aborts_compose() {
    let set = ChannelSet::new(
        constant(16, 16, -5.0),
        constant(16, 16, 1000.0),
        constant(16, 16, 1000.0),
    )
    .unwrap();
    let err = compose(&set, &unaligned_config()).unwrap_err();
    assert!(matches!(err, TricolorError::InvalidRange { .. }), "got {err:?}");
}

#[test]
fn test_invalid_sat_factor_rejected() {
    let set = ChannelSet::new(
        constant(4, 4, 1.0),
        constant(4, 4, 1.0),
        constant(4, 4, 1.0),
    )
    .unwrap();
    for sat_factor in [0u8, 11] {
        let config = CompositeConfig {
            sat_factor,
            ..Default::default()
        };
        let err = compose(&set, &config).unwrap_err();
        assert!(matches!(err, TricolorError::InvalidConfig(_)), "got {err:?}");
    }
}

#[derive(Default)]
struct RecordingReporter {
    started: Mutex<Vec<CompositeStage>>,
    finished: Mutex<usize>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: CompositeStage) {
        self.started.lock().unwrap().push(stage);
    }

    fn finish_stage(&self) {
        *self.finished.lock().unwrap() += 1;
    }
}

#[test]
fn test_progress_stages_in_order() {
    let set = ChannelSet::new(
        constant(8, 8, 500.0),
        constant(8, 8, 500.0),
        constant(8, 8, 500.0),
    )
    .unwrap();
    let reporter = RecordingReporter::default();
    compose_reported(&set, &CompositeConfig::default(), &reporter).unwrap();

    let started = reporter.started.lock().unwrap().clone();
    assert_eq!(
        started,
        vec![
            CompositeStage::BackgroundEstimation,
            CompositeStage::Alignment,
            CompositeStage::Scaling,
            CompositeStage::NoiseSuppression,
        ]
    );
    assert_eq!(*reporter.finished.lock().unwrap(), 4);
}
