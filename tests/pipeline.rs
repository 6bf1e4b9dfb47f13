//! End-to-end pipeline tests against a fake network.
//!
//! The real checkpoint is hundreds of megabytes, so these tests substitute
//! a nearest-neighbor x4 upsampler behind the `Network` trait and exercise
//! everything around it: decoding, tensor conversion, shape and clamp
//! guarantees, and the atomic write path.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::Array4;

use superres::image::ImageTensor;
use superres::model::Network;
use superres::{Device, Error, Pipeline};

/// Nearest-neighbor x4 upsampler that counts forward passes.
struct FakeUpsampler {
    calls: Arc<AtomicUsize>,
}

impl FakeUpsampler {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl Network for FakeUpsampler {
    fn scale(&self) -> u32 {
        4
    }

    fn forward(&mut self, input: &ImageTensor) -> superres::Result<ImageTensor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (_, c, h, w) = input.dim();
        Ok(Array4::from_shape_fn((1, c, h * 4, w * 4), |(n, c, y, x)| {
            input[[n, c, y / 4, x / 4]]
        }))
    }
}

/// Network that ignores its input and emits values outside [0, 1].
struct OvershootingNetwork;

impl Network for OvershootingNetwork {
    fn scale(&self) -> u32 {
        4
    }

    fn forward(&mut self, input: &ImageTensor) -> superres::Result<ImageTensor> {
        let (_, c, h, w) = input.dim();
        Ok(Array4::from_shape_fn(
            (1, c, h * 4, w * 4),
            |(_, c, _, _)| if c == 0 { 2.0 } else { -1.0 },
        ))
    }
}

fn fake_pipeline() -> (Pipeline, Arc<AtomicUsize>) {
    let (fake, calls) = FakeUpsampler::new();
    (Pipeline::with_network(Device::Cpu, Box::new(fake)), calls)
}

fn write_png(path: &Path, width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) {
    let img = image::RgbImage::from_fn(width, height, |x, y| image::Rgb(pixel(x, y)));
    img.save(path).unwrap();
}

#[test]
fn black_image_upscales_to_4x_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("out.png");
    let output = dir.path().join("out_sp.png");
    write_png(&input, 64, 64, |_, _| [0, 0, 0]);

    let (mut pipeline, _) = fake_pipeline();
    pipeline.process(&input, &output).unwrap();

    let result = image::open(&output).unwrap().to_rgb8();
    assert_eq!(result.dimensions(), (256, 256));
    assert!(result.pixels().all(|p| p.0 == [0, 0, 0]));
}

#[test]
fn pixel_values_survive_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("grad.png");
    let output = dir.path().join("grad_sp.png");
    // A gradient touching a spread of byte values across all channels.
    write_png(&input, 16, 16, |x, y| {
        [(x * 16) as u8, (y * 16) as u8, (x * y) as u8]
    });

    let (mut pipeline, _) = fake_pipeline();
    pipeline.process(&input, &output).unwrap();

    let source = image::open(&input).unwrap().to_rgb8();
    let result = image::open(&output).unwrap().to_rgb8();
    // Nearest-neighbor x4: every output pixel equals its source pixel.
    for (x, y, pixel) in result.enumerate_pixels() {
        assert_eq!(pixel, source.get_pixel(x / 4, y / 4), "at ({x}, {y})");
    }
}

#[test]
fn runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 32, 24, |x, y| [(x + y) as u8, x as u8, y as u8]);

    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    let (mut pipeline, _) = fake_pipeline();
    pipeline.process(&input, &first).unwrap();
    let (mut pipeline, _) = fake_pipeline();
    pipeline.process(&input, &second).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn out_of_range_network_output_is_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    write_png(&input, 8, 8, |_, _| [12, 34, 56]);

    let mut pipeline = Pipeline::with_network(Device::Cpu, Box::new(OvershootingNetwork));
    pipeline.process(&input, &output).unwrap();

    let result = image::open(&output).unwrap().to_rgb8();
    assert_eq!(result.dimensions(), (32, 32));
    // Channel 0 of the tensor is R and overshoots to 2.0, the rest undershoot.
    assert!(result.pixels().all(|p| p.0 == [255, 0, 0]));
}

#[test]
fn missing_input_fails_before_the_network_runs() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");

    let (mut pipeline, calls) = fake_pipeline();
    let err = pipeline
        .process(dir.path().join("does-not-exist.png"), &output)
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!output.exists());
}

#[test]
fn failed_encode_leaves_no_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 8, 8, |_, _| [1, 2, 3]);

    let missing_dir = dir.path().join("no-such-dir");
    let output = missing_dir.join("out.png");

    let (mut pipeline, _) = fake_pipeline();
    let err = pipeline.process(&input, &output).unwrap_err();

    assert!(matches!(err, Error::Encode { .. }), "got {err:?}");
    assert!(!output.exists());
    assert!(!missing_dir.exists());
}

#[test]
fn undecodable_input_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("not-an-image.png");
    std::fs::write(&input, b"plain text").unwrap();

    let (mut pipeline, calls) = fake_pipeline();
    let err = pipeline
        .process(&input, dir.path().join("out.png"))
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
