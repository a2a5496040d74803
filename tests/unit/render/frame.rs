use super::*;

#[test]
fn pixel_centers_are_flipped_and_aspect_corrected() {
    let canvas = Canvas {
        width: 4,
        height: 2,
    };
    let top_left = PixelSample::new(canvas, 0, 0, 1.5);
    assert_eq!(top_left.uv, DVec2::new(0.125, 0.75));
    assert_eq!(top_left.screen, DVec2::new(-0.75, 0.25));
    assert_eq!(top_left.time, 1.5);

    let bottom_right = PixelSample::new(canvas, 3, 1, 0.0);
    assert_eq!(bottom_right.uv, DVec2::new(0.875, 0.25));
    assert_eq!(bottom_right.screen, DVec2::new(0.75, -0.25));
}

#[test]
fn center_pixel_of_an_odd_canvas_is_the_origin() {
    let canvas = Canvas {
        width: 3,
        height: 3,
    };
    let p = PixelSample::new(canvas, 1, 1, 0.0);
    assert_eq!(p.uv, DVec2::splat(0.5));
    assert_eq!(p.screen, DVec2::ZERO);
}

#[test]
fn sample_quantizes_straight_alpha() {
    let s = Sample::new(Rgb::new(1.0, 0.5, -1.0), 0.5);
    assert_eq!(s.to_rgba8(), [255, 128, 0, 128]);
    assert_eq!(Sample::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
    let nan = Sample::new(Rgb::new(f64::NAN, 0.0, 0.0), f64::NAN);
    assert_eq!(nan.to_rgba8(), [0, 0, 0, 0]);
}

#[test]
fn over_blends_against_the_background() {
    let s = Sample::new(Rgb::WHITE, 0.25).over(Rgb::BLACK);
    assert_eq!(s.alpha, 1.0);
    assert_eq!(s.color, Rgb::new(0.25, 0.25, 0.25));
    let opaque = Sample::opaque(Rgb::new(0.1, 0.2, 0.3)).over(Rgb::WHITE);
    assert_eq!(opaque.color, Rgb::new(0.1, 0.2, 0.3));
}

#[test]
fn frame_from_samples_is_row_major() {
    let canvas = Canvas {
        width: 2,
        height: 2,
    };
    let samples = [
        Sample::opaque(Rgb::BLACK),
        Sample::opaque(Rgb::WHITE),
        Sample::opaque(Rgb::new(1.0, 0.0, 0.0)),
        Sample::TRANSPARENT,
    ];
    let frame = FrameRGBA::from_samples(canvas, &samples).unwrap();
    assert!(!frame.premultiplied);
    assert_eq!(frame.data.len(), 16);
    assert_eq!(frame.pixel(1, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(0, 1), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(2, 0), None);

    assert!(FrameRGBA::from_samples(canvas, &samples[..3]).is_err());
}

#[test]
fn frame_writes_a_png() {
    let dir = std::env::temp_dir().join(format!("procfield_frame_png_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("one.png");
    let canvas = Canvas {
        width: 1,
        height: 1,
    };
    let frame = FrameRGBA::from_samples(canvas, &[Sample::opaque(Rgb::WHITE)]).unwrap();
    frame.save_png(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (1, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}
