use super::*;
use crate::foundation::core::{Canvas, Rgb};
use crate::render::frame::Sample;

fn cfg(frames: u64) -> SinkConfig {
    SinkConfig {
        width: 1,
        height: 1,
        fps: Fps::default(),
        frames,
    }
}

fn pixel(color: Rgb) -> FrameRGBA {
    let canvas = Canvas {
        width: 1,
        height: 1,
    };
    FrameRGBA::from_samples(canvas, &[Sample::opaque(color)]).unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "procfield_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(0), &pixel(Rgb::BLACK)).unwrap();
    sink.push_frame(FrameIndex(1), &pixel(Rgb::WHITE)).unwrap();
    assert!(!sink.is_finished());
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg(2)));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].1.data, vec![255, 255, 255, 255]);

    // A second run starts from scratch.
    sink.begin(cfg(1)).unwrap();
    assert!(sink.frames().is_empty());
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = temp_dir("png_sequence");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(3), &pixel(Rgb::WHITE)).unwrap();
    sink.push_frame(FrameIndex(4), &pixel(Rgb::BLACK)).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("frame_00003.png"), dir.join("frame_00004.png")]
    );
    let img = image::open(dir.join("frame_00003.png")).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sequence_rejects_out_of_order_frames() {
    let dir = temp_dir("png_order");
    let mut sink = PngSequenceSink::with_prefix(&dir, "shot");
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(5), &pixel(Rgb::WHITE)).unwrap();
    assert_eq!(sink.frame_path(FrameIndex(5)), dir.join("shot00005.png"));
    assert!(sink.push_frame(FrameIndex(5), &pixel(Rgb::WHITE)).is_err());
    assert!(sink.push_frame(FrameIndex(2), &pixel(Rgb::WHITE)).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
