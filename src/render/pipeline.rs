use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::Value;
use crate::render::frame::{FieldShader, FrameRGBA, PixelSample, Sample};
use crate::render::sink::{FrameSink, SinkConfig};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Threading and chunking controls for pixel evaluation.
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Rows per scheduled work item.
    pub chunk_rows: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_rows: 16,
            threads: None,
        }
    }
}

impl RenderThreading {
    /// Parallel rendering on the default number of threads.
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }
}

/// Shared flag a caller sets to stop a render between rows.
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// `true` once [`CancelFlag::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were rendered and pushed to the sink.
    pub frames_rendered: u64,
    /// Pixels shaded across all frames.
    pub samples: u64,
}

/// Options for [`render_sequence`].
#[derive(Clone, Debug)]
pub struct SequenceOpts {
    /// Frames to render (start inclusive, end exclusive).
    pub range: FrameRange,
    /// Frame rate; frame `i` is shaded at `i / fps` seconds.
    pub fps: Fps,
    /// Render threading/chunking configuration.
    pub threading: RenderThreading,
}

impl Default for SequenceOpts {
    fn default() -> Self {
        Self {
            range: FrameRange {
                start: FrameIndex(0),
                end: FrameIndex(1),
            },
            fps: Fps::default(),
            threading: RenderThreading::default(),
        }
    }
}

/// Shade every pixel of `canvas` at `time`, row-major from the top row.
pub fn render_samples<S: FieldShader + ?Sized>(
    shader: &S,
    canvas: Canvas,
    time: f64,
    threading: &RenderThreading,
    cancel: Option<&CancelFlag>,
) -> ProcfieldResult<Vec<Sample>> {
    canvas.validate()?;
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    shade_canvas(shader, canvas, time, threading, pool.as_ref(), cancel)
}

/// Shade a full frame and quantize it to straight-alpha RGBA8.
#[tracing::instrument(
    skip(shader, threading, cancel),
    fields(width = canvas.width, height = canvas.height, parallel = threading.parallel)
)]
pub fn render_frame<S: FieldShader + ?Sized>(
    shader: &S,
    canvas: Canvas,
    time: f64,
    threading: &RenderThreading,
    cancel: Option<&CancelFlag>,
) -> ProcfieldResult<FrameRGBA> {
    let samples = render_samples(shader, canvas, time, threading, cancel)?;
    FrameRGBA::from_samples(canvas, &samples)
}

/// Render a frame range and stream each frame into `sink` in order.
///
/// The thread pool is built once for the whole sequence. On cancellation the sink is left without
/// its `end` call.
#[tracing::instrument(
    skip(shader, opts, sink, cancel),
    fields(
        width = canvas.width,
        height = canvas.height,
        frames = opts.range.len_frames()
    )
)]
pub fn render_sequence<S: FieldShader + ?Sized>(
    shader: &S,
    canvas: Canvas,
    opts: &SequenceOpts,
    sink: &mut dyn FrameSink,
    cancel: Option<&CancelFlag>,
) -> ProcfieldResult<RenderStats> {
    if opts.range.is_empty() {
        return Err(ProcfieldError::validation("render range must be non-empty"));
    }
    canvas.validate()?;
    Fps::new(opts.fps.num, opts.fps.den)?;

    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: opts.fps,
        frames: opts.range.len_frames(),
    })?;

    let mut stats = RenderStats::default();
    for f in opts.range.start.0..opts.range.end.0 {
        check_cancel(cancel)?;
        let time = opts.fps.frames_to_secs(f);
        let samples = shade_canvas(
            shader,
            canvas,
            time,
            &opts.threading,
            pool.as_ref(),
            cancel,
        )?;
        let frame = FrameRGBA::from_samples(canvas, &samples)?;
        sink.push_frame(FrameIndex(f), &frame)?;
        stats.frames_total += 1;
        stats.frames_rendered += 1;
        stats.samples += samples.len() as u64;
    }
    sink.end()?;

    tracing::debug!(
        frames = stats.frames_rendered,
        samples = stats.samples,
        "sequence rendered"
    );
    Ok(stats)
}

fn shade_canvas<S: FieldShader + ?Sized>(
    shader: &S,
    canvas: Canvas,
    time: f64,
    threading: &RenderThreading,
    pool: Option<&rayon::ThreadPool>,
    cancel: Option<&CancelFlag>,
) -> ProcfieldResult<Vec<Sample>> {
    let Some(pool) = pool else {
        let mut scratch = Vec::new();
        let mut out = Vec::with_capacity(canvas.pixel_count());
        for y in 0..canvas.height {
            check_cancel(cancel)?;
            shade_row(shader, canvas, y, time, &mut scratch, &mut out);
        }
        return Ok(out);
    };

    let chunk_rows = normalized_chunk_rows(threading.chunk_rows);
    let starts = (0..canvas.height).step_by(chunk_rows).collect::<Vec<u32>>();
    let chunk_rows = u32::try_from(chunk_rows).unwrap_or(u32::MAX);

    let chunks = pool.install(|| {
        starts
            .par_iter()
            .map_init(Vec::new, |scratch, &y0| -> ProcfieldResult<Vec<Sample>> {
                let y1 = y0.saturating_add(chunk_rows).min(canvas.height);
                let mut out = Vec::with_capacity((y1 - y0) as usize * canvas.width as usize);
                for y in y0..y1 {
                    check_cancel(cancel)?;
                    shade_row(shader, canvas, y, time, scratch, &mut out);
                }
                Ok(out)
            })
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(canvas.pixel_count());
    for chunk in chunks {
        out.extend(chunk?);
    }
    Ok(out)
}

fn shade_row<S: FieldShader + ?Sized>(
    shader: &S,
    canvas: Canvas,
    y: u32,
    time: f64,
    scratch: &mut Vec<Value>,
    out: &mut Vec<Sample>,
) {
    for x in 0..canvas.width {
        let pixel = PixelSample::new(canvas, x, y, time);
        out.push(shader.shade(&pixel, scratch));
    }
}

fn check_cancel(cancel: Option<&CancelFlag>) -> ProcfieldResult<()> {
    match cancel {
        Some(flag) if flag.is_cancelled() => Err(ProcfieldError::Cancelled),
        _ => Ok(()),
    }
}

fn normalized_chunk_rows(chunk_rows: usize) -> usize {
    chunk_rows.max(1)
}

fn build_thread_pool(threads: Option<usize>) -> ProcfieldResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ProcfieldError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}"))?;
    tracing::debug!(threads = pool.current_num_threads(), "render pool ready");
    Ok(pool)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
