use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{EncodedVideo, EncoderConfig, VideoEncoder};
use crate::export::timestamped_filename;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegEncoder`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegEncoderOpts {
    /// Directory the finished video is delivered into.
    pub out_dir: PathBuf,
    /// Explicit output path; when unset a timestamped `quotecast-*.mp4` name in `out_dir` is used.
    pub out_path: Option<PathBuf>,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Frames held back waiting for an earlier, still-missing frame before the gap is skipped.
    pub max_reorder_frames: usize,
}

impl FfmpegEncoderOpts {
    /// Deliver into `out_dir` with a timestamped file name.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            out_path: None,
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            max_reorder_frames: 8,
        }
    }
}

/// Encoder that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// Output is H.264/yuv420p in an MP4 container, written to a partial file and moved into place
/// by `save`. Out-of-order frames are buffered and written in index order; when more than
/// `max_reorder_frames` frames wait on a missing one, that slot is skipped.
pub struct FfmpegEncoder {
    opts: FfmpegEncoderOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<EncoderConfig>,
    partial_path: Option<PathBuf>,
    finished: bool,

    pending: BTreeMap<u64, FrameRGBA>,
    next_idx: u64,
    frames_encoded: u64,
    frames_skipped: u64,
}

impl FfmpegEncoder {
    /// Create a new encoder that streams into `ffmpeg`.
    pub fn new(opts: FfmpegEncoderOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            partial_path: None,
            finished: false,
            pending: BTreeMap::new(),
            next_idx: 0,
            frames_encoded: 0,
            frames_skipped: 0,
        }
    }

    fn write_frame(&mut self, frame: &FrameRGBA) -> QuoteResult<()> {
        // Flatten premultiplied RGBA8 over the configured background.
        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(QuoteError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            QuoteError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames_encoded += 1;
        Ok(())
    }

    /// Write every buffered frame that continues the contiguous run at `next_idx`.
    fn drain_ready(&mut self) -> QuoteResult<()> {
        while let Some(frame) = self.pending.remove(&self.next_idx) {
            self.write_frame(&frame)?;
            self.next_idx += 1;
        }
        Ok(())
    }

    fn skip_to_first_pending(&mut self) {
        if let Some(&first) = self.pending.keys().next()
            && first > self.next_idx
        {
            tracing::warn!(
                missing_from = self.next_idx,
                missing_to = first,
                "skipping frames that never arrived"
            );
            self.frames_skipped += first - self.next_idx;
            self.next_idx = first;
        }
    }

    /// Flush buffered frames, close stdin and wait for ffmpeg to exit.
    fn finish(&mut self) -> QuoteResult<()> {
        let drained = (|| {
            while !self.pending.is_empty() {
                self.skip_to_first_pending();
                self.drain_ready()?;
            }
            Ok::<_, QuoteError>(())
        })();

        drop(self.stdin.take());
        self.cfg = None;
        let mut child = self
            .child
            .take()
            .ok_or_else(|| QuoteError::encode("ffmpeg encoder not started"))?;

        let status = child.wait().map_err(|e| {
            QuoteError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| QuoteError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| QuoteError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        drained?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(QuoteError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.finished = true;
        Ok(())
    }

    /// Remove the partial output file, if one is still owned by this encoder.
    fn discard_partial(&mut self) {
        self.finished = false;
        if let Some(partial) = self.partial_path.take()
            && let Err(e) = std::fs::remove_file(&partial)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(partial = %partial.display(), error = %e, "failed to remove partial video");
        }
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.discard_partial();
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn start(&mut self, cfg: EncoderConfig) -> QuoteResult<()> {
        if self.child.is_some() {
            return Err(QuoteError::encode("ffmpeg encoder already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(QuoteError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(QuoteError::validation(
                "ffmpeg encoder width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(QuoteError::validation(
                "ffmpeg encoder width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_dir(&self.opts.out_dir)?;
        if !is_ffmpeg_on_path() {
            return Err(QuoteError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let partial = self.opts.out_dir.join(format!(
            ".quotecast-{}-{}.mp4.part",
            std::process::id(),
            chrono::Local::now().timestamp_millis()
        ));

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Input: raw RGBA8 frames, already flattened to opaque in `capture`.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);
        // Output: h264 + yuv420p for broad compatibility.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ]);
        cmd.arg(&partial);

        let mut child = cmd.spawn().map_err(|e| {
            QuoteError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| QuoteError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| QuoteError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(partial = %partial.display(), width = cfg.width, height = cfg.height, "ffmpeg started");
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.partial_path = Some(partial);
        self.finished = false;
        self.pending.clear();
        self.next_idx = 0;
        self.frames_encoded = 0;
        self.frames_skipped = 0;
        Ok(())
    }

    fn capture(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuoteResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| QuoteError::encode("ffmpeg encoder not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(QuoteError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(QuoteError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        if idx.0 < self.next_idx {
            return Err(QuoteError::encode(format!(
                "frame {} arrived after its slot was written or skipped",
                idx.0
            )));
        }

        self.pending.insert(idx.0, frame.clone());
        self.drain_ready()?;
        if self.pending.len() > self.opts.max_reorder_frames {
            self.skip_to_first_pending();
            self.drain_ready()?;
        }
        Ok(())
    }

    fn stop(&mut self) -> QuoteResult<()> {
        if self.cfg.is_none() {
            return Err(QuoteError::encode("ffmpeg encoder not started"));
        }
        let result = self.finish();
        if result.is_err() {
            self.discard_partial();
        }
        result
    }

    fn save(&mut self) -> QuoteResult<EncodedVideo> {
        if !self.finished {
            return Err(QuoteError::encode("save called before a successful stop"));
        }
        let partial = self
            .partial_path
            .clone()
            .ok_or_else(|| QuoteError::encode("no finalized video to save"))?;
        let dest = match self.opts.out_path.clone() {
            Some(p) => p,
            None => self.opts.out_dir.join(timestamped_filename(
                "quotecast",
                "mp4",
                chrono::Local::now(),
            )),
        };
        if let Some(parent) = dest.parent() {
            ensure_dir(parent)?;
        }
        if !self.opts.overwrite && dest.exists() {
            return Err(QuoteError::validation(format!(
                "output file '{}' already exists",
                dest.display()
            )));
        }

        use anyhow::Context as _;
        std::fs::rename(&partial, &dest).with_context(|| {
            format!(
                "failed to move '{}' to '{}'",
                partial.display(),
                dest.display()
            )
        })?;
        self.partial_path = None;
        self.finished = false;
        tracing::info!(path = %dest.display(), frames = self.frames_encoded, "video saved");
        Ok(EncodedVideo {
            path: Some(dest),
            frames_encoded: self.frames_encoded,
            frames_skipped: self.frames_skipped,
        })
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate, as rational `num/den`.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> QuoteResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(QuoteError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;
        let r = s[0] as u16 + mul_div255_u16(bg_r, inv);
        let g = s[1] as u16 + mul_div255_u16(bg_g, inv);
        let b = s[2] as u16 + mul_div255_u16(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn ensure_dir(dir: &Path) -> QuoteResult<()> {
    use anyhow::Context as _;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
