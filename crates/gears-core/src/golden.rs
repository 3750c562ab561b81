//! Golden-image regression checks
//!
//! Every `interval` frames the harness grabs the rendered frame and either
//! stores it as a golden image or compares it byte-for-byte with the stored
//! one. Golden images are raw RGBA8 dumps (row-major, no header,
//! `width * height * 4` bytes) named `<dir>/<app_name>_frame<index>`.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::golden::{APP_NAME, DIR, FPS_REPORT_SECONDS, INTERVAL, MAX_IMAGES};

/// What the harness does with captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoldenMode {
    /// Frames are not captured
    #[default]
    Off,
    /// Captured frames are written as golden images
    Generate,
    /// Captured frames are compared with golden images
    Test,
}

/// Golden-image harness settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenConfig {
    /// Directory holding the golden images
    pub dir: String,
    /// File name prefix
    pub app_name: String,
    /// Frames between two captures
    pub interval: u64,
    /// Generation stops after writing the image with this index
    pub max_images: u64,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            dir: DIR.into(),
            app_name: APP_NAME.into(),
            interval: INTERVAL,
            max_images: MAX_IMAGES,
        }
    }
}

impl GoldenConfig {
    pub fn image_path(&self, index: u64) -> PathBuf {
        golden_path(&self.dir, &self.app_name, index)
    }
}

/// `<dir>/<app_name>_frame<index>`
pub fn golden_path(dir: impl AsRef<Path>, app_name: &str, index: u64) -> PathBuf {
    dir.as_ref().join(format!("{app_name}_frame{index}"))
}

/// Offset of the first differing byte, if any
///
/// Frames of different length differ at the end of the shorter one.
pub fn compare_frame(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

/// Why a test run failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// Not even the first golden image exists
    NoGoldenImages,
    WrongSize { expected: usize, actual: usize },
    Mismatch { image: u64, offset: usize },
}

/// Final outcome of a harness run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// All compared frames matched; `frames` as reported by the harness
    /// (one less than the index of the first missing golden image)
    Pass { frames: u64 },
    Fail(FailReason),
    /// Generation finished after writing `images` golden images
    Generated { images: u64 },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        !matches!(self, Verdict::Fail(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass { frames } => {
                write!(f, "PASS : All {frames} frames identical to golden images")
            }
            Verdict::Fail(FailReason::NoGoldenImages) => {
                write!(f, "FAIL : No golden images to compare with")
            }
            Verdict::Fail(FailReason::WrongSize { expected, actual }) => write!(
                f,
                "FAIL : golden image has wrong size ({actual} bytes, expected {expected})"
            ),
            Verdict::Fail(FailReason::Mismatch { image, offset }) => {
                write!(f, "FAIL : golden image mismatch frame: {image} (byte {offset})")
            }
            Verdict::Generated { images } => {
                write!(f, "Done generating {images} golden images")
            }
        }
    }
}

/// Result of handing one frame to the harness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Finished(Verdict),
}

/// Per-frame capture and comparison
#[derive(Debug, Clone)]
pub struct GoldenHarness {
    mode: GoldenMode,
    config: GoldenConfig,
    frame_bytes: usize,
    frame: u64,
}

impl GoldenHarness {
    /// `frame_bytes` is the size of one grabbed frame, see [`ViewportConfig::frame_bytes`]
    ///
    /// [`ViewportConfig::frame_bytes`]: crate::scene::ViewportConfig::frame_bytes
    pub fn new(mode: GoldenMode, config: GoldenConfig, frame_bytes: usize) -> Self {
        Self {
            mode,
            config,
            frame_bytes,
            frame: 0,
        }
    }

    /// Frames handled so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Expected size of a grabbed frame in bytes
    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    /// Whether the current frame will be captured
    pub fn captures_current_frame(&self) -> bool {
        self.mode != GoldenMode::Off && self.frame.checked_rem(self.config.interval) == Some(0)
    }

    /// Handle the frame that was just rendered
    ///
    /// `grab` reads back the framebuffer; it is only called on capture frames.
    /// The frame counts as handled even when an error is returned.
    pub fn handle_frame<F>(&mut self, grab: F) -> Result<FrameStatus, GoldenError>
    where
        F: FnOnce() -> Vec<u8>,
    {
        let capture = self
            .captures_current_frame()
            .then(|| self.frame / self.config.interval);
        self.frame += 1;
        match capture {
            Some(index) => self.check_image(index, &grab()),
            None => Ok(FrameStatus::Continue),
        }
    }

    /// Store or compare golden image `index`
    pub fn check_image(&self, index: u64, pixels: &[u8]) -> Result<FrameStatus, GoldenError> {
        if pixels.len() != self.frame_bytes {
            return Err(GoldenError::FrameSize {
                expected: self.frame_bytes,
                actual: pixels.len(),
            });
        }
        let path = self.config.image_path(index);
        match self.mode {
            GoldenMode::Off => Ok(FrameStatus::Continue),
            GoldenMode::Test => self.compare_image(index, &path, pixels),
            GoldenMode::Generate => self.write_image(index, &path, pixels),
        }
    }

    fn compare_image(
        &self,
        index: u64,
        path: &Path,
        pixels: &[u8],
    ) -> Result<FrameStatus, GoldenError> {
        let golden = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let verdict = if index == 0 {
                    Verdict::Fail(FailReason::NoGoldenImages)
                } else {
                    Verdict::Pass {
                        frames: index - 1,
                    }
                };
                return Ok(FrameStatus::Finished(verdict));
            }
            Err(e) => return Err(GoldenError::Io(format!("{}: {e}", path.display()))),
        };

        if golden.len() != self.frame_bytes {
            return Ok(FrameStatus::Finished(Verdict::Fail(FailReason::WrongSize {
                expected: self.frame_bytes,
                actual: golden.len(),
            })));
        }
        if let Some(offset) = compare_frame(&golden, pixels) {
            tracing::warn!("Golden image {} differs at byte {}", path.display(), offset);
            return Ok(FrameStatus::Finished(Verdict::Fail(FailReason::Mismatch {
                image: index,
                offset,
            })));
        }
        tracing::debug!("Golden image {} matches", path.display());
        Ok(FrameStatus::Continue)
    }

    fn write_image(
        &self,
        index: u64,
        path: &Path,
        pixels: &[u8],
    ) -> Result<FrameStatus, GoldenError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| GoldenError::Io(e.to_string()))?;
        }
        std::fs::write(path, pixels)
            .map_err(|e| GoldenError::Io(format!("{}: {e}", path.display())))?;
        tracing::info!("Wrote golden image {}", path.display());

        if index == self.config.max_images {
            Ok(FrameStatus::Finished(Verdict::Generated { images: index + 1 }))
        } else {
            Ok(FrameStatus::Continue)
        }
    }
}

/// Frames rendered over a measured period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate {
    pub frames: u64,
    pub seconds: f64,
}

impl FrameRate {
    pub fn fps(&self) -> f64 {
        self.frames as f64 / self.seconds
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames in {:3.1} seconds = {:6.3} FPS",
            self.frames,
            self.seconds,
            self.fps()
        )
    }
}

/// Periodic frame-rate report
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    period: f64,
    frames: u64,
    start: Option<(f64, u64)>,
}

impl Default for FrameRateCounter {
    fn default() -> Self {
        Self::new(FPS_REPORT_SECONDS)
    }
}

impl FrameRateCounter {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            frames: 0,
            start: None,
        }
    }

    /// Count one presented frame at time `now` (seconds)
    ///
    /// Returns the rate once at least `period` seconds have passed since the
    /// last report.
    pub fn tick(&mut self, now: f64) -> Option<FrameRate> {
        self.frames += 1;
        let (t0, frame0) = *self.start.get_or_insert((now, self.frames));
        let seconds = now - t0;
        if seconds < self.period {
            return None;
        }
        let rate = FrameRate {
            frames: self.frames - frame0,
            seconds,
        };
        self.start = Some((now, self.frames));
        tracing::info!("{}", rate);
        Some(rate)
    }
}

/// Golden-image harness errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GoldenError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },
}
