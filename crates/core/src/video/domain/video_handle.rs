use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::video_metadata::VideoMetadata;

use super::frame_sampler::FrameSampler;
use super::video_reader::VideoReader;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("cannot open video {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("failed to read frame {index}: {reason}")]
    FrameRead { index: usize, reason: String },
    #[error("frame {index} has an unsupported pixel layout")]
    MalformedFrame { index: usize },
    #[error("video frames were already consumed")]
    AlreadySampled,
}

/// An opened video that releases its reader exactly once.
///
/// Release happens on [`release`](Self::release) or on drop, whichever
/// comes first, so every exit path of an analysis (success, read error,
/// detection error, early return) frees the decoder.
pub struct VideoHandle {
    reader: Box<dyn VideoReader>,
    metadata: VideoMetadata,
    released: bool,
    sampled: bool,
}

impl VideoHandle {
    /// Opens `path` with `reader`. On failure the reader is closed before
    /// the error is returned.
    pub fn open(mut reader: Box<dyn VideoReader>, path: &Path) -> Result<Self, VideoError> {
        match reader.open(path) {
            Ok(metadata) => {
                log::debug!(
                    "Opened {}: {}x{} @ {:.2} fps, {} frames",
                    path.display(),
                    metadata.width,
                    metadata.height,
                    metadata.fps,
                    metadata.total_frames
                );
                Ok(Self {
                    reader,
                    metadata,
                    released: false,
                    sampled: false,
                })
            }
            Err(e) => {
                reader.close();
                Err(VideoError::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn frame_rate(&self) -> f64 {
        self.metadata.fps
    }

    pub fn frame_count(&self) -> usize {
        self.metadata.total_frames
    }

    pub fn is_open(&self) -> bool {
        !self.released && self.reader.is_open()
    }

    /// Starts the single sampling pass over the video, keeping every
    /// `every`th frame.
    pub fn sample_every(&mut self, every: usize) -> Result<FrameSampler<'_>, VideoError> {
        if self.sampled || self.released {
            return Err(VideoError::AlreadySampled);
        }
        self.sampled = true;
        Ok(FrameSampler::new(self.reader.frames(), every))
    }

    pub fn release(&mut self) {
        if !self.released {
            self.reader.close();
            self.released = true;
            log::debug!("Released video reader");
        }
    }
}

impl Drop for VideoHandle {
    fn drop(&mut self) {
        self.release();
    }
}
