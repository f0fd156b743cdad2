use image::GrayImage;

use super::video_handle::VideoError;
use super::video_reader::FrameIter;

/// A frame selected for analysis, already converted to grayscale.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    /// Position of the frame in the decoded stream, counting from 0.
    pub index: usize,
    pub image: GrayImage,
}

/// Lazily yields every `every`th decoded frame (indices 0, every, 2·every, …).
///
/// Skipped frames are still pulled from the source so that indices and
/// [`frames_read`](Self::frames_read) reflect the true stream position.
/// The first read error is yielded once and ends the sequence.
pub struct FrameSampler<'a> {
    frames: FrameIter<'a>,
    every: usize,
    frames_read: usize,
    done: bool,
}

impl<'a> FrameSampler<'a> {
    pub fn new(frames: FrameIter<'a>, every: usize) -> Self {
        Self {
            frames,
            every: every.max(1),
            frames_read: 0,
            done: false,
        }
    }

    /// Frames pulled from the source so far, sampled or not.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }
}

impl Iterator for FrameSampler<'_> {
    type Item = Result<SampledFrame, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let index = self.frames_read;
            match self.frames.next() {
                None => self.done = true,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(VideoError::FrameRead {
                        index,
                        reason: e.to_string(),
                    }));
                }
                Some(Ok(frame)) => {
                    self.frames_read += 1;
                    if index % self.every != 0 {
                        continue;
                    }
                    return Some(match frame.into_grayscale() {
                        Some(image) => Ok(SampledFrame { index, image }),
                        None => {
                            self.done = true;
                            Err(VideoError::MalformedFrame { index })
                        }
                    });
                }
            }
        }
        None
    }
}
