use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Iterator over decoded frames, in decode order.
pub type FrameIter<'a> = Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + 'a>;

/// Sequential frame source.
///
/// The frame iterator is lazy and not restartable: a second call to
/// `frames` continues where the first one stopped. Callers normally go
/// through [`VideoHandle`](super::video_handle::VideoHandle), which
/// guarantees `close` runs exactly once.
pub trait VideoReader: Send {
    /// Opens the source and returns frame rate, frame count and size.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    fn frames(&mut self) -> FrameIter<'_>;

    fn is_open(&self) -> bool;

    /// Releases decoder and file resources. Must be safe to call twice.
    fn close(&mut self);
}
