use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::{FrameIter, VideoReader};

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec).
///
/// Each decoded picture is converted to packed RGB24.
pub struct FfmpegReader {
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    video_stream_index: usize,
}

// Safety: FfmpegReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegReader {}

impl FfmpegReader {
    pub fn new() -> Self {
        Self {
            input_ctx: None,
            video_stream_index: 0,
        }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps: stream_fps(&stream),
            total_frames: stream.frames().max(0) as usize,
            source_path: Some(path.to_path_buf()),
        };

        self.video_stream_index = stream.index();
        self.input_ctx = Some(ictx);
        Ok(metadata)
    }

    fn frames(&mut self) -> FrameIter<'_> {
        let video_stream_index = self.video_stream_index;
        let Some(ictx) = self.input_ctx.as_mut() else {
            return Box::new(std::iter::once(Err("FfmpegReader: not opened".into())));
        };
        match FfmpegFrameIter::new(ictx, video_stream_index) {
            Ok(iter) => Box::new(iter),
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }

    fn is_open(&self) -> bool {
        self.input_ctx.is_some()
    }

    fn close(&mut self) {
        self.input_ctx = None;
    }
}

/// Real frame rate of the stream, falling back to the average rate.
fn stream_fps(stream: &ffmpeg_next::format::stream::Stream) -> f64 {
    [stream.rate(), stream.avg_frame_rate()]
        .into_iter()
        .find(|r| r.numerator() > 0 && r.denominator() > 0)
        .map(|r| r.numerator() as f64 / r.denominator() as f64)
        .unwrap_or(0.0)
}

/// Lazy iterator that decodes one frame at a time, so only the current
/// picture is ever held in memory.
struct FfmpegFrameIter<'a> {
    ictx: &'a mut ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    video_stream_index: usize,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl<'a> FfmpegFrameIter<'a> {
    fn new(
        ictx: &'a mut ffmpeg_next::format::context::Input,
        video_stream_index: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let decoder = {
            let stream = ictx
                .stream(video_stream_index)
                .ok_or("Video stream disappeared")?;
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?
                .decoder()
                .video()?
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            width,
            height,
            video_stream_index,
            frame_index: 0,
            flushing: false,
            done: false,
        })
    }

    /// Pulls the next decoded picture, if the decoder has one ready.
    /// `EAGAIN` and end-of-stream mean "nothing yet"; other errors are real.
    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        match self.decoder.receive_frame(&mut decoded) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => return None,
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {
                return None
            }
            Err(e) => {
                self.done = true;
                return Some(Err(Box::new(e)));
            }
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.scaler.run(&decoded, &mut rgb_frame) {
            return Some(Err(Box::new(e)));
        }

        let pixels = packed_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, 3, self.frame_index);
        self.frame_index += 1;
        Some(Ok(frame))
    }
}

impl Iterator for FfmpegFrameIter<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                if let Some(result) = self.try_receive() {
                    return Some(result);
                }
                self.done = true;
                return None;
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            // A rejected packet ends the stream; skipping it would shift every later index.
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Decoder rejected packet before frame {}: {e}", self.frame_index);
                self.done = true;
                return Some(Err(Box::new(e)));
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }
}

/// Copies pixel rows out of an ffmpeg frame, dropping the per-row stride padding.
fn packed_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_len = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_len]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::FRAME_SKIP;
    use crate::video::domain::video_handle::VideoHandle;
    use std::path::PathBuf;

    fn create_test_video(path: &Path, num_frames: usize, width: u32, height: u32, fps: i32) {
        ffmpeg_next::init().unwrap();

        let mut octx = ffmpeg_next::format::output(path).unwrap();
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
        let mut ost = octx.add_stream(Some(codec)).unwrap();

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let mut encoder = encoder_ctx
            .open_with(ffmpeg_next::Dictionary::new())
            .unwrap();
        ost.set_parameters(&encoder);
        octx.write_header().unwrap();
        let ost_time_base = octx.stream(0).unwrap().time_base();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::format::Pixel::YUV420P,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .unwrap();

        for i in 0..num_frames {
            let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
            );
            let stride = rgb_frame.stride(0);
            let value = ((i * 40) % 256) as u8;
            let data = rgb_frame.data_mut(0);
            for row in 0..height as usize {
                let start = row * stride;
                data[start..start + width as usize * 3].fill(value);
            }

            let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
            scaler.run(&rgb_frame, &mut yuv_frame).unwrap();
            yuv_frame.set_pts(Some(i as i64));
            encoder.send_frame(&yuv_frame).unwrap();
            let mut encoded = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut encoded).is_ok() {
                encoded.set_stream(0);
                encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
                encoded.write_interleaved(&mut octx).unwrap();
            }
        }

        encoder.send_eof().unwrap();
        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
            encoded.write_interleaved(&mut octx).unwrap();
        }
        octx.write_trailer().unwrap();
    }

    fn test_video(dir: &Path, num_frames: usize) -> PathBuf {
        let path = dir.join("interview.mp4");
        create_test_video(&path, num_frames, 160, 120, 30);
        path
    }

    #[test]
    fn test_open_returns_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video(dir.path(), 5);

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!(meta.width, 160);
        assert_eq!(meta.height, 120);
        assert!(meta.fps > 0.0);
        assert_eq!(meta.source_path, Some(path));
        assert!(reader.is_open());
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let mut reader = FfmpegReader::new();
        assert!(reader.open(Path::new("/nonexistent/interview.mp4")).is_err());
        assert!(!reader.is_open());
    }

    #[test]
    fn test_open_non_video_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.mp4");
        std::fs::write(&path, b"definitely not a video").unwrap();

        let mut reader = FfmpegReader::new();
        assert!(reader.open(&path).is_err());
    }

    #[test]
    fn test_frames_yield_sequential_rgb_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video(dir.path(), 5);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();

        let frames: Vec<Frame> = reader.frames().map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 5);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.index(), i);
            assert_eq!(frame.channels(), 3);
            assert_eq!(frame.data().len(), 160 * 120 * 3);
        }
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut reader = FfmpegReader::new();
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_sampling_a_real_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video(dir.path(), 25);

        let mut handle = VideoHandle::open(Box::new(FfmpegReader::new()), &path).unwrap();
        let mut sampler = handle.sample_every(FRAME_SKIP).unwrap();
        let indices: Vec<usize> = sampler.by_ref().map(|s| s.unwrap().index).collect();
        assert_eq!(indices, vec![0, 10, 20]);
        assert_eq!(sampler.frames_read(), 25);
    }

    #[test]
    fn test_corrupt_video_never_drops_frames_silently() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video(dir.path(), 30);

        // Damage the middle of the sample data, leaving the container index intact.
        let mut bytes = std::fs::read(&path).unwrap();
        let tag = bytes.windows(4).position(|w| w == b"mdat").unwrap();
        let size = u32::from_be_bytes(bytes[tag - 4..tag].try_into().unwrap()) as usize;
        let payload = (tag + 4)..(tag - 4 + size).min(bytes.len());
        let mid = payload.start + payload.len() / 2;
        let end = (mid + 64).min(payload.end);
        bytes[mid..end].fill(0xFF);
        std::fs::write(&path, &bytes).unwrap();

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        let results: Vec<_> = reader.frames().collect();

        // Either decoding fails loudly at the bad packet and stops there, or
        // every frame comes back with contiguous indices.
        match results.iter().position(|r| r.is_err()) {
            Some(first_err) => assert_eq!(first_err, results.len() - 1),
            None => {
                assert_eq!(results.len(), 30);
                for (i, frame) in results.iter().enumerate() {
                    assert_eq!(frame.as_ref().unwrap().index(), i);
                }
            }
        }
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video(dir.path(), 1);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        reader.close();
        assert!(!reader.is_open());
        reader.close();
    }
}
