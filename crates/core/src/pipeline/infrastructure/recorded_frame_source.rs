use crate::pipeline::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Yields pixel-less frames for a recorded session, one per recorded batch.
pub struct RecordedFrameSource {
    width: u32,
    height: u32,
    frame_count: usize,
    frame_interval_ms: u64,
    next_index: usize,
}

impl RecordedFrameSource {
    pub fn new(width: u32, height: u32, frame_count: usize, frame_interval_ms: u64) -> Self {
        Self {
            width,
            height,
            frame_count,
            frame_interval_ms,
            next_index: 0,
        }
    }
}

impl FrameSource for RecordedFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.next_index >= self.frame_count {
            return Ok(None);
        }
        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Frame::new(
            self.width,
            self.height,
            index,
            index as u64 * self.frame_interval_ms,
        )))
    }
}
