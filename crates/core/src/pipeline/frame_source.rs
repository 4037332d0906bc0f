use crate::shared::frame::Frame;

/// Supplies camera frames to the challenge driver, one per tick.
///
/// `Ok(None)` means the source is exhausted (camera closed, recording ended).
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;
}
