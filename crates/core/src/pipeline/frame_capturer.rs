use crate::shared::frame::Frame;

/// Collects the frames a challenge marks for remote verification.
///
/// Implementations typically queue uploads; once a challenge passes the
/// capturer is handed back to the caller to finish verification.
pub trait FrameCapturer: Send {
    fn capture(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Number of frames captured so far.
    fn captured(&self) -> usize;
}
