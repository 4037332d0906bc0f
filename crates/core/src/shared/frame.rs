/// A single camera frame handed to the challenge driver.
///
/// The challenge only needs to know where a frame sits in the session;
/// detections for it come from the face detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    index: usize,
    timestamp_ms: u64,
}

impl Frame {
    pub fn new(width: u32, height: u32, index: usize, timestamp_ms: u64) -> Self {
        Self {
            width,
            height,
            index,
            timestamp_ms,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}
