use std::collections::HashMap;
use std::sync::Arc;

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;

/// Replays recorded detection batches by frame index.
///
/// Frames with no recorded entry report no faces, the same as a detector
/// dropout.
pub struct RecordedFaceDetector {
    batches: Arc<HashMap<usize, Vec<DetectedFace>>>,
}

impl RecordedFaceDetector {
    pub fn new(batches: Arc<HashMap<usize, Vec<DetectedFace>>>) -> Self {
        Self { batches }
    }
}

impl FaceDetector for RecordedFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        Ok(self
            .batches
            .get(&frame.index())
            .cloned()
            .unwrap_or_default())
    }
}
