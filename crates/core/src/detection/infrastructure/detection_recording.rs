use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::infrastructure::recorded_face_detector::RecordedFaceDetector;
use crate::pipeline::infrastructure::recorded_frame_source::RecordedFrameSource;
use crate::shared::constants::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};

const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to read recording {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse recording {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Detector output captured for a whole session: one batch per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecording {
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    pub frames: Vec<Vec<DetectedFace>>,
}

fn default_image_width() -> u32 {
    DEFAULT_IMAGE_WIDTH
}

fn default_image_height() -> u32 {
    DEFAULT_IMAGE_HEIGHT
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

impl DetectionRecording {
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let json = fs::read_to_string(path).map_err(|source| RecordingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| RecordingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Splits the recording into a frame source and a detector that replays
    /// the recorded batch for each frame it yields.
    pub fn into_parts(self) -> (RecordedFrameSource, RecordedFaceDetector) {
        let source = RecordedFrameSource::new(
            self.image_width,
            self.image_height,
            self.frames.len(),
            self.frame_interval_ms,
        );
        let batches: HashMap<usize, Vec<DetectedFace>> =
            self.frames.into_iter().enumerate().collect();
        (source, RecordedFaceDetector::new(Arc::new(batches)))
    }
}
