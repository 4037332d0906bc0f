use serde::{Deserialize, Serialize};

use crate::challenge::domain::challenge_error::ChallengeError;
use crate::shared::geometry::{Point, Rect};

/// One face reported by the detector for a single frame.
///
/// `landmarks` is the detector's fixed-size, ordered point set (68 points
/// for the usual landmark model).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    #[serde(rename = "box")]
    pub bounding_box: Rect,
    #[serde(default)]
    pub landmarks: Vec<Point>,
}

impl DetectedFace {
    pub fn new(bounding_box: Rect, landmarks: Vec<Point>) -> Self {
        Self {
            bounding_box,
            landmarks,
        }
    }

    /// Landmark at `index`, or an error when the detector returned a
    /// shorter point set than the challenge was configured for.
    pub fn landmark(&self, index: usize) -> Result<Point, ChallengeError> {
        self.landmarks
            .get(index)
            .copied()
            .ok_or(ChallengeError::MissingLandmark {
                index,
                available: self.landmarks.len(),
            })
    }
}
