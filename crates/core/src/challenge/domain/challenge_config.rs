use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::challenge::domain::challenge_error::ChallengeError;
use crate::challenge::domain::challenge_layout::ChallengeLayout;
use crate::shared::constants::{
    DEFAULT_MAX_FRAMES_WITHOUT_FACE, DEFAULT_STATE_DURATION_SECS, DEFAULT_TOLERANCE_PERCENT,
    MAX_STATE_DURATION_SECS, NOSE_TIP_LANDMARK_INDEX,
};
use crate::shared::geometry::Rect;

/// Immutable parameters of one challenge.
///
/// A `None` duration means the stage may be occupied indefinitely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    pub face_area: Rect,
    pub nose_area: Rect,
    pub face_area_tolerance_percent: f64,
    pub area_duration_secs: Option<u64>,
    pub nose_duration_secs: Option<u64>,
    pub area_max_frames_without_face: u32,
    pub nose_max_frames_without_face: u32,
    pub landmark_index: usize,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        // Targets for a 640x480 frame, nose area to the right of center.
        Self {
            face_area: Rect::new(185.0, 60.0, 270.0, 360.0),
            nose_area: Rect::new(380.0, 250.0, 20.0, 20.0),
            face_area_tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
            area_duration_secs: Some(DEFAULT_STATE_DURATION_SECS),
            nose_duration_secs: Some(DEFAULT_STATE_DURATION_SECS),
            area_max_frames_without_face: DEFAULT_MAX_FRAMES_WITHOUT_FACE,
            nose_max_frames_without_face: DEFAULT_MAX_FRAMES_WITHOUT_FACE,
            landmark_index: NOSE_TIP_LANDMARK_INDEX,
        }
    }
}

impl ChallengeConfig {
    pub fn with_layout(self, layout: &ChallengeLayout) -> Self {
        Self {
            face_area: layout.face_area,
            nose_area: layout.nose_area,
            ..self
        }
    }

    pub fn area_duration(&self) -> Option<Duration> {
        self.area_duration_secs.map(Duration::from_secs)
    }

    pub fn nose_duration(&self) -> Option<Duration> {
        self.nose_duration_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ChallengeError> {
        validate_area("face_area", &self.face_area)?;
        validate_area("nose_area", &self.nose_area)?;
        let tolerance = self.face_area_tolerance_percent;
        if !(0.0..=100.0).contains(&tolerance) {
            return Err(ChallengeError::InvalidConfig(format!(
                "face_area_tolerance_percent must be between 0 and 100, got {tolerance}"
            )));
        }
        validate_duration("area_duration_secs", self.area_duration_secs)?;
        validate_duration("nose_duration_secs", self.nose_duration_secs)?;
        Ok(())
    }
}

fn validate_duration(name: &str, secs: Option<u64>) -> Result<(), ChallengeError> {
    match secs {
        Some(secs) if secs > MAX_STATE_DURATION_SECS => Err(ChallengeError::InvalidConfig(
            format!("{name} must be at most {MAX_STATE_DURATION_SECS}, got {secs}"),
        )),
        _ => Ok(()),
    }
}

fn validate_area(name: &str, area: &Rect) -> Result<(), ChallengeError> {
    let values = [area.x, area.y, area.width, area.height];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ChallengeError::InvalidConfig(format!(
            "{name} must have finite coordinates, got {area:?}"
        )));
    }
    if area.x < 0.0 || area.y < 0.0 {
        return Err(ChallengeError::InvalidConfig(format!(
            "{name} must not start at negative coordinates, got ({}, {})",
            area.x, area.y
        )));
    }
    if area.width <= 0.0 || area.height <= 0.0 {
        return Err(ChallengeError::InvalidConfig(format!(
            "{name} must have a positive size, got {}x{}",
            area.width, area.height
        )));
    }
    Ok(())
}
