//! Stages of a liveness challenge.
//!
//! Face → Area → Nose → Success, with Fail reachable from Area and Nose (and
//! from any non-terminal stage through the manager's timeout). Each stage
//! consumes one detection batch per call and reports whether to move on.
//!
//! Area and Nose tolerate a limited number of frames without any face; a
//! frame with several faces fails them outright.

use std::time::Duration;

use crate::challenge::domain::challenge_config::ChallengeConfig;
use crate::challenge::domain::challenge_error::ChallengeError;
use crate::challenge::domain::draw_instructions::{BoxColor, DrawInstructions};
use crate::detection::domain::detected_face::DetectedFace;
use crate::shared::constants::{
    AREA_HELP_ANIMATION, AREA_HELP_MESSAGE, MULTIPLE_FACES_MESSAGE, NOSE_HELP_ANIMATION,
    NOSE_HELP_MESSAGE, NO_FACE_MESSAGE,
};
use crate::shared::geometry::{face_box_inside_area, point_inside_area};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    Face,
    Area,
    Nose,
    Success,
    Fail,
}

/// The current stage plus the counters scoped to it.
///
/// A transition always produces a fresh value, so counters never leak from
/// one stage instance to the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeState {
    Face,
    Area { frames_without_face: u32 },
    Nose { frames_without_face: u32 },
    Success,
    Fail,
}

/// Result of processing one detection batch. `next_state: None` means stay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateOutput {
    pub next_state: Option<ChallengeState>,
    pub draw: Option<DrawInstructions>,
    pub help_message: Option<&'static str>,
    pub help_animation: Option<u32>,
}

impl ChallengeState {
    pub fn initial() -> Self {
        ChallengeState::Face
    }

    fn area() -> Self {
        ChallengeState::Area {
            frames_without_face: 0,
        }
    }

    fn nose() -> Self {
        ChallengeState::Nose {
            frames_without_face: 0,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            ChallengeState::Face => StateKind::Face,
            ChallengeState::Area { .. } => StateKind::Area,
            ChallengeState::Nose { .. } => StateKind::Nose,
            ChallengeState::Success => StateKind::Success,
            ChallengeState::Fail => StateKind::Fail,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind() {
            StateKind::Face => "FaceState",
            StateKind::Area => "AreaState",
            StateKind::Nose => "NoseState",
            StateKind::Success => "SuccessState",
            StateKind::Fail => "FailState",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind(), StateKind::Success | StateKind::Fail)
    }

    /// How long this stage may stay current; `None` is unbounded.
    pub fn max_dwell(&self, config: &ChallengeConfig) -> Option<Duration> {
        match self {
            ChallengeState::Area { .. } => config.area_duration(),
            ChallengeState::Nose { .. } => config.nose_duration(),
            ChallengeState::Face | ChallengeState::Success | ChallengeState::Fail => None,
        }
    }

    pub fn process(
        &mut self,
        faces: &[DetectedFace],
        config: &ChallengeConfig,
    ) -> Result<StateOutput, ChallengeError> {
        match self {
            ChallengeState::Face => Ok(process_face(faces)),
            ChallengeState::Area {
                frames_without_face,
            } => Ok(process_area(faces, config, frames_without_face)),
            ChallengeState::Nose {
                frames_without_face,
            } => process_nose(faces, config, frames_without_face),
            ChallengeState::Success | ChallengeState::Fail => Ok(StateOutput::default()),
        }
    }
}

impl std::fmt::Display for ChallengeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn process_face(faces: &[DetectedFace]) -> StateOutput {
    let (next_state, help_message) = match faces.len() {
        0 => (None, Some(NO_FACE_MESSAGE)),
        1 => (Some(ChallengeState::area()), None),
        _ => (None, Some(MULTIPLE_FACES_MESSAGE)),
    };
    StateOutput {
        next_state,
        draw: Some(DrawInstructions::face_only(BoxColor::Red)),
        help_message,
        help_animation: None,
    }
}

fn process_area(
    faces: &[DetectedFace],
    config: &ChallengeConfig,
    frames_without_face: &mut u32,
) -> StateOutput {
    let mut next_state = None;
    let mut color = BoxColor::Red;

    if let [face] = faces {
        if face_box_inside_area(&face.bounding_box, &config.face_area, 0.0) {
            color = BoxColor::Green;
            next_state = Some(ChallengeState::nose());
        }
    } else if missed_too_often(
        faces.len(),
        frames_without_face,
        config.area_max_frames_without_face,
    ) {
        log::info!(
            "AreaState fail: #faces={} framesWithoutFace={frames_without_face}",
            faces.len()
        );
        next_state = Some(ChallengeState::Fail);
    } else {
        log::debug!("no face detected. Skipping frame...");
    }

    StateOutput {
        next_state,
        draw: Some(DrawInstructions::face_only(color)),
        help_message: Some(AREA_HELP_MESSAGE),
        help_animation: Some(AREA_HELP_ANIMATION),
    }
}

fn process_nose(
    faces: &[DetectedFace],
    config: &ChallengeConfig,
    frames_without_face: &mut u32,
) -> Result<StateOutput, ChallengeError> {
    let mut next_state = None;

    if let [face] = faces {
        if face_box_inside_area(
            &face.bounding_box,
            &config.face_area,
            config.face_area_tolerance_percent,
        ) {
            let nose = face.landmark(config.landmark_index)?;
            if point_inside_area(&nose, &config.nose_area) {
                next_state = Some(ChallengeState::Success);
            }
        } else {
            log::info!("NoseState fail: face box left the face area");
            next_state = Some(ChallengeState::Fail);
        }
    } else if missed_too_often(
        faces.len(),
        frames_without_face,
        config.nose_max_frames_without_face,
    ) {
        log::info!(
            "NoseState fail: #faces={} framesWithoutFace={frames_without_face}",
            faces.len()
        );
        next_state = Some(ChallengeState::Fail);
    } else {
        log::debug!("no face detected. Skipping frame...");
    }

    Ok(StateOutput {
        next_state,
        draw: Some(DrawInstructions::face_and_nose(
            BoxColor::Green,
            BoxColor::Yellow,
        )),
        help_message: Some(NOSE_HELP_MESSAGE),
        help_animation: Some(NOSE_HELP_ANIMATION),
    })
}

/// Only called for face counts other than one. Several faces fail outright
/// and leave the counter alone; an empty batch spends one unit of the miss
/// budget and fails once the budget is exceeded.
fn missed_too_often(face_count: usize, frames_without_face: &mut u32, max: u32) -> bool {
    if face_count != 0 {
        return true;
    }
    *frames_without_face += 1;
    *frames_without_face > max
}
