use std::time::Instant;

use serde::Serialize;

use crate::challenge::domain::challenge_config::ChallengeConfig;
use crate::challenge::domain::challenge_error::ChallengeError;
use crate::challenge::domain::challenge_state::{ChallengeState, StateKind};
use crate::challenge::domain::draw_instructions::DrawInstructions;
use crate::detection::domain::detected_face::DetectedFace;
use crate::shared::clock::{Clock, SystemClock};

/// What the driver should do after one processed frame.
///
/// `success` is only set once `end` is true. Draw and help fields come from
/// the stage that processed the frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManagerOutput {
    pub end: bool,
    pub success: Option<bool>,
    pub should_save_frame: bool,
    pub draw: Option<DrawInstructions>,
    pub help_message: Option<&'static str>,
    pub help_animation: Option<u32>,
}

/// Owns the current challenge stage and enforces per-stage deadlines.
///
/// Calls must be strictly sequential; counters live on the current stage and
/// are mutated in place.
pub struct StateManager {
    config: ChallengeConfig,
    current: ChallengeState,
    deadline: Option<Instant>,
    clock: Box<dyn Clock>,
}

impl StateManager {
    pub fn new(config: ChallengeConfig) -> Result<Self, ChallengeError> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: ChallengeConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ChallengeError> {
        config.validate()?;
        let mut manager = Self {
            config,
            current: ChallengeState::initial(),
            deadline: None,
            clock,
        };
        manager.change_state(ChallengeState::initial())?;
        Ok(manager)
    }

    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }

    pub fn current_state(&self) -> &ChallengeState {
        &self.current
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn process(&mut self, faces: &[DetectedFace]) -> Result<ManagerOutput, ChallengeError> {
        log::debug!("current state: {}", self.current);

        if self.deadline.is_some_and(|d| self.clock.now() >= d) {
            log::info!("fail: {} timed out", self.current);
            self.change_state(ChallengeState::Fail)?;
        }

        let output = self.current.process(faces, &self.config)?;
        if let Some(next) = output.next_state {
            log::debug!("transition: {} -> {next}", self.current);
            self.change_state(next)?;
        }

        let (end, success, should_save_frame) = match self.current.kind() {
            StateKind::Success => (true, Some(true), true),
            StateKind::Fail => (true, Some(false), false),
            StateKind::Nose => (false, None, true),
            StateKind::Face | StateKind::Area => (false, None, false),
        };

        Ok(ManagerOutput {
            end,
            success,
            should_save_frame,
            draw: output.draw,
            help_message: output.help_message,
            help_animation: output.help_animation,
        })
    }

    fn change_state(&mut self, state: ChallengeState) -> Result<(), ChallengeError> {
        self.deadline = match state.max_dwell(&self.config) {
            Some(dwell) => Some(self.clock.now().checked_add(dwell).ok_or_else(|| {
                ChallengeError::InvalidConfig(format!("{state} duration {dwell:?} is out of range"))
            })?),
            None => None,
        };
        self.current = state;
        Ok(())
    }
}
