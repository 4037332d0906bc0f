use crate::challenge::domain::draw_instructions::DrawInstructions;

/// Receives the user-facing side effects of each processed frame.
///
/// Help callbacks only fire when the value differs from the previous
/// frame's. All methods default to no-ops.
pub trait ChallengePresenter: Send {
    fn draw(&mut self, _instructions: &DrawInstructions) {}

    fn help_message_changed(&mut self, _message: Option<&str>) {}

    fn help_animation_changed(&mut self, _animation: Option<u32>) {}
}

/// Presenter that discards everything. Used by tests and headless runs.
pub struct NullChallengePresenter;

impl ChallengePresenter for NullChallengePresenter {}
