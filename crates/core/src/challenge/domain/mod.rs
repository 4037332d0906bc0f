pub mod challenge_config;
pub mod challenge_error;
pub mod challenge_layout;
pub mod challenge_state;
pub mod draw_instructions;
pub mod state_manager;
