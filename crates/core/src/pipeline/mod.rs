pub mod challenge_presenter;
pub mod frame_capturer;
pub mod frame_source;
pub mod infrastructure;
pub mod run_challenge_use_case;
