pub mod manifest_frame_capturer;
pub mod recorded_frame_source;
