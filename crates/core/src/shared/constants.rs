pub const NO_FACE_MESSAGE: &str = "No face detected. Look at the camera.";
pub const MULTIPLE_FACES_MESSAGE: &str = "More than one face detected. Should be one.";
pub const AREA_HELP_MESSAGE: &str = "Center your face inside the area";
pub const NOSE_HELP_MESSAGE: &str = "Move the tip of your nose inside the yellow area";

pub const AREA_HELP_ANIMATION: u32 = 1;
pub const NOSE_HELP_ANIMATION: u32 = 2;

/// Nose tip in the 68-point landmark scheme.
pub const NOSE_TIP_LANDMARK_INDEX: usize = 30;

pub const DEFAULT_TOLERANCE_PERCENT: f64 = 10.0;
pub const DEFAULT_STATE_DURATION_SECS: u64 = 10;
pub const MAX_STATE_DURATION_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_MAX_FRAMES_WITHOUT_FACE: u32 = 3;

pub const DEFAULT_IMAGE_WIDTH: u32 = 640;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 480;
