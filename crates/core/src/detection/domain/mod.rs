pub mod detected_face;
pub mod face_detector;
