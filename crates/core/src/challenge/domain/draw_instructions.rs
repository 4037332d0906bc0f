use serde::Serialize;

/// Outline color for a target area. Red asks for attention, green confirms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxColor {
    Red,
    Green,
    Yellow,
}

impl BoxColor {
    pub fn rgba(&self) -> &'static str {
        match self {
            BoxColor::Red => "rgba(255, 0, 0, 1)",
            BoxColor::Green => "rgba(0, 255, 0, 1)",
            BoxColor::Yellow => "rgba(255, 255, 0, 1)",
        }
    }
}

impl std::fmt::Display for BoxColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoxColor::Red => write!(f, "red"),
            BoxColor::Green => write!(f, "green"),
            BoxColor::Yellow => write!(f, "yellow"),
        }
    }
}

/// Which target areas to outline for the current frame, and in what color.
///
/// An absent entry means the area is not drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DrawInstructions {
    pub face_area: Option<BoxColor>,
    pub nose_area: Option<BoxColor>,
}

impl DrawInstructions {
    pub fn face_only(color: BoxColor) -> Self {
        Self {
            face_area: Some(color),
            nose_area: None,
        }
    }

    pub fn face_and_nose(face: BoxColor, nose: BoxColor) -> Self {
        Self {
            face_area: Some(face),
            nose_area: Some(nose),
        }
    }
}
