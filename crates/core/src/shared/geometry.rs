use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in frame pixel coordinates.
///
/// `x`/`y` are the left/top edges; the right/bottom edges are derived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Whether a face bounding box sits inside the target face area.
///
/// The tolerance widens the area: the left/top limits shrink by
/// `area.x * t` / `area.y * t` and the right/bottom limits grow by
/// `area.width * t` / `area.height * t`, with `t = tolerance_percent / 100`.
/// A tolerance of `0.0` gives the strict check.
pub fn face_box_inside_area(face_box: &Rect, area: &Rect, tolerance_percent: f64) -> bool {
    let t = tolerance_percent / 100.0;
    face_box.x >= area.x * (1.0 - t)
        && face_box.y >= area.y * (1.0 - t)
        && face_box.right() <= area.x + area.width * (1.0 + t)
        && face_box.bottom() <= area.y + area.height * (1.0 + t)
}

/// Inclusive point-in-rectangle test.
pub fn point_inside_area(point: &Point, area: &Rect) -> bool {
    point.x >= area.x && point.x <= area.right() && point.y >= area.y && point.y <= area.bottom()
}
