//! Target rectangles for a new challenge, derived from the camera frame size.
//!
//! The face area is a centered portrait rectangle; the nose area is a small
//! square at a random offset to the left or right of the frame center.

use rand::Rng;

use crate::shared::geometry::Rect;

const AREA_WIDTH_RATIO: f64 = 0.75;
const AREA_HEIGHT_RATIO: f64 = 0.75;
const AREA_ASPECT_RATIO: f64 = 0.75;

const NOSE_BOX_SIZE: f64 = 20.0;
const NOSE_CENTER_MIN_H_DIST: u32 = 45;
const NOSE_CENTER_MAX_H_DIST: u32 = 75;
const NOSE_CENTER_MAX_V_DIST: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChallengeLayout {
    pub face_area: Rect,
    pub nose_area: Rect,
}

impl ChallengeLayout {
    pub fn generate<R: Rng>(image_width: u32, image_height: u32, rng: &mut R) -> Self {
        Self {
            face_area: face_area(image_width as f64, image_height as f64),
            nose_area: nose_area(image_width as f64, image_height as f64, rng),
        }
    }
}

fn face_area(image_width: f64, image_height: f64) -> Rect {
    let height = image_height * AREA_HEIGHT_RATIO;
    let width = (image_width * AREA_WIDTH_RATIO).min(height * AREA_ASPECT_RATIO);
    let left = image_width / 2.0 - width / 2.0;
    let top = image_height / 2.0 - height / 2.0;
    Rect::new(left.trunc(), top.trunc(), width.trunc(), height.trunc())
}

fn nose_area<R: Rng>(image_width: f64, image_height: f64, rng: &mut R) -> Rect {
    let h_offset = rng.gen_range(NOSE_CENTER_MIN_H_DIST..=NOSE_CENTER_MAX_H_DIST) as f64;
    let left = if rng.gen_bool(0.5) {
        image_width / 2.0 + h_offset
    } else {
        image_width / 2.0 - h_offset - NOSE_BOX_SIZE
    };

    let v_offset = rng.gen_range(0..=NOSE_CENTER_MAX_V_DIST) as f64;
    let top = if rng.gen_bool(0.5) {
        image_height / 2.0 + v_offset
    } else {
        image_height / 2.0 - v_offset - NOSE_BOX_SIZE
    };

    Rect::new(left.trunc(), top.trunc(), NOSE_BOX_SIZE, NOSE_BOX_SIZE)
}
