//! Hit testing between eyes and pyramid vertices
//!
//! Eyes are stored by their top-left corner, so every test goes through
//! `object_center` first. Zones are recomputed from the pyramid's bounding
//! rectangle on each evaluation because the layout can move it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle in viewport pixels (left/top anchored)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// A circular acceptance region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetZone {
    pub center: Vec2,
    pub radius: f32,
}

impl TargetZone {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Zones for the three pyramid vertices: top, bottom-left, bottom-right.
    ///
    /// Order matters, evaluation takes the first zone that matches.
    pub fn pyramid_vertices(bounds: &Rect) -> [TargetZone; 3] {
        let c = bounds.center();
        [
            TargetZone::new(Vec2::new(c.x, c.y - TARGET_APEX_RISE), TARGET_RADIUS),
            TargetZone::new(
                Vec2::new(c.x - TARGET_BASE_SPREAD, c.y + TARGET_BASE_DROP),
                TARGET_RADIUS,
            ),
            TargetZone::new(
                Vec2::new(c.x + TARGET_BASE_SPREAD, c.y + TARGET_BASE_DROP),
                TARGET_RADIUS,
            ),
        ]
    }

    /// Top-left position an eye snaps to when it lands in this zone
    pub fn snap_position(&self) -> Vec2 {
        self.center - Vec2::splat(EYE_HALF_SIZE)
    }

    pub fn contains(&self, object_center: Vec2) -> bool {
        is_within(object_center, self.center, self.radius)
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Center of an eye given its top-left anchor
#[inline]
pub fn object_center(top_left: Vec2) -> Vec2 {
    top_left + Vec2::splat(EYE_HALF_SIZE)
}

/// Strict containment: a point exactly on the radius is a miss
#[inline]
pub fn is_within(object_center: Vec2, target_center: Vec2, radius: f32) -> bool {
    distance(object_center, target_center) < radius
}

/// First zone (in order) containing the eye anchored at `top_left`
pub fn first_match<'a>(top_left: Vec2, zones: &'a [TargetZone]) -> Option<&'a TargetZone> {
    let center = object_center(top_left);
    zones.iter().find(|zone| zone.contains(center))
}
