use glam::Vec2;

use crate::api::BodyPose;
use crate::geometry::Bounds;

/// Plain centered box, for hosts that keep no transform of their own.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxBody {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl BoxBody {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self { center, half_extents }
    }

    /// Box whose bottom edge rests at `bottom_y`.
    pub fn standing_at(x: f32, bottom_y: f32, half_extents: Vec2) -> Self {
        Self::new(Vec2::new(x, bottom_y + half_extents.y), half_extents)
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }
}

impl BodyPose for BoxBody {
    fn collider_bounds(&self) -> Bounds {
        Bounds::from_center_half(self.center, self.half_extents)
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standing_box_pose() {
        let mut b = BoxBody::standing_at(1.0, 2.0, Vec2::new(0.5, 0.25));
        assert_eq!(b.center, Vec2::new(1.0, 2.25));
        assert_eq!(b.bottom(), 2.0);
        b.translate(Vec2::new(-1.0, 0.5));
        let bounds = b.collider_bounds();
        assert_eq!(bounds.min, Vec2::new(-0.5, 2.5));
        assert_eq!(bounds.max, Vec2::new(0.5, 3.0));
    }
}
