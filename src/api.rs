use glam::Vec2;

use crate::geometry::Bounds;
use crate::types::*;

/// Read-only spatial query the motor casts its rays against.
///
/// Implementations must return the *nearest* hit within `max_distance`, or `None`.
/// `dir` is always a unit, axis-aligned vector. Called through `&self`, so a query that is
/// not mutated during the tick phase can be shared by motors ticking on several threads.
pub trait RayQuery {
    fn cast(&self, origin: Vec2, dir: Vec2, max_distance: f32, mask: LayerMask) -> Option<RayHit>;
}

/// Pose of the body a motor drives.
pub trait BodyPose {
    /// Current world-space collider bounds.
    fn collider_bounds(&self) -> Bounds;

    /// Move the body by `delta` in world space.
    fn translate(&mut self, delta: Vec2);
}

/// Receives bounce notifications from [`crate::KinematicMotor::tick_with_observer`].
pub trait BounceObserver {
    fn on_bounce(&mut self, bounce: Bounce);
}

impl<F: FnMut(Bounce)> BounceObserver for F {
    fn on_bounce(&mut self, bounce: Bounce) {
        self(bounce)
    }
}

/// Primitive tests used by the collision layer.
pub trait NarrowphaseApi {
    /// Entry distance of a ray into an AABB. `None` on a miss or a box behind the origin.
    fn ray_aabb(origin: Vec2, dir: Vec2, aabb_min: Vec2, aabb_max: Vec2) -> Option<(f32, Vec2)>;
}
