//! Raycast kinematic motor: gravity, deceleration, ray-resolved movement and bounces for one body.

use glam::Vec2;
use tracing::{debug, trace, warn};

use crate::api::{BodyPose, BounceObserver, RayQuery};
use crate::error::MotorError;
use crate::geometry::*;
use crate::types::*;

/// Contact speed above which a velocity component is reflected instead of zeroed.
pub const MIN_BOUNCE_VELOCITY: f32 = 0.9;

/// Drives one axis-aligned body through a static collision layer.
///
/// The motor owns the body pose (`B`) and its own velocity/contact state. The ray query is
/// borrowed per tick, so many motors can share one read-only layer.
pub struct KinematicMotor<B> {
    body: B,
    params: PhysicsParams,
    grid: RayGrid,
    origins: RayOrigins,
    velocity: Vec2,
    active: bool,
    collisions: CollisionState,
}

impl<B: BodyPose> KinematicMotor<B> {
    /// Build a motor for `body`. Starts inactive and at rest.
    pub fn new(body: B, params: PhysicsParams) -> Result<Self, MotorError> {
        params.validate()?;
        let grid = layout_rays(&body)?;
        let shrunk = body.collider_bounds().shrink_checked(RAY_ORIGIN_INSET)?;
        let origins = RayOrigins::from_bounds(&shrunk);
        debug!(
            horizontal_rays = grid.horizontal_ray_count,
            vertical_rays = grid.vertical_ray_count,
            "motor created"
        );
        Ok(Self {
            body,
            params,
            grid,
            origins,
            velocity: Vec2::ZERO,
            active: false,
            collisions: CollisionState::default(),
        })
    }

    /// Enable or pause ticking. Velocity is kept while paused.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Resume simulation with a fresh velocity, e.g. when a carried body is released.
    pub fn launch(&mut self, velocity: Vec2) {
        self.set_active(true);
        self.set_velocity(velocity);
    }

    /// Contact flags from the most recent movement resolution.
    pub fn collisions(&self) -> CollisionState {
        self.collisions
    }

    pub fn face_direction(&self) -> i8 {
        self.collisions.face_direction
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn ray_grid(&self) -> &RayGrid {
        &self.grid
    }

    /// Corner origins used by the last resolution.
    pub fn ray_origins(&self) -> &RayOrigins {
        &self.origins
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    /// Mutable access to the pose. Call [`Self::rebuild_ray_grid`] after resizing it.
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn into_body(self) -> B {
        self.body
    }

    /// Recompute ray counts and spacing from the body's current size.
    pub fn rebuild_ray_grid(&mut self) -> Result<(), MotorError> {
        self.grid = layout_rays(&self.body)?;
        Ok(())
    }

    /// Advance by `dt` seconds against `query`.
    pub fn tick(&mut self, dt: f32, query: &impl RayQuery) -> TickReport {
        self.tick_with_observer(dt, query, &mut |_: Bounce| {})
    }

    /// Like [`Self::tick`], also handing every bounce to `observer` once the body has moved.
    pub fn tick_with_observer<O: BounceObserver + ?Sized>(
        &mut self,
        dt: f32,
        query: &impl RayQuery,
        observer: &mut O,
    ) -> TickReport {
        if !self.active {
            return TickReport::default();
        }
        self.apply_gravity(dt);
        self.apply_horizontal_deceleration(dt);
        let report = self.apply_movement(dt, query);
        self.snap_vertical(&report);
        for bounce in report.bounces() {
            observer.on_bounce(bounce);
        }
        report
    }

    fn apply_gravity(&mut self, dt: f32) {
        self.velocity.y += self.params.gravity * dt;
        if self.velocity.y < self.params.max_fall_speed {
            self.velocity.y = self.params.max_fall_speed;
        }
    }

    fn apply_horizontal_deceleration(&mut self, dt: f32) {
        // Wall contact from the previous tick owns velocity.x
        if self.collisions.touching_wall() || self.velocity.x == 0.0 {
            return;
        }
        let decel = self.params.deceleration * dt;
        if self.velocity.x.abs() <= decel {
            self.velocity.x = 0.0;
        } else {
            self.velocity.x -= self.velocity.x.signum() * decel;
        }
    }

    fn apply_movement(&mut self, dt: f32, query: &impl RayQuery) -> TickReport {
        let mut d = self.velocity * dt;
        if d == Vec2::ZERO {
            return TickReport::default();
        }
        let shrunk = self.body.collider_bounds().shrink(RAY_ORIGIN_INSET);
        self.origins = RayOrigins::from_bounds(&shrunk);

        let mut state = CollisionState::reset_from(&self.collisions);
        if d.x != 0.0 {
            state.face_direction = if d.x > 0.0 { 1 } else { -1 };
        }

        let mut report = TickReport {
            horizontal: self.resolve_horizontal(&mut d, dt, &mut state, query),
            ..TickReport::default()
        };
        if d.y != 0.0 {
            report.vertical = self.resolve_vertical(&mut d, &mut state, query);
        }

        // Residual creep toward a floor we already stand on
        if state.below && d.y.abs() < MIN_BOUNCE_VELOCITY * dt {
            d.y = 0.0;
        }

        self.body.translate(d);
        self.collisions = state;
        report.displacement = d;
        report
    }

    fn snap_vertical(&mut self, report: &TickReport) {
        if self.collisions.below && report.vertical.is_none() {
            self.velocity.y = 0.0;
        }
    }

    fn resolve_horizontal(
        &mut self,
        d: &mut Vec2,
        dt: f32,
        state: &mut CollisionState,
        query: &impl RayQuery,
    ) -> Option<Bounce> {
        let ray_length = contact_ray_length(d.x);

        if d.x == 0.0 {
            // Not moving sideways: report resting wall contact on either side, move nothing.
            for dir in [-1i8, 1] {
                if self.first_horizontal_hit(dir, ray_length, query).is_some() {
                    if dir < 0 {
                        state.left = true;
                    } else {
                        state.right = true;
                    }
                }
            }
            return None;
        }

        let dir = state.face_direction;
        let hit = self.first_horizontal_hit(dir, ray_length, query)?;
        d.x = (hit.distance - SKIN_WIDTH) * dir as f32;
        state.left = dir < 0;
        state.right = dir > 0;

        let incoming = self.velocity.x;
        if incoming.abs() > MIN_BOUNCE_VELOCITY {
            let outgoing = -incoming * self.params.restitution;
            self.velocity.x = outgoing;
            d.x = outgoing * dt;
            debug!(incoming, outgoing, surface = hit.surface.0, "horizontal bounce");
            Some(Bounce {
                axis: Axis::Horizontal,
                incoming,
                outgoing,
            })
        } else {
            self.velocity.x = 0.0;
            None
        }
    }

    fn first_horizontal_hit(
        &self,
        dir: i8,
        ray_length: f32,
        query: &impl RayQuery,
    ) -> Option<RayHit> {
        let ray_dir = Vec2::X * dir as f32;
        (0..self.grid.horizontal_ray_count).find_map(|i| {
            let origin = self.origins.horizontal(dir < 0, i, &self.grid);
            cast_checked(query, origin, ray_dir, ray_length, self.params.collision_mask)
        })
    }

    fn resolve_vertical(
        &mut self,
        d: &mut Vec2,
        state: &mut CollisionState,
        query: &impl RayQuery,
    ) -> Option<Bounce> {
        let dir = d.y.signum();
        let from_bottom = dir < 0.0;
        let ray_dir = Vec2::Y * dir;
        let mut ray_length = contact_ray_length(d.y);

        // Every ray runs; a hit shortens the rest so the closest surface wins.
        for i in 0..self.grid.vertical_ray_count {
            let origin = self.origins.vertical(from_bottom, i, &self.grid, d.x);
            let mask = self.params.collision_mask;
            let Some(hit) = cast_checked(query, origin, ray_dir, ray_length, mask) else {
                continue;
            };
            d.y = (hit.distance - SKIN_WIDTH) * dir;
            ray_length = hit.distance;
            if from_bottom {
                state.below = true;
                state.platform = Some(hit.surface);
            } else {
                state.above = true;
            }
        }

        if !(state.below || state.above) {
            return None;
        }
        let incoming = self.velocity.y;
        if incoming.abs() > MIN_BOUNCE_VELOCITY {
            let outgoing = -incoming * self.params.restitution;
            self.velocity.y = outgoing;
            debug!(incoming, outgoing, grounded = state.below, "vertical bounce");
            Some(Bounce {
                axis: Axis::Vertical,
                incoming,
                outgoing,
            })
        } else {
            if state.above {
                self.velocity.y = 0.0;
            }
            None
        }
    }
}

fn layout_rays<B: BodyPose>(body: &B) -> Result<RayGrid, MotorError> {
    let bounds = body.collider_bounds().shrink_checked(RAY_GRID_INSET)?;
    RayGrid::for_bounds(&bounds, DISTANCE_BETWEEN_RAYS)
}

/// Ray reach for a displacement component; never shorter than two skins so resting contact
/// is still seen with no motion.
fn contact_ray_length(delta: f32) -> f32 {
    delta.abs().max(SKIN_WIDTH) + SKIN_WIDTH
}

fn cast_checked(
    query: &impl RayQuery,
    origin: Vec2,
    dir: Vec2,
    max_distance: f32,
    mask: LayerMask,
) -> Option<RayHit> {
    let hit = query.cast(origin, dir, max_distance, mask)?;
    if !(hit.distance.is_finite() && hit.distance >= 0.0 && hit.distance <= max_distance) {
        warn!(
            distance = hit.distance,
            max_distance, "ray query returned an out-of-range hit; ignoring"
        );
        return None;
    }
    trace!(x = origin.x, y = origin.y, distance = hit.distance, "ray hit");
    Some(hit)
}
