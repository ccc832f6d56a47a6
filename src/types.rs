use glam::Vec2;
use serde::{Deserialize, Serialize};

/// User-defined opaque key carried through query results (e.g., pack your entity id).
pub type ColKey = u64;

/// Bitmask-based filtering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMask {
    /// Layer(s) this collider belongs to.
    pub layer: u32,
    /// Layers this collider (or query) wants to collide with.
    pub collides_with: u32,
    /// Extra mask to exclude (applied after `collides_with`).
    pub exclude: u32,
}

impl LayerMask {
    /// Everything, in both directions.
    pub const ALL: LayerMask = LayerMask {
        layer: u32::MAX,
        collides_with: u32::MAX,
        exclude: 0,
    };

    /// Convenience constructor.
    pub fn simple(layer: u32, collides_with: u32) -> Self {
        Self {
            layer,
            collides_with,
            exclude: 0,
        }
    }

    /// A query filter that belongs to no layer and hits `collides_with`.
    pub fn query(collides_with: u32) -> Self {
        Self {
            layer: 0,
            collides_with,
            exclude: 0,
        }
    }

    /// A may hit B iff `(A.collides_with & B.layer) != 0` AND `(A.exclude & B.layer) == 0`.
    pub fn allows(self, other: LayerMask) -> bool {
        let hit = (self.collides_with & other.layer) != 0;
        let blocked = (self.exclude & other.layer) != 0;
        hit && !blocked
    }
}

/// Stable handle for a collider inserted into a [`crate::CollisionLayer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderId(pub u32);

/// Nearest hit returned by a ray query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the (unit) ray direction.
    pub distance: f32,
    /// Surface normal at the hit (zero when the ray starts inside the collider).
    pub normal: Vec2,
    /// Collider that was hit.
    pub surface: ColliderId,
    /// Optional user key of the hit collider.
    pub key: Option<ColKey>,
}

/// Contact axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One velocity reflection produced during a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounce {
    pub axis: Axis,
    /// Velocity component along `axis` before the contact.
    pub incoming: f32,
    /// Velocity component along `axis` after reflection (`-incoming * restitution`).
    pub outgoing: f32,
}

impl Bounce {
    /// Impact speed along the contact normal.
    pub fn magnitude(&self) -> f32 {
        self.incoming.abs()
    }
}

/// Contact flags for the most recent movement resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollisionState {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
    /// Horizontal sign (±1) the body last moved toward.
    pub face_direction: i8,
    /// Collider the body stands on, set only when `below`.
    pub platform: Option<ColliderId>,
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            above: false,
            below: false,
            left: false,
            right: false,
            face_direction: 1,
            platform: None,
        }
    }
}

impl CollisionState {
    /// Fresh flags for a new resolution, carrying only the face direction over.
    pub fn reset_from(previous: &CollisionState) -> Self {
        Self {
            face_direction: previous.face_direction,
            ..Self::default()
        }
    }

    pub fn grounded(&self) -> bool {
        self.below
    }

    pub fn touching_wall(&self) -> bool {
        self.left || self.right
    }
}

/// Outcome of one `tick`: what moved and what bounced.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Displacement actually applied to the body.
    pub displacement: Vec2,
    pub horizontal: Option<Bounce>,
    pub vertical: Option<Bounce>,
}

impl TickReport {
    /// Bounces in the order they were resolved (horizontal first).
    pub fn bounces(&self) -> impl Iterator<Item = Bounce> + '_ {
        self.horizontal.iter().chain(self.vertical.iter()).copied()
    }

    pub fn bounced(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }
}

/// Per-body physics configuration, immutable for the motor's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Floor on `velocity.y` (negative is down).
    pub max_fall_speed: f32,
    /// Fraction of incoming speed kept on a bounce, in `[0, 1]`.
    pub restitution: f32,
    /// Horizontal speed lost per second while not touching a wall.
    pub deceleration: f32,
    /// Layers the body's rays collide with.
    pub collision_mask: LayerMask,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            max_fall_speed: -30.0,
            restitution: 0.5,
            deceleration: 0.0,
            collision_mask: LayerMask::query(u32::MAX),
        }
    }
}

/// Collision layer configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Grid cell size in world units.
    pub cell_size: f32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self { cell_size: 1.0 }
    }
}

impl PhysicsParams {
    /// Reject values that would make the motor diverge or behave nonsensically.
    pub fn validate(&self) -> Result<(), crate::MotorError> {
        let bad =
            |name: &'static str, value: f32| crate::MotorError::InvalidParameter { name, value };
        for (name, value) in [
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("restitution", self.restitution),
            ("deceleration", self.deceleration),
        ] {
            if !value.is_finite() {
                return Err(bad(name, value));
            }
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(bad("restitution", self.restitution));
        }
        if self.max_fall_speed > 0.0 {
            return Err(bad("max_fall_speed", self.max_fall_speed));
        }
        if self.deceleration < 0.0 {
            return Err(bad("deceleration", self.deceleration));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_filtering() {
        let ground = LayerMask::simple(0b01, 0);
        let pickup = LayerMask::simple(0b10, 0);
        let q = LayerMask::query(0b01);
        assert!(q.allows(ground));
        assert!(!q.allows(pickup));
        let excluded = LayerMask { exclude: 0b01, ..LayerMask::query(0b11) };
        assert!(!excluded.allows(ground));
        assert!(excluded.allows(pickup));
    }

    #[test]
    fn test_params_defaults_and_validation() {
        let p = PhysicsParams::default();
        assert_eq!(p.gravity, -20.0);
        assert_eq!(p.max_fall_speed, -30.0);
        assert!(p.validate().is_ok());

        let bad = PhysicsParams { restitution: 1.5, ..p };
        assert_eq!(
            bad.validate(),
            Err(crate::MotorError::InvalidParameter { name: "restitution", value: 1.5 })
        );
        assert!(PhysicsParams { max_fall_speed: 5.0, ..p }.validate().is_err());
        assert!(PhysicsParams { deceleration: -1.0, ..p }.validate().is_err());
        assert!(PhysicsParams { gravity: f32::NAN, ..p }.validate().is_err());
    }

    #[test]
    fn test_params_from_partial_json() {
        let json = r#"{ "restitution": 0.25, "deceleration": 3.0 }"#;
        let p: PhysicsParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.restitution, 0.25);
        assert_eq!(p.deceleration, 3.0);
        assert_eq!(p.gravity, -20.0);
        let back = serde_json::to_string(&p).unwrap();
        let again: PhysicsParams = serde_json::from_str(&back).unwrap();
        assert_eq!(again, p);
    }

    #[test]
    fn test_collision_state_reset_keeps_face() {
        let prev = CollisionState {
            below: true,
            left: true,
            face_direction: -1,
            platform: Some(ColliderId(3)),
            ..Default::default()
        };
        let fresh = CollisionState::reset_from(&prev);
        assert_eq!(fresh.face_direction, -1);
        assert!(!fresh.below && !fresh.left && fresh.platform.is_none());
    }
}
