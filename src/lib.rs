//! nobonk-motor: raycast kinematic motor for axis-aligned 2D bodies over a static collision layer

pub mod types;
pub mod api;
pub mod error;
pub mod geometry;
pub mod narrowphase;
pub mod layer;
pub mod body;
pub mod motor;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::MotorError;
pub use crate::geometry::{Bounds, RayGrid, RayOrigins, SKIN_WIDTH};
pub use crate::layer::CollisionLayer;
pub use crate::body::BoxBody;
pub use crate::motor::{KinematicMotor, MIN_BOUNCE_VELOCITY};
