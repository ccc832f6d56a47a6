use thiserror::Error;

/// Construction-time contract violations. Nothing in `tick` itself fails.
#[derive(Debug, Error, PartialEq)]
pub enum MotorError {
    #[error("bounds collapse to {width}x{height} after a {inset} inset")]
    DegenerateBounds { width: f32, height: f32, inset: f32 },
    #[error("ray pitch {0} must be finite and positive")]
    InvalidRayPitch(f32),
    #[error("{axis} extent {extent} cannot be covered by rays")]
    InvalidExtent { axis: &'static str, extent: f32 },
    #[error("physics parameter `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}
