//! Ray layout for an axis-aligned body: shrunk bounds, ray counts/spacing, corner origins.

use glam::Vec2;

use crate::error::MotorError;

/// Inward inset keeping ray origins strictly inside the body.
pub const SKIN_WIDTH: f32 = 0.015;
/// Target distance between neighbouring rays.
pub const DISTANCE_BETWEEN_RAYS: f32 = 0.1;
/// Per-side inset used once, when laying out the ray grid.
pub const RAY_GRID_INSET: f32 = SKIN_WIDTH * 1.5;
/// Per-side inset used every tick when refreshing corner origins.
pub const RAY_ORIGIN_INSET: f32 = SKIN_WIDTH;
/// Keeps the lowest/highest horizontal ray off the bottom/top edge.
pub const HORIZONTAL_RAY_VERTICAL_PADDING: f32 = 0.1;

/// World-space axis-aligned box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Bounds inset by `inset` on every side.
    pub fn shrink(&self, inset: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(inset),
            max: self.max - Vec2::splat(inset),
        }
    }

    /// Like [`Bounds::shrink`], but rejects a result with no interior.
    pub fn shrink_checked(&self, inset: f32) -> Result<Self, MotorError> {
        let shrunk = self.shrink(inset);
        let size = shrunk.size();
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(MotorError::DegenerateBounds {
                width: size.x,
                height: size.y,
                inset,
            });
        }
        Ok(shrunk)
    }
}

/// How many rays to cast along each edge and how far apart.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayGrid {
    /// Rays cast left/right, stacked along the height.
    pub horizontal_ray_count: usize,
    /// Rays cast up/down, spread along the width.
    pub vertical_ray_count: usize,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    /// Offset of the first horizontal ray above the bottom corner.
    pub vertical_padding: f32,
}

impl RayGrid {
    /// Lay out rays over `size` (width, height) at roughly `pitch` apart, no padding.
    pub fn compute(size: Vec2, pitch: f32) -> Result<Self, MotorError> {
        if !(pitch.is_finite() && pitch > 0.0) {
            return Err(MotorError::InvalidRayPitch(pitch));
        }
        let (horizontal_ray_count, horizontal_spacing) = axis_layout("vertical", size.y, pitch)?;
        let (vertical_ray_count, vertical_spacing) = axis_layout("horizontal", size.x, pitch)?;
        Ok(Self {
            horizontal_ray_count,
            vertical_ray_count,
            horizontal_spacing,
            vertical_spacing,
            vertical_padding: 0.0,
        })
    }

    /// Lay out rays over already-shrunk `bounds`, keeping horizontal rays off the corners.
    pub fn for_bounds(bounds: &Bounds, pitch: f32) -> Result<Self, MotorError> {
        let size = bounds.size();
        let padding = HORIZONTAL_RAY_VERTICAL_PADDING.min(size.y * 0.25);
        let usable = Vec2::new(size.x, size.y - padding * 2.0);
        let mut grid = Self::compute(usable, pitch)?;
        grid.vertical_padding = padding;
        Ok(grid)
    }
}

fn axis_layout(axis: &'static str, extent: f32, pitch: f32) -> Result<(usize, f32), MotorError> {
    if !(extent.is_finite() && extent > 0.0) {
        return Err(MotorError::InvalidExtent { axis, extent });
    }
    // Fewer than two rays would divide by zero below.
    let count = ((extent / pitch).round() as usize).max(2);
    let spacing = extent / (count - 1) as f32;
    Ok((count, spacing))
}

/// Corner points rays are cast from. Rebuilt from bounds every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayOrigins {
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
    pub top_left: Vec2,
    pub top_right: Vec2,
}

impl RayOrigins {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        Self {
            bottom_left: bounds.min,
            bottom_right: Vec2::new(bounds.max.x, bounds.min.y),
            top_left: Vec2::new(bounds.min.x, bounds.max.y),
            top_right: bounds.max,
        }
    }

    /// Origin of the `index`-th ray cast sideways from the left or right edge.
    pub fn horizontal(&self, from_left: bool, index: usize, grid: &RayGrid) -> Vec2 {
        let base = if from_left { self.bottom_left } else { self.bottom_right };
        base + Vec2::Y * (grid.vertical_padding + grid.horizontal_spacing * index as f32)
    }

    /// Origin of the `index`-th ray cast from the bottom or top edge, shifted by `extra_x`
    /// (the horizontal displacement already resolved this tick).
    pub fn vertical(&self, from_bottom: bool, index: usize, grid: &RayGrid, extra_x: f32) -> Vec2 {
        let base = if from_bottom { self.bottom_left } else { self.top_left };
        base + Vec2::X * (grid.vertical_spacing * index as f32 + extra_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_ray_grid_counts_and_spacing() {
        let g = RayGrid::compute(Vec2::new(1.0, 2.0), 0.1).unwrap();
        assert_eq!(g.horizontal_ray_count, 20);
        assert_eq!(g.vertical_ray_count, 10);
        assert!(approx(g.horizontal_spacing * (g.horizontal_ray_count - 1) as f32, 2.0));
        assert!(approx(g.vertical_spacing * (g.vertical_ray_count - 1) as f32, 1.0));
    }

    #[test]
    fn test_ray_grid_clamps_to_two_rays() {
        // round(0.04 / 0.1) == 0, round(0.12 / 0.1) == 1
        let g = RayGrid::compute(Vec2::new(0.04, 0.12), 0.1).unwrap();
        assert_eq!(g.vertical_ray_count, 2);
        assert_eq!(g.horizontal_ray_count, 2);
        assert!(approx(g.vertical_spacing, 0.04));
        assert!(approx(g.horizontal_spacing, 0.12));
        assert!(g.vertical_spacing.is_finite() && g.horizontal_spacing.is_finite());
    }

    #[test]
    fn test_ray_grid_rejects_degenerate_input() {
        assert_eq!(
            RayGrid::compute(Vec2::new(0.0, 1.0), 0.1),
            Err(MotorError::InvalidExtent { axis: "horizontal", extent: 0.0 })
        );
        assert!(matches!(RayGrid::compute(Vec2::ONE, 0.0), Err(MotorError::InvalidRayPitch(_))));
        assert!(RayGrid::compute(Vec2::new(1.0, f32::NAN), 0.1).is_err());
    }

    #[test]
    fn test_shrink_and_collapse() {
        let b = Bounds::from_center_half(Vec2::ZERO, Vec2::splat(0.5));
        let s = b.shrink_checked(SKIN_WIDTH).unwrap();
        assert!(approx(s.size().x, 1.0 - 2.0 * SKIN_WIDTH));
        let tiny = Bounds::from_center_half(Vec2::ZERO, Vec2::new(0.01, 1.0));
        assert!(matches!(
            tiny.shrink_checked(SKIN_WIDTH),
            Err(MotorError::DegenerateBounds { .. })
        ));
        assert!(RAY_GRID_INSET > RAY_ORIGIN_INSET);
    }

    #[test]
    fn test_corner_and_ray_origins() {
        let b = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 2.0));
        let o = RayOrigins::from_bounds(&b);
        assert_eq!(o.bottom_right, Vec2::new(1.0, 0.0));
        assert_eq!(o.top_left, Vec2::new(0.0, 2.0));

        let grid = RayGrid::for_bounds(&b, 0.1).unwrap();
        assert!(approx(grid.vertical_padding, HORIZONTAL_RAY_VERTICAL_PADDING));
        let last = o.horizontal(false, grid.horizontal_ray_count - 1, &grid);
        assert!(approx(last.x, 1.0));
        assert!(approx(last.y, 2.0 - HORIZONTAL_RAY_VERTICAL_PADDING));
        let first = o.horizontal(true, 0, &grid);
        assert!(approx(first.y, HORIZONTAL_RAY_VERTICAL_PADDING));

        let v = o.vertical(false, 2, &grid, 0.25);
        assert!(approx(v.x, grid.vertical_spacing * 2.0 + 0.25));
        assert!(approx(v.y, 2.0));
    }

    #[test]
    fn test_padding_capped_for_short_bodies() {
        let b = Bounds::new(Vec2::ZERO, Vec2::new(1.0, 0.2));
        let grid = RayGrid::for_bounds(&b, 0.1).unwrap();
        assert!(approx(grid.vertical_padding, 0.05));
        assert_eq!(grid.horizontal_ray_count, 2);
    }
}
