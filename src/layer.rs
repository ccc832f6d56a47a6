use glam::Vec2;

use std::collections::{HashMap, HashSet};

use crate::api::{NarrowphaseApi, RayQuery};
use crate::geometry::Bounds;
use crate::narrowphase::Narrowphase;
use crate::types::*;

/// Static collision layer: axis-aligned boxes binned into a uniform grid.
///
/// Colliders are inserted up front and the layer is then only read while motors tick.
pub struct CollisionLayer {
    pub cfg: LayerConfig,

    entries: Vec<Entry>,

    // Uniform grid: cell coord -> list of indices into `entries`
    grid: HashMap<(i32, i32), Vec<usize>>,
}

struct Entry {
    bounds: Bounds,
    mask: LayerMask,
    user_key: Option<ColKey>,
}

impl CollisionLayer {
    pub fn new(cfg: LayerConfig) -> Self {
        Self {
            cfg,
            entries: Vec::new(),
            grid: HashMap::new(),
        }
    }

    /// Insert a box given as center + half extents.
    pub fn insert_aabb(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        mask: LayerMask,
        user_key: Option<ColKey>,
    ) -> ColliderId {
        self.insert_bounds(Bounds::from_center_half(center, half_extents), mask, user_key)
    }

    /// Insert a box given as world-space bounds.
    pub fn insert_bounds(
        &mut self,
        bounds: Bounds,
        mask: LayerMask,
        user_key: Option<ColKey>,
    ) -> ColliderId {
        let idx = self.entries.len();
        self.entries.push(Entry { bounds, mask, user_key });
        self.insert_into_grid(idx, bounds.min, bounds.max);
        ColliderId(idx as u32)
    }

    /// Raycast against the layer. Returns the closest hit within `max_t`.
    pub fn raycast(&self, origin: Vec2, dir: Vec2, mask: LayerMask, max_t: f32) -> Option<RayHit> {
        if dir.length_squared() == 0.0 || !(max_t >= 0.0) {
            return None;
        }
        let cs = self.cell_size();
        // Setup DDA
        let mut best: Option<(usize, f32, Vec2)> = None;
        let mut tested: HashSet<usize> = HashSet::new();

        let mut cell = world_to_cell(origin, cs);
        let step_x = if dir.x > 0.0 { 1 } else if dir.x < 0.0 { -1 } else { 0 };
        let step_y = if dir.y > 0.0 { 1 } else if dir.y < 0.0 { -1 } else { 0 };
        let next_boundary = |c: i32, step: i32| -> f32 {
            if step > 0 { (c as f32 + 1.0) * cs } else { c as f32 * cs }
        };
        let mut t_max_x = if step_x != 0 {
            (next_boundary(cell.0, step_x) - origin.x) / dir.x
        } else {
            f32::INFINITY
        };
        let mut t_max_y = if step_y != 0 {
            (next_boundary(cell.1, step_y) - origin.y) / dir.y
        } else {
            f32::INFINITY
        };
        let t_delta_x = if step_x != 0 { cs / dir.x.abs() } else { f32::INFINITY };
        let t_delta_y = if step_y != 0 { cs / dir.y.abs() } else { f32::INFINITY };

        let mut t_curr = 0.0f32;
        // Visit cells until exceeding max_t
        for _ in 0..10_000 {
            // safety cap
            if t_curr > max_t {
                break;
            }
            // Nothing in a later cell can beat a hit already closer than this cell's entry
            if best.is_some_and(|(_, bt, _)| bt <= t_curr) {
                break;
            }
            if let Some(list) = self.grid.get(&cell) {
                for &idx in list {
                    if !tested.insert(idx) {
                        continue;
                    }
                    let e = &self.entries[idx];
                    if !mask.allows(e.mask) {
                        continue;
                    }
                    let Some((t, normal)) =
                        Narrowphase::ray_aabb(origin, dir, e.bounds.min, e.bounds.max)
                    else {
                        continue;
                    };
                    if t > max_t {
                        continue;
                    }
                    match best {
                        Some((_, bt, _)) if t >= bt => {}
                        _ => best = Some((idx, t, normal)),
                    }
                }
            }

            // Step to next cell
            if t_max_x < t_max_y {
                cell.0 += step_x;
                t_curr = t_max_x;
                t_max_x += t_delta_x;
            } else {
                cell.1 += step_y;
                t_curr = t_max_y;
                t_max_y += t_delta_y;
            }
        }

        best.map(|(idx, distance, normal)| RayHit {
            distance,
            normal,
            surface: ColliderId(idx as u32),
            key: self.entries[idx].user_key,
        })
    }

    fn cell_size(&self) -> f32 {
        self.cfg.cell_size.max(1e-5)
    }

    fn insert_into_grid(&mut self, idx: usize, min: Vec2, max: Vec2) {
        let cs = self.cell_size();
        let (ix0, iy0) = world_to_cell(min, cs);
        let (ix1, iy1) = world_to_cell(max, cs);
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                self.grid.entry((ix, iy)).or_default().push(idx);
            }
        }
    }
}

impl RayQuery for CollisionLayer {
    fn cast(&self, origin: Vec2, dir: Vec2, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        self.raycast(origin, dir, mask, max_distance)
    }
}

fn world_to_cell(p: Vec2, cs: f32) -> (i32, i32) {
    ((p.x / cs).floor() as i32, (p.y / cs).floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> CollisionLayer {
        CollisionLayer::new(LayerConfig { cell_size: 1.0 })
    }

    #[test]
    fn test_insert_grid_coverage() {
        let mut w = layer();
        // AABB covering from (-0.5,-0.5) to (0.5,0.5)
        w.insert_aabb(Vec2::ZERO, Vec2::splat(0.5), LayerMask::simple(1, 0), None);
        // With floor indexing, bounds straddling origin cover 4 cells
        assert_eq!(w.grid.len(), 4);
        for k in [(-1, -1), (-1, 0), (0, -1), (0, 0)] {
            assert!(w.grid.contains_key(&k));
            assert_eq!(w.grid[&k].len(), 1);
        }
    }

    #[test]
    fn test_raycast_hits_closest() {
        let mut w = layer();
        let mask = LayerMask::simple(1, 1);
        let id_a = w.insert_aabb(Vec2::new(2.0, 0.0), Vec2::splat(0.5), mask, Some(1));
        w.insert_aabb(Vec2::new(4.0, 0.0), Vec2::splat(0.5), mask, Some(2));
        let hit = w.raycast(Vec2::ZERO, Vec2::X, mask, 10.0).unwrap();
        assert_eq!(hit.surface, id_a);
        assert_eq!(hit.key, Some(1));
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
        assert!(w.raycast(Vec2::ZERO, -Vec2::X, mask, 10.0).is_none());
    }

    #[test]
    fn test_raycast_respects_range_and_mask() {
        let mut w = layer();
        let floor = Bounds::new(Vec2::new(-3.0, -1.5), Vec2::new(3.0, -0.5));
        w.insert_bounds(floor, LayerMask::simple(0b01, 0), None);
        let down = -Vec2::Y;
        // Floor top at y = -0.5
        assert!(w.raycast(Vec2::ZERO, down, LayerMask::query(0b01), 0.4).is_none());
        assert!(w.raycast(Vec2::ZERO, down, LayerMask::query(0b01), 0.5).is_some());
        assert!(w.raycast(Vec2::ZERO, down, LayerMask::query(0b10), 5.0).is_none());
    }

    #[test]
    fn test_raycast_large_box_spanning_many_cells() {
        let mut w = CollisionLayer::new(LayerConfig { cell_size: 0.25 });
        let wall = w.insert_aabb(Vec2::new(5.0, 0.0), Vec2::new(0.5, 4.0), LayerMask::ALL, None);
        let hit = w.raycast(Vec2::new(0.0, 1.3), Vec2::X, LayerMask::ALL, 6.0).unwrap();
        assert_eq!(hit.surface, wall);
        assert!((hit.distance - 4.5).abs() < 1e-4);
    }
}
