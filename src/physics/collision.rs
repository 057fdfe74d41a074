//! Swept AABB collision against the voxel grid.
//!
//! Motion is resolved one axis at a time, X then Y then Z. Each sweep
//! advances the box by at most the requested displacement, stopping flush
//! against the first solid block face in its path; a blocked axis zeroes
//! that velocity component so the remaining axes can still slide. Resolving
//! axes sequentially means a box aimed exactly at a block corner clears it
//! instead of snagging: after the X sweep moves the box, the Z sweep sees
//! the already-moved footprint.

use cgmath::Vector3;

use crate::voxels::world::World;

use super::aabb::Aabb;

/// Tolerance when an edge sits exactly on a block boundary.
const EDGE_EPSILON: f32 = 1e-5;
/// Below this residual the sweep is considered unobstructed.
const CONTACT_EPSILON: f32 = 1e-7;

/// Outcome of one collision resolution step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// The box after movement, flush against any surfaces it hit.
    pub aabb: Aabb,
    /// The velocity with blocked components zeroed.
    pub velocity: Vector3<f32>,
    /// True when downward motion was stopped by a floor.
    pub grounded: bool,
    /// True when upward motion was stopped by a ceiling.
    pub head_blocked: bool,
}

/// Moves a box by `velocity * dt` through the world, resolving collisions
/// axis by axis.
///
/// Solid blocks stop the box exactly at their face; unloaded chunks contain
/// no solid blocks and are passed through freely.
pub fn resolve_collision(
    world: &World,
    aabb: &Aabb,
    velocity: Vector3<f32>,
    dt: f32,
) -> CollisionResult {
    let mut current = *aabb;
    let mut velocity = velocity;
    let mut grounded = false;
    let mut head_blocked = false;

    for axis in 0..3 {
        let delta = velocity[axis] * dt;
        let moved = sweep_axis(world, &current, axis, delta);

        let mut shift = Vector3::new(0.0, 0.0, 0.0);
        shift[axis] = moved;
        current = current.translated(shift);

        if (moved - delta).abs() > CONTACT_EPSILON {
            if axis == 1 {
                if delta < 0.0 {
                    grounded = true;
                } else {
                    head_blocked = true;
                }
            }
            velocity[axis] = 0.0;
        }
    }

    CollisionResult {
        aabb: current,
        velocity,
        grounded,
        head_blocked,
    }
}

/// Largest movement along one axis before the box's leading face meets a
/// solid block face. Returns `delta` unchanged when the path is clear.
fn sweep_axis(world: &World, aabb: &Aabb, axis: usize, delta: f32) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }

    let min = [aabb.min.x, aabb.min.y, aabb.min.z];
    let max = [aabb.max.x, aabb.max.y, aabb.max.z];
    let (p, q) = ((axis + 1) % 3, (axis + 2) % 3);
    let p_range = (min[p].floor() as i32)..=((max[p] - EDGE_EPSILON).floor() as i32);
    let q_range = (min[q].floor() as i32)..=((max[q] - EDGE_EPSILON).floor() as i32);

    let mut allowed = delta;
    if delta > 0.0 {
        let leading = max[axis];
        let first = (leading - EDGE_EPSILON).floor() as i32 + 1;
        let last = (leading + delta).floor() as i32;
        for b in first..=last {
            let face = b as f32;
            if face - leading > allowed {
                break;
            }
            if slab_solid(world, axis, b, p, &p_range, q, &q_range) {
                allowed = face - leading;
                break;
            }
        }
    } else {
        let leading = min[axis];
        let first = (leading + EDGE_EPSILON).floor() as i32 - 1;
        let last = (leading + delta).floor() as i32;
        for b in (last..=first).rev() {
            let face = (b + 1) as f32;
            if face - leading < allowed {
                break;
            }
            if slab_solid(world, axis, b, p, &p_range, q, &q_range) {
                allowed = face - leading;
                break;
            }
        }
    }
    allowed
}

/// Whether any block is solid in the one-block-thick slab at `b` along the
/// sweep axis, over the box's footprint on the two perpendicular axes.
fn slab_solid(
    world: &World,
    axis: usize,
    b: i32,
    p: usize,
    p_range: &std::ops::RangeInclusive<i32>,
    q: usize,
    q_range: &std::ops::RangeInclusive<i32>,
) -> bool {
    for pv in p_range.clone() {
        for qv in q_range.clone() {
            let mut pos = [0i32; 3];
            pos[axis] = b;
            pos[p] = pv;
            pos[q] = qv;
            if world.is_solid_at(pos[0], pos[1], pos[2]) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::voxels::block::BlockType;
    use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION};
    use cgmath::{Point2, Point3};

    fn world_with(blocks: &[(i32, i32, i32)]) -> World {
        let mut world = World::new(&WorldConfig::default());
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        for &(x, y, z) in blocks {
            chunk.set_block(x, y, z, BlockType::STONE.id()).unwrap();
        }
        world.install_chunk(chunk, Vec::new());
        world
    }

    fn floor_world(y: i32) -> World {
        let mut blocks = Vec::new();
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                blocks.push((x, y, z));
            }
        }
        world_with(&blocks)
    }

    #[test]
    fn falling_box_snaps_to_the_floor() {
        let world = floor_world(10);
        let aabb = Aabb::player(Point3::new(8.0, 11.5, 8.0));
        let result = resolve_collision(&world, &aabb, Vector3::new(0.0, -5.0, 0.0), 1.0);

        assert!((result.aabb.min.y - 11.0).abs() < 1e-6, "flush on the floor");
        assert!(result.grounded);
        assert!(!result.head_blocked);
        assert_eq!(result.velocity.y, 0.0);
    }

    #[test]
    fn resting_box_stays_grounded() {
        let world = floor_world(10);
        let aabb = Aabb::player(Point3::new(8.0, 11.0, 8.0));
        let result = resolve_collision(&world, &aabb, Vector3::new(0.0, -10.0, 0.0), 0.1);

        assert_eq!(result.aabb.min.y, 11.0);
        assert!(result.grounded);
    }

    #[test]
    fn rising_box_reports_head_blocked() {
        let world = world_with(&[(8, 13, 8)]);
        let aabb = Aabb::player(Point3::new(8.0, 11.0, 8.0));
        let result = resolve_collision(&world, &aabb, Vector3::new(0.0, 5.0, 0.0), 0.1);

        assert!((result.aabb.max.y - 13.0).abs() < 1e-6);
        assert!(result.head_blocked);
        assert!(!result.grounded);
        assert_eq!(result.velocity.y, 0.0);
    }

    #[test]
    fn blocked_axis_slides_along_the_wall() {
        // Wall filling the x = 3 slab next to the mover.
        let mut blocks = Vec::new();
        for z in 0..CHUNK_DIMENSION {
            for y in 9..14 {
                blocks.push((3, y, z));
            }
        }
        let world = world_with(&blocks);

        let aabb = Aabb::player(Point3::new(2.5, 10.0, 8.0));
        let result = resolve_collision(&world, &aabb, Vector3::new(4.0, 0.0, 4.0), 0.1);

        assert!((result.aabb.max.x - 3.0).abs() < 1e-6, "stopped at the wall");
        assert_eq!(result.velocity.x, 0.0);
        assert!((result.velocity.z - 4.0).abs() < 1e-6, "z keeps sliding");
        assert!((result.aabb.min.z - (8.0 - 0.3 + 0.4)).abs() < 1e-5);
    }

    #[test]
    fn diagonal_motion_clears_an_exact_corner() {
        let world = world_with(&[(2, 10, 2)]);
        let aabb = Aabb::new(Point3::new(1.2, 10.0, 1.2), Point3::new(1.8, 11.8, 1.8));
        let result = resolve_collision(&world, &aabb, Vector3::new(1.8, 0.0, 1.8), 0.1);

        // Each axis moves its full 0.18: by the time the z sweep runs, the
        // x sweep has already carried the footprint past the corner column.
        assert!((result.aabb.max.x - 1.98).abs() < 1e-6);
        assert!((result.aabb.max.z - 1.98).abs() < 1e-6);
        assert_eq!(result.velocity, Vector3::new(1.8, 0.0, 1.8));
    }

    #[test]
    fn unloaded_terrain_is_not_solid() {
        let world = World::new(&WorldConfig::default());
        let aabb = Aabb::player(Point3::new(8.0, 50.0, 8.0));
        let result = resolve_collision(&world, &aabb, Vector3::new(0.0, -10.0, 0.0), 0.1);

        assert!((result.aabb.min.y - 49.0).abs() < 1e-6);
        assert!(!result.grounded);
    }
}
