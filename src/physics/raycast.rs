//! Block raycasting.
//!
//! Grid traversal by the Amanatides–Woo method: the ray visits every block
//! its line passes through, in order, stepping one axis per iteration. At a
//! tied boundary crossing the X axis is stepped before Y, and Y before Z,
//! so corner-grazing rays resolve deterministically.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::voxels::world::World;

/// Default reach used for block picking, in blocks.
pub const MAX_RAYCAST_DISTANCE: f32 = 5.0;

/// A solid block hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Integer coordinate of the solid block.
    pub block: Point3<i32>,
    /// Unit normal of the face the ray entered through. Zero when the ray
    /// started inside the block.
    pub normal: Vector3<i32>,
    /// Distance travelled along the ray, in world units.
    pub distance: f32,
}

/// Casts a ray and returns the first solid block within `max_distance`.
///
/// `direction` need not be normalized; a zero direction yields no hit.
/// Unloaded chunks contain nothing solid and are traversed freely.
pub fn raycast(
    world: &World,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RaycastHit> {
    let length = direction.magnitude();
    if length <= f32::EPSILON {
        return None;
    }
    let dir = direction / length;

    let mut block = Point3::new(
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    );
    if world.is_solid_at(block.x, block.y, block.z) {
        return Some(RaycastHit {
            block,
            normal: Vector3::new(0, 0, 0),
            distance: 0.0,
        });
    }

    let step = Vector3::new(sign(dir.x), sign(dir.y), sign(dir.z));
    let t_delta = Vector3::new(axis_t_delta(dir.x), axis_t_delta(dir.y), axis_t_delta(dir.z));
    let mut t_max = Vector3::new(
        axis_t_max(origin.x, dir.x, block.x),
        axis_t_max(origin.y, dir.y, block.y),
        axis_t_max(origin.z, dir.z, block.z),
    );

    loop {
        // Step the axis whose boundary is nearest; ties go X, then Y.
        let (t, normal) = if t_max.x <= t_max.y && t_max.x <= t_max.z {
            let t = t_max.x;
            block.x += step.x;
            t_max.x += t_delta.x;
            (t, Vector3::new(-step.x, 0, 0))
        } else if t_max.y <= t_max.z {
            let t = t_max.y;
            block.y += step.y;
            t_max.y += t_delta.y;
            (t, Vector3::new(0, -step.y, 0))
        } else {
            let t = t_max.z;
            block.z += step.z;
            t_max.z += t_delta.z;
            (t, Vector3::new(0, 0, -step.z))
        };

        if t > max_distance {
            return None;
        }
        if world.is_solid_at(block.x, block.y, block.z) {
            return Some(RaycastHit {
                block,
                normal,
                distance: t,
            });
        }
    }
}

fn sign(component: f32) -> i32 {
    if component > 0.0 {
        1
    } else if component < 0.0 {
        -1
    } else {
        0
    }
}

/// Ray-parameter cost of crossing one whole block on an axis.
fn axis_t_delta(component: f32) -> f32 {
    if component == 0.0 {
        f32::INFINITY
    } else {
        1.0 / component.abs()
    }
}

/// Ray parameter of the first boundary crossing on an axis.
fn axis_t_max(origin: f32, component: f32, block: i32) -> f32 {
    if component > 0.0 {
        ((block + 1) as f32 - origin) / component
    } else if component < 0.0 {
        (block as f32 - origin) / component
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::voxels::block::BlockType;
    use crate::voxels::chunk::Chunk;
    use cgmath::Point2;

    fn world_with(blocks: &[(i32, i32, i32)]) -> World {
        let mut world = World::new(&WorldConfig::default());
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        for &(x, y, z) in blocks {
            chunk.set_block(x, y, z, BlockType::STONE.id()).unwrap();
        }
        world.install_chunk(chunk, Vec::new());
        world
    }

    #[test]
    fn axis_ray_reports_face_and_distance() {
        let world = world_with(&[(0, 10, 3)]);
        let hit = raycast(
            &world,
            Point3::new(0.5, 10.5, 0.5),
            Vector3::new(0.0, 0.0, 1.0),
            MAX_RAYCAST_DISTANCE,
        )
        .expect("block within reach");

        assert_eq!(hit.block, Point3::new(0, 10, 3));
        assert_eq!(hit.normal, Vector3::new(0, 0, -1));
        assert!((hit.distance - 2.5).abs() < 1e-6);
    }

    #[test]
    fn max_distance_cuts_the_ray_short() {
        let world = world_with(&[(0, 10, 3)]);
        let hit = raycast(
            &world,
            Point3::new(0.5, 10.5, 0.5),
            Vector3::new(0.0, 0.0, 1.0),
            2.0,
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn unnormalized_direction_measures_true_distance() {
        let world = world_with(&[(0, 10, 3)]);
        let hit = raycast(
            &world,
            Point3::new(0.5, 10.5, 0.5),
            Vector3::new(0.0, 0.0, 17.0),
            MAX_RAYCAST_DISTANCE,
        )
        .expect("scaling the direction changes nothing");
        assert!((hit.distance - 2.5).abs() < 1e-6);
    }

    #[test]
    fn corner_tie_steps_x_first() {
        // From the cell center toward the diagonal: both boundary crossings
        // coincide, so the x step happens first and hits the x neighbor.
        let world = world_with(&[(2, 10, 2), (1, 10, 2), (2, 10, 1)]);
        let hit = raycast(
            &world,
            Point3::new(1.5, 10.5, 1.5),
            Vector3::new(1.0, 0.0, 1.0),
            MAX_RAYCAST_DISTANCE,
        )
        .expect("diagonal neighbors within reach");

        assert_eq!(hit.block, Point3::new(2, 10, 1));
        assert_eq!(hit.normal, Vector3::new(-1, 0, 0));
    }

    #[test]
    fn ray_starting_inside_a_block_hits_it_at_zero() {
        let world = world_with(&[(3, 10, 3)]);
        let hit = raycast(
            &world,
            Point3::new(3.5, 10.5, 3.5),
            Vector3::new(1.0, 0.0, 0.0),
            MAX_RAYCAST_DISTANCE,
        )
        .expect("origin block is solid");
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, Vector3::new(0, 0, 0));
    }

    #[test]
    fn water_is_not_a_raycast_target() {
        let mut world = World::new(&WorldConfig::default());
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(0, 10, 2, BlockType::WATER.id()).unwrap();
        chunk.set_block(0, 10, 4, BlockType::STONE.id()).unwrap();
        world.install_chunk(chunk, Vec::new());

        let hit = raycast(
            &world,
            Point3::new(0.5, 10.5, 0.5),
            Vector3::new(0.0, 0.0, 1.0),
            MAX_RAYCAST_DISTANCE,
        )
        .expect("ray passes through water to stone");
        assert_eq!(hit.block, Point3::new(0, 10, 4));
    }
}
