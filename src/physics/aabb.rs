//! Axis-aligned bounding boxes.

use cgmath::{Point3, Vector3};

/// Player collision box width and depth, in blocks.
pub const PLAYER_WIDTH: f32 = 0.6;
/// Player collision box height, in blocks.
pub const PLAYER_HEIGHT: f32 = 1.8;

/// An axis-aligned box in world space, `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The corner with the smallest coordinates.
    pub min: Point3<f32>,
    /// The corner with the largest coordinates.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from its two extreme corners.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// The standard player box, anchored at the feet center.
    pub fn player(feet: Point3<f32>) -> Self {
        let half = PLAYER_WIDTH / 2.0;
        Aabb {
            min: Point3::new(feet.x - half, feet.y, feet.z - half),
            max: Point3::new(feet.x + half, feet.y + PLAYER_HEIGHT, feet.z + half),
        }
    }

    /// The unit box of the block at an integer world coordinate.
    pub fn block(x: i32, y: i32, z: i32) -> Self {
        Aabb {
            min: Point3::new(x as f32, y as f32, z as f32),
            max: Point3::new((x + 1) as f32, (y + 1) as f32, (z + 1) as f32),
        }
    }

    /// The box moved by a displacement.
    pub fn translated(&self, delta: Vector3<f32>) -> Self {
        Aabb {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Whether two boxes overlap on every axis.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// The center of the box.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }
}
