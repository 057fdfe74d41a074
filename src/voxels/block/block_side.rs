//! # Block Side Module
//!
//! Defines the six faces of a voxel block together with their outward
//! normals and integer grid offsets. The face order is fixed and shared by
//! the mesh builder, the registry's per-face texture tables, and the
//! raycaster's hit reporting.

use cgmath::Vector3;

/// The six faces of a voxel block.
///
/// The discriminant is used to index per-face arrays (texture indices, mesh
/// side buffers), so the order here is load-bearing:
/// `[FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]`.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face toward negative X.
    FRONT = 0,

    /// The face toward positive X.
    BACK = 1,

    /// The face toward negative Y.
    BOTTOM = 2,

    /// The face toward positive Y.
    TOP = 3,

    /// The face toward negative Z.
    LEFT = 4,

    /// The face toward positive Z.
    RIGHT = 5,
}

impl BlockSide {
    /// All six faces in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let o = self.offset();
        Vector3::new(o.x as f32, o.y as f32, o.z as f32)
    }

    /// The integer grid offset from a block to the neighbor this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(0, 0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_unit_and_distinct() {
        let mut seen = Vec::new();
        for side in BlockSide::all() {
            let o = side.offset();
            assert_eq!(o.x.abs() + o.y.abs() + o.z.abs(), 1);
            assert!(!seen.contains(&(o.x, o.y, o.z)));
            seen.push((o.x, o.y, o.z));
        }
    }
}
