//! Quad face bookkeeping for mesh assembly.
//!
//! A [`Face`] records the four corner points of one block-face quad in
//! chunk-local coordinates, plus the block id, side and light level it was
//! emitted for. The merge primitives combine coplanar faces whose edges
//! align exactly; they are the building blocks of the optional greedy pass.

use cgmath::Point3;

use crate::voxels::block::{BlockSide, BlockTypeSize};

/// A single quad face of a voxel in the mesh.
///
/// Corners are named lower-left, lower-right, upper-left, upper-right with
/// respect to the face's own plane; the concrete axis each name maps to
/// depends on the side (see [`Face::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner in chunk-local coordinates.
    pub ll: Point3<i32>,
    /// Lower-right corner.
    pub lr: Point3<i32>,
    /// Upper-left corner.
    pub ul: Point3<i32>,
    /// Upper-right corner.
    pub ur: Point3<i32>,
    /// The block id this face was emitted for.
    pub block: BlockTypeSize,
    /// Which side of the block this face covers.
    pub side: BlockSide,
    /// Light level of the cell the face looks into, 0..=15.
    pub light: u8,
}

impl Face {
    /// Creates the unit face of the voxel at `(i, j, k)` on the given side.
    pub fn new(i: i32, j: i32, k: i32, block: BlockTypeSize, side: BlockSide, light: u8) -> Self {
        match side {
            BlockSide::FRONT => Face {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i, j, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i, j + 1, k + 1),
                block,
                side,
                light,
            },

            BlockSide::BACK => Face {
                ll: Point3::new(i + 1, j, k + 1),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i + 1, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k),
                block,
                side,
                light,
            },

            BlockSide::BOTTOM => Face {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i, j, k),
                ul: Point3::new(i + 1, j, k + 1),
                ur: Point3::new(i + 1, j, k),
                block,
                side,
                light,
            },

            BlockSide::TOP => Face {
                ll: Point3::new(i, j + 1, k),
                lr: Point3::new(i, j + 1, k + 1),
                ul: Point3::new(i + 1, j + 1, k),
                ur: Point3::new(i + 1, j + 1, k + 1),
                block,
                side,
                light,
            },

            BlockSide::LEFT => Face {
                ll: Point3::new(i + 1, j, k),
                lr: Point3::new(i, j, k),
                ul: Point3::new(i + 1, j + 1, k),
                ur: Point3::new(i, j + 1, k),
                block,
                side,
                light,
            },

            BlockSide::RIGHT => Face {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i + 1, j, k + 1),
                ul: Point3::new(i, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k + 1),
                block,
                side,
                light,
            },
        }
    }

    fn compatible(&self, other: &Face) -> bool {
        self.block == other.block && self.light == other.light && self.side == other.side
    }

    /// Merges with a face directly "above" this one (in face-plane terms),
    /// when block, light and edges all match.
    pub fn merge_up(&self, other: &Face) -> Option<Face> {
        if self.compatible(other) && self.ul == other.ll && self.ur == other.lr {
            return Some(Face {
                ul: other.ul,
                ur: other.ur,
                ll: self.ll,
                lr: self.lr,
                ..*self
            });
        }

        None
    }

    /// Merges with a face directly to this one's "right".
    pub fn merge_right(&self, other: &Face) -> Option<Face> {
        if self.compatible(other) && self.lr == other.ll && self.ur == other.ul {
            return Some(Face {
                ul: self.ul,
                ur: other.ur,
                ll: self.ll,
                lr: other.lr,
                ..*self
            });
        }

        None
    }

    /// Merges with a face directly to this one's "left".
    pub fn merge_left(&self, other: &Face) -> Option<Face> {
        if self.compatible(other) && self.ll == other.lr && self.ul == other.ur {
            return Some(Face {
                ul: other.ul,
                ur: self.ur,
                ll: other.ll,
                lr: self.lr,
                ..*self
            });
        }

        None
    }

    /// Extent of the quad along its lower edge, in blocks.
    pub fn width(&self) -> i32 {
        let d = self.lr - self.ll;
        d.x.abs() + d.y.abs() + d.z.abs()
    }

    /// Extent of the quad along its left edge, in blocks.
    pub fn height(&self) -> i32 {
        let d = self.ul - self.ll;
        d.x.abs() + d.y.abs() + d.z.abs()
    }
}
