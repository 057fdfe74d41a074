//! Greedy meshing on top of the face-culling pass.
//!
//! Visibility is decided exactly as in [`builder`](super::builder); the
//! difference is purely in how visible faces become quads. Coplanar faces
//! with the same block id and light level are merged into larger rectangles
//! with the [`Face`] merge primitives: first along each row of a plane,
//! then row-against-row when the strip edges line up exactly. A solid
//! 16×16 plane collapses to a single quad instead of 256.
//!
//! Merged quads carry block-extent UVs (`0..width`, `0..height`) and the
//! atlas cell in the vertex `texture_index`, so they suit pipelines that
//! tile from an array texture rather than sample baked atlas coordinates.

use std::time::Instant;

use log::debug;

use crate::voxels::block::{properties, BlockSide, BlockType};
use crate::voxels::chunk::{CHUNK_DIMENSION, CHUNK_HEIGHT};

use super::builder::{face_visible, ChunkNeighborhood};
use super::face::Face;
use super::mesh::Mesh;

/// The greedy mesher.
#[derive(Copy, Clone, Debug)]
pub struct GreedyMesher;

impl GreedyMesher {
    /// Builds the mesh for a chunk, merging coplanar faces.
    ///
    /// Produces geometry covering exactly the same visible faces as the
    /// face-culling builder, in (usually far) fewer quads.
    pub fn build(&self, neighborhood: &ChunkNeighborhood<'_>) -> Mesh {
        let started = Instant::now();
        let mut mesh = Mesh::new();

        for side in BlockSide::all() {
            self.build_side(neighborhood, side, &mut mesh);
        }

        debug!(
            "greedy-meshed chunk ({}, {}): {} quads in {:?}",
            neighborhood.center.position.x,
            neighborhood.center.position.y,
            mesh.quad_count(),
            started.elapsed()
        );
        mesh
    }

    /// Sweeps every plane of one block side, merging as it goes.
    ///
    /// Each plane is scanned row by row. Adjacent faces within a row merge
    /// into strips; a finished row then merges strip-by-strip into the
    /// previous row's strips where the shared edges match exactly. Strips
    /// that stop extending are flushed to the mesh.
    fn build_side(&self, neighborhood: &ChunkNeighborhood<'_>, side: BlockSide, mesh: &mut Mesh) {
        let (planes, rows) = plane_extents(side);

        for plane in 0..planes {
            let mut open_strips: Vec<Face> = Vec::new();

            for v in 0..rows {
                let mut row_strips: Vec<Face> = Vec::new();

                for u in 0..CHUNK_DIMENSION {
                    let (x, y, z) = local_position(side, plane, u, v);
                    let block = neighborhood.center.get_block(x, y, z);
                    if block == BlockType::AIR.id() {
                        continue;
                    }
                    let offset = side.offset();
                    let (nx, ny, nz) = (x + offset.x, y + offset.y, z + offset.z);
                    if !face_visible(block, neighborhood.block_at(nx, ny, nz)) {
                        continue;
                    }
                    let face = Face::new(x, y, z, block, side, neighborhood.light_at(nx, ny, nz));

                    match row_strips.last().and_then(|last| row_merge(side, last, &face)) {
                        Some(merged) => {
                            let last = row_strips.len() - 1;
                            row_strips[last] = merged;
                        }
                        None => row_strips.push(face),
                    }
                }

                let mut extended: Vec<Face> = Vec::with_capacity(row_strips.len());
                for strip in row_strips {
                    let grown = open_strips
                        .iter()
                        .position(|open| cross_merge(side, open, &strip).is_some())
                        .and_then(|index| {
                            let open = open_strips.remove(index);
                            cross_merge(side, &open, &strip)
                        });
                    extended.push(grown.unwrap_or(strip));
                }
                for stalled in open_strips.drain(..) {
                    self.emit(mesh, &stalled);
                }
                open_strips = extended;
            }

            for strip in open_strips {
                self.emit(mesh, &strip);
            }
        }
    }

    fn emit(&self, mesh: &mut Mesh, face: &Face) {
        let width = face.width() as f32;
        let height = face.height() as f32;
        let uvs = [[0.0, height], [width, height], [0.0, 0.0], [width, 0.0]];
        let texture_index = properties(face.block).texture_indices[face.side as usize];
        mesh.push_face(face, uvs, texture_index);
    }
}

/// `(plane count, rows per plane)` for a side's sweep; rows are always
/// `CHUNK_DIMENSION` blocks long.
fn plane_extents(side: BlockSide) -> (i32, i32) {
    match side {
        BlockSide::TOP | BlockSide::BOTTOM => (CHUNK_HEIGHT, CHUNK_DIMENSION),
        _ => (CHUNK_DIMENSION, CHUNK_HEIGHT),
    }
}

/// Maps sweep coordinates back to chunk-local block coordinates.
fn local_position(side: BlockSide, plane: i32, u: i32, v: i32) -> (i32, i32, i32) {
    match side {
        BlockSide::FRONT | BlockSide::BACK => (plane, v, u),
        BlockSide::LEFT | BlockSide::RIGHT => (u, v, plane),
        BlockSide::TOP | BlockSide::BOTTOM => (u, plane, v),
    }
}

/// Merge toward ascending `u` within a row. Which corner-edge primitive
/// applies depends on how the side's corners are laid out.
fn row_merge(side: BlockSide, strip: &Face, next: &Face) -> Option<Face> {
    match side {
        BlockSide::FRONT | BlockSide::RIGHT => strip.merge_right(next),
        BlockSide::BACK | BlockSide::LEFT => strip.merge_left(next),
        BlockSide::TOP | BlockSide::BOTTOM => strip.merge_up(next),
    }
}

/// Merge toward ascending `v`, joining one row's strip onto the previous
/// row's when their shared edge matches end to end.
fn cross_merge(side: BlockSide, strip: &Face, next: &Face) -> Option<Face> {
    match side {
        BlockSide::TOP => strip.merge_right(next),
        BlockSide::BOTTOM => strip.merge_left(next),
        _ => strip.merge_up(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::builder::MeshBuilder;
    use crate::voxels::chunk::Chunk;
    use cgmath::Point2;

    #[test]
    fn slab_collapses_to_six_quads() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                chunk.set_block(x, 0, z, BlockType::STONE.id()).unwrap();
            }
        }
        let neighborhood = ChunkNeighborhood::isolated(&chunk);

        let naive = MeshBuilder::new(16).build(&neighborhood);
        let greedy = GreedyMesher.build(&neighborhood);

        // 256 top + 256 bottom + 4 * 16 side faces in the naive mesh.
        assert_eq!(naive.quad_count(), 576);
        assert_eq!(greedy.quad_count(), 6);

        let top = &greedy.sides[BlockSide::TOP as usize];
        assert_eq!(top.vertices.len(), 4);
    }

    #[test]
    fn pair_of_blocks_merges_every_shared_side() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(3, 10, 3, BlockType::STONE.id()).unwrap();
        chunk.set_block(4, 10, 3, BlockType::STONE.id()).unwrap();

        let greedy = GreedyMesher.build(&ChunkNeighborhood::isolated(&chunk));
        // A 2x1x1 bar: four merged long faces plus the two end caps.
        assert_eq!(greedy.quad_count(), 6);
    }

    #[test]
    fn differing_blocks_stay_separate_quads() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(3, 10, 3, BlockType::STONE.id()).unwrap();
        chunk.set_block(4, 10, 3, BlockType::DIRT.id()).unwrap();

        let greedy = GreedyMesher.build(&ChunkNeighborhood::isolated(&chunk));
        // No merges possible across the id boundary: 5 faces each.
        assert_eq!(greedy.quad_count(), 10);
    }

    #[test]
    fn merged_quads_carry_block_extent_uvs() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        for x in 0..4 {
            chunk.set_block(x, 10, 3, BlockType::STONE.id()).unwrap();
        }
        let greedy = GreedyMesher.build(&ChunkNeighborhood::isolated(&chunk));

        let top = &greedy.sides[BlockSide::TOP as usize];
        assert_eq!(top.vertices.len(), 4);
        let max_u = top
            .vertices
            .iter()
            .map(|v| v.tex_coords[0])
            .fold(0.0f32, f32::max);
        let max_v = top
            .vertices
            .iter()
            .map(|v| v.tex_coords[1])
            .fold(0.0f32, f32::max);
        // 4 blocks along x: the top face is 1 wide (z) and 4 tall (x).
        assert_eq!(max_u.max(max_v), 4.0);
        assert_eq!(max_u.min(max_v), 1.0);
    }
}
