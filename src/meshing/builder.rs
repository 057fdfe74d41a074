//! Face-culling mesh builder.
//!
//! The baseline mesher: for every non-air block, each of the six faces is
//! emitted only when the neighbor on that side does not occlude it. Neighbor
//! cells outside the chunk are resolved through the [`ChunkNeighborhood`],
//! which carries the edge-adjacent chunks the world handed to the build;
//! a neighbor chunk that is not resident is treated as air, so frontier
//! faces are visible until the neighbor loads and this chunk re-meshes.
//!
//! ## Transparency rule
//!
//! A face is emitted when the neighbor is absent, air, or transparent,
//! unless both blocks are the same transparent type (two water blocks do
//! not draw the face between them).
//!
//! ## Texture coordinates
//!
//! UVs address an `atlas_cells × atlas_cells` texture atlas and are inset
//! by half a texel so samples cannot bleed into neighboring cells.

use std::time::Instant;

use log::debug;

use crate::voxels::block::{properties, BlockSide, BlockType, BlockTypeSize, Transparency};
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION, CHUNK_HEIGHT};

use super::face::Face;
use super::mesh::Mesh;

/// Pixel edge length of one atlas cell, used to size the half-texel inset.
pub const ATLAS_CELL_PIXELS: f32 = 16.0;

/// A chunk and its four edge-adjacent neighbors, captured for one mesh
/// build. Missing neighbors read as air.
pub struct ChunkNeighborhood<'a> {
    /// The chunk being meshed.
    pub center: &'a Chunk,
    /// Neighbor at `chunk_x - 1`.
    pub neg_x: Option<&'a Chunk>,
    /// Neighbor at `chunk_x + 1`.
    pub pos_x: Option<&'a Chunk>,
    /// Neighbor at `chunk_z - 1`.
    pub neg_z: Option<&'a Chunk>,
    /// Neighbor at `chunk_z + 1`.
    pub pos_z: Option<&'a Chunk>,
}

impl<'a> ChunkNeighborhood<'a> {
    /// A neighborhood with no resident neighbors, for isolated builds and
    /// tests.
    pub fn isolated(center: &'a Chunk) -> Self {
        ChunkNeighborhood {
            center,
            neg_x: None,
            pos_x: None,
            neg_z: None,
            pos_z: None,
        }
    }

    /// Block id at a local coordinate that may spill one chunk past the
    /// center on x or z. Above/below the world and in absent neighbors the
    /// answer is air.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        if y < 0 || y >= CHUNK_HEIGHT {
            return BlockType::AIR.id();
        }
        let (chunk, x, z) = match (x, z) {
            (-1, _) => (self.neg_x, CHUNK_DIMENSION - 1, z),
            (CHUNK_DIMENSION, _) => (self.pos_x, 0, z),
            (_, -1) => (self.neg_z, x, CHUNK_DIMENSION - 1),
            (_, CHUNK_DIMENSION) => (self.pos_z, x, 0),
            _ => return self.center.get_block(x, y, z),
        };
        chunk
            .map(|chunk| chunk.get_block(x, y, z))
            .unwrap_or(BlockType::AIR.id())
    }

    /// Light level of the cell a face looks into: sky light of the owning
    /// column, raised to the cell's own emission. Cells in absent neighbors
    /// or above the world are fully lit.
    pub fn light_at(&self, x: i32, y: i32, z: i32) -> u8 {
        if y >= CHUNK_HEIGHT {
            return 15;
        }
        if y < 0 {
            return 0;
        }
        let sky = match (x, z) {
            (-1, _) => self.neg_x.map(|c| c.sky_light(CHUNK_DIMENSION - 1, y, z)),
            (CHUNK_DIMENSION, _) => self.pos_x.map(|c| c.sky_light(0, y, z)),
            (_, -1) => self.neg_z.map(|c| c.sky_light(x, y, CHUNK_DIMENSION - 1)),
            (_, CHUNK_DIMENSION) => self.pos_z.map(|c| c.sky_light(x, y, 0)),
            _ => Some(self.center.sky_light(x, y, z)),
        };
        let emission = properties(self.block_at(x, y, z)).emission;
        sky.unwrap_or(15).max(emission)
    }
}

/// Whether the face between a block and its neighbor should be drawn.
///
/// Opaque neighbors occlude; matching transparent types suppress the shared
/// face; everything else (air, absent, differing transparency) lets the
/// face through.
pub fn face_visible(block: BlockTypeSize, neighbor: BlockTypeSize) -> bool {
    let neighbor_props = properties(neighbor);
    if neighbor_props.is_opaque() {
        return false;
    }
    let block_props = properties(block);
    if block_props.transparency == Transparency::Transparent
        && neighbor_props.transparency == Transparency::Transparent
        && block == neighbor
    {
        return false;
    }
    true
}

/// The face-culling mesher.
#[derive(Copy, Clone, Debug)]
pub struct MeshBuilder {
    /// Cells per atlas edge.
    atlas_cells: u32,
}

impl MeshBuilder {
    /// Creates a builder for an `atlas_cells × atlas_cells` texture atlas.
    pub fn new(atlas_cells: u32) -> Self {
        MeshBuilder {
            atlas_cells: atlas_cells.max(1),
        }
    }

    /// Builds the mesh for a chunk with face culling.
    ///
    /// One quad (4 vertices, 6 indices) per visible face. The result is
    /// deterministic for given chunk and neighbor contents.
    pub fn build(&self, neighborhood: &ChunkNeighborhood<'_>) -> Mesh {
        let started = Instant::now();
        let mut mesh = Mesh::new();
        let chunk = neighborhood.center;

        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let block = chunk.get_block(x, y, z);
                    if block == BlockType::AIR.id() {
                        continue;
                    }
                    for side in BlockSide::all() {
                        let offset = side.offset();
                        let (nx, ny, nz) = (x + offset.x, y + offset.y, z + offset.z);
                        if !face_visible(block, neighborhood.block_at(nx, ny, nz)) {
                            continue;
                        }
                        let light = neighborhood.light_at(nx, ny, nz);
                        let face = Face::new(x, y, z, block, side, light);
                        let texture_index = properties(block).texture_indices[side as usize];
                        mesh.push_face(&face, self.unit_uvs(texture_index), texture_index);
                    }
                }
            }
        }

        debug!(
            "meshed chunk ({}, {}): {} quads in {:?}",
            chunk.position.x,
            chunk.position.y,
            mesh.quad_count(),
            started.elapsed()
        );
        mesh
    }

    /// UV corners `[ll, lr, ul, ur]` of a unit face within one atlas cell,
    /// inset by half a texel against bleeding.
    fn unit_uvs(&self, texture_index: u32) -> [[f32; 2]; 4] {
        let cells = self.atlas_cells;
        let cell_size = 1.0 / cells as f32;
        let inset = cell_size / (2.0 * ATLAS_CELL_PIXELS);

        let cell_x = (texture_index % cells) as f32;
        let cell_y = (texture_index / cells) as f32;
        let u0 = cell_x * cell_size + inset;
        let u1 = (cell_x + 1.0) * cell_size - inset;
        let v0 = cell_y * cell_size + inset;
        let v1 = (cell_y + 1.0) * cell_size - inset;

        [[u0, v1], [u1, v1], [u0, v0], [u1, v0]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    fn stone_pair_chunk() -> Chunk {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(0, 0, 0, BlockType::STONE.id()).unwrap();
        chunk.set_block(1, 0, 0, BlockType::STONE.id()).unwrap();
        chunk
    }

    #[test]
    fn adjacent_stone_culls_the_shared_face() {
        let chunk = stone_pair_chunk();
        let mesh = MeshBuilder::new(16).build(&ChunkNeighborhood::isolated(&chunk));

        // Two cubes share one interior face pair: 12 - 2 = 10 quads.
        assert_eq!(mesh.quad_count(), 10);
        // The +X side of the left block and the -X side of the right block
        // are the culled pair, leaving one quad on each X side.
        assert_eq!(mesh.side_quad_count(BlockSide::FRONT), 1);
        assert_eq!(mesh.side_quad_count(BlockSide::BACK), 1);
        assert_eq!(mesh.side_quad_count(BlockSide::TOP), 2);

        let chunk_mesh = mesh.into_chunk_mesh();
        assert_eq!(chunk_mesh.vertices.len(), 40);
        assert_eq!(chunk_mesh.indices.len(), 60);
    }

    #[test]
    fn single_block_emits_six_quads() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(4, 10, 4, BlockType::STONE.id()).unwrap();
        let mesh = MeshBuilder::new(16).build(&ChunkNeighborhood::isolated(&chunk));
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn stone_against_water_emits_the_shared_face() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(0, 5, 0, BlockType::STONE.id()).unwrap();
        chunk.set_block(1, 5, 0, BlockType::WATER.id()).unwrap();
        let mesh = MeshBuilder::new(16).build(&ChunkNeighborhood::isolated(&chunk));

        // Stone: all six faces (water does not occlude). Water: five faces,
        // the one against stone is occluded by the opaque neighbor.
        assert_eq!(mesh.quad_count(), 11);
    }

    #[test]
    fn water_against_water_suppresses_the_shared_faces() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(0, 5, 0, BlockType::WATER.id()).unwrap();
        chunk.set_block(1, 5, 0, BlockType::WATER.id()).unwrap();
        let mesh = MeshBuilder::new(16).build(&ChunkNeighborhood::isolated(&chunk));

        // Both interior faces suppressed in both directions.
        assert_eq!(mesh.quad_count(), 10);
    }

    #[test]
    fn chunk_border_uses_the_neighbor_chunk() {
        let mut center = Chunk::empty(Point2::new(0, 0));
        center.set_block(15, 5, 0, BlockType::STONE.id()).unwrap();
        let mut east = Chunk::empty(Point2::new(1, 0));
        east.set_block(0, 5, 0, BlockType::STONE.id()).unwrap();

        let lonely = MeshBuilder::new(16).build(&ChunkNeighborhood::isolated(&center));
        assert_eq!(lonely.quad_count(), 6, "frontier face visible when neighbor absent");

        let neighborhood = ChunkNeighborhood {
            center: &center,
            neg_x: None,
            pos_x: Some(&east),
            neg_z: None,
            pos_z: None,
        };
        let meshed = MeshBuilder::new(16).build(&neighborhood);
        assert_eq!(meshed.quad_count(), 5, "border face culled against neighbor");
    }

    #[test]
    fn unknown_block_meshes_with_placeholder_texture() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(4, 10, 4, 200).unwrap();
        let mesh = MeshBuilder::new(16).build(&ChunkNeighborhood::isolated(&chunk));
        assert_eq!(mesh.quad_count(), 6);
        let chunk_mesh = mesh.into_chunk_mesh();
        assert!(chunk_mesh
            .vertices
            .iter()
            .all(|v| v.texture_index == crate::voxels::block::registry::MISSING_TEXTURE_INDEX));
    }

    #[test]
    fn uvs_stay_inside_their_atlas_cell() {
        let builder = MeshBuilder::new(16);
        let uvs = builder.unit_uvs(5);
        let cell = 1.0 / 16.0;
        for [u, v] in uvs {
            assert!(u > 5.0 * cell && u < 6.0 * cell);
            assert!(v > 0.0 && v < cell);
        }
    }
}
