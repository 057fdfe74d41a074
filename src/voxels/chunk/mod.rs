//! # Chunk Module
//!
//! The `Chunk` struct: a 16×256×16 column of voxel data and the unit of
//! generation, meshing and loading.
//!
//! ## Storage Layout
//!
//! Block ids live in one flat, densely packed array addressed by
//! `index = x + z·W + y·W·D`. The formula is total and injective over the
//! local coordinate cube and is the only addressing scheme used anywhere in
//! the crate. A `bitvec` solid mask is maintained in parallel at the same
//! indices so the collision, raycast and meshing hot paths get occupancy
//! answers without a registry lookup per cell.
//!
//! Each chunk also carries its generation state, a dirty flag set on any
//! mutation, and the geometry buffer built from it. The chunk exclusively
//! owns both its block array and its mesh; they are released together when
//! the chunk leaves the load radius.

use bitvec::prelude::BitVec;
use bitvec::bitvec;
use cgmath::Point2;

use crate::meshing::mesh::ChunkMesh;

use super::block::{properties, BlockType, BlockTypeSize, Transparency};
use super::WorldError;

/// The width and depth of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The height of a chunk in blocks.
pub const CHUNK_HEIGHT: i32 = 256;
/// The number of blocks in one horizontal plane of a chunk.
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk.
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_HEIGHT;

/// How far a chunk has progressed through the generation pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GenerationState {
    /// Freshly created, all air.
    Empty,
    /// Height and cave passes have run.
    Generated,
    /// Tree/structure population has run.
    Populated,
    /// A geometry buffer has been built from the current contents.
    Meshed,
}

/// A 16×256×16 collection of voxel blocks.
///
/// Chunks are keyed by their integer `(chunk_x, chunk_z)` coordinate; block
/// coordinates inside a chunk are local (`0 ≤ x,z < 16`, `0 ≤ y < 256`).
/// Cross-chunk concerns (neighbor notification, deferred structure writes)
/// are the `World`'s responsibility, never the chunk's.
pub struct Chunk {
    /// The chunk coordinate (not a block coordinate).
    pub position: Point2<i32>,

    /// Flat block-id array, addressed by [`Chunk::block_index`].
    blocks: Vec<BlockTypeSize>,

    /// One bit per cell, set when the block there is solid. Kept in sync
    /// with `blocks` on every write.
    solid_mask: BitVec,

    /// Progress through the generation pipeline.
    pub state: GenerationState,

    /// Set on any block mutation; cleared when a fresh mesh is installed.
    pub dirty: bool,

    /// The geometry built from the current block contents, if any. Rebuilt
    /// wholesale when dirty, never patched incrementally.
    pub mesh: Option<ChunkMesh>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks air).
    pub fn empty(position: Point2<i32>) -> Self {
        Chunk {
            position,
            blocks: vec![BlockType::AIR.id(); CHUNK_SIZE as usize],
            solid_mask: bitvec![0; CHUNK_SIZE as usize],
            state: GenerationState::Empty,
            dirty: false,
            mesh: None,
        }
    }

    /// Creates a chunk completely filled with the given block type (for
    /// testing and fixtures).
    pub fn solid(position: Point2<i32>, block_type: BlockType) -> Self {
        let mut chunk = Self::empty(position);
        for index in 0..CHUNK_SIZE as usize {
            chunk.blocks[index] = block_type.id();
        }
        let is_solid = properties(block_type.id()).solid;
        chunk.solid_mask = BitVec::repeat(is_solid, CHUNK_SIZE as usize);
        chunk.state = GenerationState::Generated;
        chunk
    }

    /// Creates a chunk with a 3D checkerboard of stone and air (for testing).
    pub fn checkerboard(position: Point2<i32>) -> Self {
        let mut chunk = Self::empty(position);
        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    if (x + y + z) % 2 == 0 {
                        chunk.write_block(x, y, z, BlockType::STONE.id());
                    }
                }
            }
        }
        chunk.state = GenerationState::Generated;
        chunk.dirty = false;
        chunk
    }

    /// Creates a chunk with sparse random dirt blocks (for testing).
    pub fn random(position: Point2<i32>) -> Self {
        let sparseness = 0.9;

        let mut chunk = Self::empty(position);
        for index in 0..CHUNK_SIZE as usize {
            if fastrand::f64() >= sparseness {
                chunk.blocks[index] = BlockType::DIRT.id();
                chunk.solid_mask.set(index, true);
            }
        }
        chunk.state = GenerationState::Generated;
        chunk
    }

    /// Computes the flat array index for a local coordinate.
    ///
    /// `index = x + z·W + y·W·D`; a bijection over the local coordinate
    /// cube. Callers must pass in-range coordinates.
    #[inline]
    pub fn block_index(x: i32, y: i32, z: i32) -> usize {
        (x + z * CHUNK_DIMENSION + y * CHUNK_PLANE_SIZE) as usize
    }

    /// Recovers the local coordinate encoded by a flat array index.
    #[inline]
    pub fn decode_index(index: usize) -> (i32, i32, i32) {
        let index = index as i32;
        let y = index / CHUNK_PLANE_SIZE;
        let z = (index % CHUNK_PLANE_SIZE) / CHUNK_DIMENSION;
        let x = index % CHUNK_DIMENSION;
        (x, y, z)
    }

    /// Whether a local coordinate lies inside the chunk bounds.
    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..CHUNK_HEIGHT).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }

    /// Returns the stored block id at a local coordinate.
    ///
    /// Out-of-range coordinates read as air; reads are total.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        if !Self::in_bounds(x, y, z) {
            return BlockType::AIR.id();
        }
        self.blocks[Self::block_index(x, y, z)]
    }

    /// Writes a block id at a local coordinate and marks the chunk dirty.
    ///
    /// Fails with [`WorldError::OutOfRange`] when the coordinate is outside
    /// `[0,16)×[0,256)×[0,16)` instead of corrupting adjacent memory.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockTypeSize) -> Result<(), WorldError> {
        if !Self::in_bounds(x, y, z) {
            return Err(WorldError::OutOfRange { x, y, z });
        }
        self.write_block(x, y, z, id);
        Ok(())
    }

    /// Unchecked write used by the terrain generator, which iterates only
    /// in-range coordinates. Still keeps the solid mask and dirty flag
    /// coherent.
    #[inline]
    pub(crate) fn write_block(&mut self, x: i32, y: i32, z: i32, id: BlockTypeSize) {
        debug_assert!(Self::in_bounds(x, y, z));
        let index = Self::block_index(x, y, z);
        self.blocks[index] = id;
        self.solid_mask.set(index, properties(id).solid);
        self.dirty = true;
    }

    /// O(1) solidity test at a local coordinate; out-of-range reads as
    /// non-solid.
    #[inline]
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        self.solid_mask[Self::block_index(x, y, z)]
    }

    /// Borrow of the raw block-id array, used by determinism tests and the
    /// world's byte-level comparisons.
    pub fn raw_blocks(&self) -> &[BlockTypeSize] {
        &self.blocks
    }

    /// Computed sky light at a local coordinate, 0..=15.
    ///
    /// Light starts at 15 above the world and attenuates downward through
    /// the column: transparent blocks (water, glass) cost 2 levels, the
    /// first opaque block cuts the column to 0.
    pub fn sky_light(&self, x: i32, y: i32, z: i32) -> u8 {
        if !Self::in_bounds(x, y, z) {
            return if y >= CHUNK_HEIGHT { 15 } else { 0 };
        }
        let mut light: u8 = 15;
        for cy in (y + 1..CHUNK_HEIGHT).rev() {
            let props = properties(self.blocks[Self::block_index(x, cy, z)]);
            match props.transparency {
                Transparency::Air => {}
                Transparency::Transparent => light = light.saturating_sub(2),
                Transparency::Opaque => return 0,
            }
            if light == 0 {
                return 0;
            }
        }
        light
    }

    /// Releases the chunk's geometry buffer, if any. Called by the world
    /// before the chunk entry itself is dropped or cached.
    pub fn release_mesh(&mut self) {
        self.mesh = None;
        if self.state == GenerationState::Meshed {
            self.state = GenerationState::Populated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_formula_is_a_bijection() {
        let mut seen = vec![false; CHUNK_SIZE as usize];
        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let index = Chunk::block_index(x, y, z);
                    assert!(!seen[index], "index {} produced twice", index);
                    seen[index] = true;
                    assert_eq!(Chunk::decode_index(index), (x, y, z));
                }
            }
        }
        assert!(seen.into_iter().all(|hit| hit));
    }

    #[test]
    fn unwritten_cells_read_as_air() {
        let chunk = Chunk::empty(Point2::new(0, 0));
        assert_eq!(chunk.get_block(5, 100, 5), BlockType::AIR.id());
        assert!(!chunk.is_block_solid(5, 100, 5));
    }

    #[test]
    fn set_block_validates_bounds() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        assert_eq!(
            chunk.set_block(16, 0, 0, BlockType::STONE.id()),
            Err(WorldError::OutOfRange { x: 16, y: 0, z: 0 })
        );
        assert_eq!(
            chunk.set_block(0, -1, 0, BlockType::STONE.id()),
            Err(WorldError::OutOfRange { x: 0, y: -1, z: 0 })
        );
        assert!(chunk.set_block(15, 255, 15, BlockType::STONE.id()).is_ok());
        assert_eq!(chunk.get_block(15, 255, 15), BlockType::STONE.id());
    }

    #[test]
    fn mutation_sets_dirty_and_solid_mask() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        assert!(!chunk.dirty);
        chunk.set_block(1, 2, 3, BlockType::STONE.id()).unwrap();
        assert!(chunk.dirty);
        assert!(chunk.is_block_solid(1, 2, 3));

        chunk.set_block(1, 2, 3, BlockType::WATER.id()).unwrap();
        assert!(!chunk.is_block_solid(1, 2, 3), "water is not solid");
    }

    #[test]
    fn out_of_range_reads_are_total() {
        let chunk = Chunk::solid(Point2::new(0, 0), BlockType::STONE);
        assert_eq!(chunk.get_block(-1, 0, 0), BlockType::AIR.id());
        assert_eq!(chunk.get_block(0, 256, 0), BlockType::AIR.id());
        assert!(!chunk.is_block_solid(0, 0, 16));
    }

    #[test]
    fn checkerboard_alternates_every_cell() {
        let chunk = Chunk::checkerboard(Point2::new(0, 0));
        assert_eq!(chunk.get_block(0, 0, 0), BlockType::STONE.id());
        assert_eq!(chunk.get_block(1, 0, 0), BlockType::AIR.id());
        assert_eq!(chunk.get_block(1, 1, 0), BlockType::STONE.id());
        assert!(!chunk.dirty, "fixture constructors produce clean chunks");
    }

    #[test]
    fn random_chunk_is_sparse() {
        fastrand::seed(7);
        let chunk = Chunk::random(Point2::new(0, 0));
        let filled = chunk
            .raw_blocks()
            .iter()
            .filter(|&&id| id != BlockType::AIR.id())
            .count();
        assert!(filled > 0);
        assert!(filled < CHUNK_SIZE as usize / 2);
    }

    #[test]
    fn sky_light_column() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        chunk.set_block(4, 64, 4, BlockType::STONE.id()).unwrap();
        assert_eq!(chunk.sky_light(4, 65, 4), 15);
        assert_eq!(chunk.sky_light(4, 63, 4), 0);

        chunk.set_block(4, 70, 4, BlockType::WATER.id()).unwrap();
        // One water block above costs two levels.
        assert_eq!(chunk.sky_light(4, 69, 4), 13);
    }
}
