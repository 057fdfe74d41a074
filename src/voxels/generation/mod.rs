//! # Terrain Generation Module
//!
//! Deterministic, seeded procedural population of chunks. The contract: the
//! same `(seed, chunk_x, chunk_z)` always produces the same block contents,
//! independent of generation order, thread, or which neighboring chunks
//! exist. There is no runtime failure path; every seed/coordinate pair is
//! valid input.
//!
//! ## Passes
//!
//! 1. **Height pass**: per column, 2D noise gives a base elevation and a
//!    coarser channel selects the biome; stone below, a thin dirt layer,
//!    grass (or sand near water) on top, water up to sea level.
//! 2. **Cave pass**: 3D noise sampled per solid voxel below the surface;
//!    values past a fixed threshold carve to air. Caves never breach the
//!    bedrock floor or open above the surface.
//! 3. **Population pass**: trees in forest columns. Blocks that land
//!    outside the chunk being generated are returned as [`WorldEdit`]s for
//!    the world's deferred-edit queue instead of being written here, which
//!    keeps each chunk's own contents a pure function of seed and
//!    coordinate.

use cgmath::{Point2, Point3};
use noise::{NoiseFn, Perlin};

use super::block::{BlockType, BlockTypeSize};
use super::chunk::{Chunk, GenerationState, CHUNK_DIMENSION, CHUNK_HEIGHT};

pub mod biome;

pub use biome::Biome;

/// Water fills air columns up to this height.
pub const SEA_LEVEL: i32 = 62;

/// Mean terrain elevation before biome detail is applied.
const BASE_HEIGHT: f64 = 64.0;
/// Frequency of the broad elevation octave shared by all biomes.
const BROAD_FREQUENCY: f64 = 0.008;
/// Elevation swing of the broad octave, in blocks.
const BROAD_AMPLITUDE: f64 = 10.0;
/// Frequency of the biome-selection channel; much coarser than elevation.
const BIOME_FREQUENCY: f64 = 0.0035;
/// Frequency of the 3D cave-density field.
const CAVE_FREQUENCY: f64 = 0.06;
/// Density above which a voxel is carved to air.
const CAVE_THRESHOLD: f64 = 0.55;
/// Depth of the dirt layer beneath the surface block.
const DIRT_DEPTH: i32 = 3;
/// Tree-placement channel frequency; high enough to decorrelate columns.
const TREE_FREQUENCY: f64 = 0.9;
/// Tree-placement channel threshold.
const TREE_THRESHOLD: f64 = 0.6;

/// A single deferred block write produced by the population pass.
///
/// Edits target world coordinates outside the chunk being generated (a
/// trunk or canopy crossing the boundary). The world applies them as soon
/// as the target chunk exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldEdit {
    /// World-space block coordinate of the write.
    pub position: Point3<i32>,
    /// The id to write.
    pub block: BlockTypeSize,
    /// When set, the write only lands on air (canopy leaves); otherwise it
    /// overwrites unconditionally (trunks).
    pub replace_air_only: bool,
}

/// Seeded procedural terrain generator.
///
/// Cheap to clone; background generation tasks each carry their own copy so
/// no lock is held while a chunk is being filled.
#[derive(Clone)]
pub struct TerrainGenerator {
    seed: u32,
    height_noise: Perlin,
    biome_noise: Perlin,
    cave_noise: Perlin,
    tree_noise: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator for the given world seed.
    ///
    /// Each pass gets its own noise channel, derived from the seed with a
    /// fixed offset so the channels are decorrelated but still fully
    /// determined by the one seed.
    pub fn new(seed: u32) -> Self {
        TerrainGenerator {
            seed,
            height_noise: Perlin::new(seed),
            biome_noise: Perlin::new(seed.wrapping_add(1)),
            cave_noise: Perlin::new(seed.wrapping_add(2)),
            tree_noise: Perlin::new(seed.wrapping_add(3)),
        }
    }

    /// The world seed this generator was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Generates the chunk at the given chunk coordinate.
    ///
    /// Returns the populated chunk plus the deferred writes that landed
    /// outside it. Deterministic in `(seed, position)` alone.
    pub fn generate(&self, position: Point2<i32>) -> (Chunk, Vec<WorldEdit>) {
        let mut chunk = Chunk::empty(position);
        let mut heights = [[0i32; CHUNK_DIMENSION as usize]; CHUNK_DIMENSION as usize];

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let (wx, wz) = self.world_column(position, x, z);
                let height = self.surface_height(wx, wz);
                heights[x as usize][z as usize] = height;
                self.fill_column(&mut chunk, x, z, height);
            }
        }
        chunk.state = GenerationState::Generated;

        self.carve_caves(&mut chunk, &heights);
        let edits = self.populate_trees(&mut chunk, &heights);
        chunk.state = GenerationState::Populated;

        (chunk, edits)
    }

    /// The biome governing a world column.
    pub fn biome_at(&self, wx: i32, wz: i32) -> Biome {
        let value = self
            .biome_noise
            .get([wx as f64 * BIOME_FREQUENCY, wz as f64 * BIOME_FREQUENCY]);
        if value > 0.3 {
            Biome::Hills
        } else if value < -0.25 {
            Biome::Plains
        } else {
            Biome::Forest
        }
    }

    /// The surface elevation of a world column.
    ///
    /// A broad octave shared by all biomes keeps neighboring biomes roughly
    /// level at their border; the biome only scales the detail octave.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let biome = self.biome_at(wx, wz);
        let broad = self
            .height_noise
            .get([wx as f64 * BROAD_FREQUENCY, wz as f64 * BROAD_FREQUENCY]);
        let detail = self
            .height_noise
            .get([wx as f64 * biome.frequency(), wz as f64 * biome.frequency()]);
        let height = BASE_HEIGHT + broad * BROAD_AMPLITUDE + detail * biome.amplitude();
        (height.floor() as i32).clamp(1, CHUNK_HEIGHT - 1)
    }

    fn world_column(&self, position: Point2<i32>, x: i32, z: i32) -> (i32, i32) {
        (
            position.x * CHUNK_DIMENSION + x,
            position.y * CHUNK_DIMENSION + z,
        )
    }

    /// Height pass for one column: bedrock, stone, dirt, surface, water.
    fn fill_column(&self, chunk: &mut Chunk, x: i32, z: i32, height: i32) {
        chunk.write_block(x, 0, z, BlockType::BEDROCK.id());

        for y in 1..=height {
            let block = if y < height - DIRT_DEPTH {
                BlockType::STONE
            } else if y < height {
                BlockType::DIRT
            } else if height < SEA_LEVEL + 2 {
                // Shoreline and seabed surfaces are sand.
                BlockType::SAND
            } else {
                BlockType::GRASS
            };
            chunk.write_block(x, y, z, block.id());
        }

        for y in height + 1..=SEA_LEVEL {
            chunk.write_block(x, y, z, BlockType::WATER.id());
        }
    }

    /// Cave pass: carve connected voids strictly below the surface.
    fn carve_caves(&self, chunk: &mut Chunk, heights: &[[i32; 16]; 16]) {
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let height = heights[x as usize][z as usize];
                // Underwater columns keep their floor so the sea stays sealed.
                if height < SEA_LEVEL {
                    continue;
                }
                let (wx, wz) = self.world_column(chunk.position, x, z);
                for y in 1..height {
                    let density = self.cave_noise.get([
                        wx as f64 * CAVE_FREQUENCY,
                        y as f64 * CAVE_FREQUENCY,
                        wz as f64 * CAVE_FREQUENCY,
                    ]);
                    if density > CAVE_THRESHOLD {
                        chunk.write_block(x, y, z, BlockType::AIR.id());
                    }
                }
            }
        }
    }

    /// Population pass: plant trees on eligible forest columns.
    ///
    /// Writes inside the chunk land directly; writes outside are collected
    /// as deferred [`WorldEdit`]s.
    fn populate_trees(&self, chunk: &mut Chunk, heights: &[[i32; 16]; 16]) -> Vec<WorldEdit> {
        let mut edits = Vec::new();

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let height = heights[x as usize][z as usize];
                let (wx, wz) = self.world_column(chunk.position, x, z);

                if !self.biome_at(wx, wz).grows_trees() || height < SEA_LEVEL + 2 {
                    continue;
                }
                let roll = self
                    .tree_noise
                    .get([wx as f64 * TREE_FREQUENCY, wz as f64 * TREE_FREQUENCY]);
                if roll <= TREE_THRESHOLD {
                    continue;
                }
                // The cave pass may have removed the surface out from under us.
                if chunk.get_block(x, height, z) != BlockType::GRASS.id() {
                    continue;
                }

                let trunk_height = 4 + (((roll - TREE_THRESHOLD) * 8.0) as i32).min(2);
                self.plant_tree(chunk, &mut edits, wx, height + 1, wz, trunk_height);
            }
        }

        edits
    }

    fn plant_tree(
        &self,
        chunk: &mut Chunk,
        edits: &mut Vec<WorldEdit>,
        wx: i32,
        base_y: i32,
        wz: i32,
        trunk_height: i32,
    ) {
        for dy in 0..trunk_height {
            self.place(chunk, edits, wx, base_y + dy, wz, BlockType::WOOD, false);
        }

        let top = base_y + trunk_height;
        // Two wide canopy layers around the trunk top, one narrow cap above.
        for dy in -1..=0 {
            for dx in -2..=2 {
                for dz in -2..=2 {
                    if dx == 0 && dz == 0 && dy <= 0 {
                        continue;
                    }
                    self.place(chunk, edits, wx + dx, top + dy, wz + dz, BlockType::LEAVES, true);
                }
            }
        }
        for dx in -1..=1 {
            for dz in -1..=1 {
                self.place(chunk, edits, wx + dx, top + 1, wz + dz, BlockType::LEAVES, true);
            }
        }
    }

    /// Routes one world-coordinate write either into the chunk being
    /// generated or onto the deferred-edit list.
    fn place(
        &self,
        chunk: &mut Chunk,
        edits: &mut Vec<WorldEdit>,
        wx: i32,
        y: i32,
        wz: i32,
        block: BlockType,
        replace_air_only: bool,
    ) {
        if y < 0 || y >= CHUNK_HEIGHT {
            return;
        }
        let local_x = wx - chunk.position.x * CHUNK_DIMENSION;
        let local_z = wz - chunk.position.y * CHUNK_DIMENSION;
        if (0..CHUNK_DIMENSION).contains(&local_x) && (0..CHUNK_DIMENSION).contains(&local_z) {
            if replace_air_only && chunk.get_block(local_x, y, local_z) != BlockType::AIR.id() {
                return;
            }
            chunk.write_block(local_x, y, local_z, block.id());
        } else {
            edits.push(WorldEdit {
                position: Point3::new(wx, y, wz),
                block: block.id(),
                replace_air_only,
            });
        }
    }
}
