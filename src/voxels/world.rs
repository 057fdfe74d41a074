//! # World Module
//!
//! The `World` owns every resident chunk and is the single authority for
//! world-space queries and mutation. Chunks are keyed by their integer
//! chunk coordinate; world block coordinates map onto a chunk and a local
//! coordinate with euclidean division, so the mapping is exact across
//! negative coordinates.
//!
//! ## Streaming
//!
//! A square of chunks around a movable center is kept resident. Chunks
//! leaving the load radius release their geometry and drop into a bounded
//! LRU cache so a player circling back does not pay for regeneration;
//! chunks entering the radius are either revived from that cache or handed
//! to the background generation pipeline. At most one generation is in
//! flight per position.
//!
//! ## Cross-chunk structure writes
//!
//! Terrain generation can produce writes that land outside the chunk being
//! generated (tree canopies straddling a border). Those arrive here as
//! [`WorldEdit`]s: applied immediately when the target chunk is resident,
//! queued per target position otherwise and drained when that chunk is
//! installed. Either way the same world state is reached regardless of
//! generation order.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use cgmath::Point2;
use log::debug;
use lru::LruCache;

use crate::config::WorldConfig;
use crate::core::MtResource;

use super::block::{BlockType, BlockTypeSize};
use super::chunk::{Chunk, CHUNK_DIMENSION, CHUNK_HEIGHT};
use super::generation::{TerrainGenerator, WorldEdit};
use super::WorldError;

/// The world: resident chunks, streaming state and the deferred-edit queue.
pub struct World {
    chunks: HashMap<(i32, i32), MtResource<Chunk>>,
    /// Structure writes waiting for their target chunk to load.
    pending_edits: HashMap<(i32, i32), Vec<WorldEdit>>,
    /// Recently evicted chunks, revivable without regeneration.
    evicted: LruCache<(i32, i32), MtResource<Chunk>>,
    /// Positions currently being generated in the background.
    in_flight: HashSet<(i32, i32)>,
    center: Point2<i32>,
    load_radius: i32,
    generator: TerrainGenerator,
    atlas_cells: u32,
    greedy_meshing: bool,
}

impl World {
    /// Creates an empty world from a configuration.
    pub fn new(config: &WorldConfig) -> Self {
        let cache_size =
            NonZeroUsize::new(config.evicted_cache_size).unwrap_or(NonZeroUsize::MIN);
        World {
            chunks: HashMap::new(),
            pending_edits: HashMap::new(),
            evicted: LruCache::new(cache_size),
            in_flight: HashSet::new(),
            center: Point2::new(0, 0),
            load_radius: config.load_radius.max(0),
            generator: TerrainGenerator::new(config.seed),
            atlas_cells: config.atlas_cells,
            greedy_meshing: config.greedy_meshing,
        }
    }

    /// Splits a world block coordinate into a chunk coordinate and a local
    /// coordinate. Exact for negative coordinates: block x = -1 is local 15
    /// of chunk -1.
    #[inline]
    pub fn world_to_chunk(x: i32, z: i32) -> (Point2<i32>, i32, i32) {
        let chunk = Point2::new(x.div_euclid(CHUNK_DIMENSION), z.div_euclid(CHUNK_DIMENSION));
        (chunk, x.rem_euclid(CHUNK_DIMENSION), z.rem_euclid(CHUNK_DIMENSION))
    }

    /// A handle to the chunk at a chunk coordinate, if resident.
    pub fn get_chunk(&self, position: Point2<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&(position.x, position.y)).cloned()
    }

    /// Handles to the four edge-adjacent neighbors of a chunk position,
    /// ordered `[-x, +x, -z, +z]`.
    pub fn neighbor_chunks(&self, position: Point2<i32>) -> [Option<MtResource<Chunk>>; 4] {
        [
            self.get_chunk(Point2::new(position.x - 1, position.y)),
            self.get_chunk(Point2::new(position.x + 1, position.y)),
            self.get_chunk(Point2::new(position.x, position.y - 1)),
            self.get_chunk(Point2::new(position.x, position.y + 1)),
        ]
    }

    /// Whether a chunk is resident at the given chunk coordinate.
    pub fn is_loaded(&self, position: Point2<i32>) -> bool {
        self.chunks.contains_key(&(position.x, position.y))
    }

    /// Number of resident chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Cells per atlas edge the meshers should target.
    pub fn atlas_cells(&self) -> u32 {
        self.atlas_cells
    }

    /// Whether mesh builds should use the greedy mesher.
    pub fn greedy_meshing(&self) -> bool {
        self.greedy_meshing
    }

    /// The block id at a world coordinate.
    ///
    /// Total: positions in unloaded chunks and outside the vertical range
    /// read as air.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        if y < 0 || y >= CHUNK_HEIGHT {
            return BlockType::AIR.id();
        }
        let (chunk_pos, local_x, local_z) = Self::world_to_chunk(x, z);
        match self.get_chunk(chunk_pos) {
            Some(chunk) => chunk.get().get_block(local_x, y, local_z),
            None => BlockType::AIR.id(),
        }
    }

    /// O(1) solidity test at a world coordinate. Unloaded chunks are not
    /// solid, so physics never collides against terrain that has not
    /// generated yet.
    pub fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        if y < 0 || y >= CHUNK_HEIGHT {
            return false;
        }
        let (chunk_pos, local_x, local_z) = Self::world_to_chunk(x, z);
        match self.get_chunk(chunk_pos) {
            Some(chunk) => chunk.get().is_block_solid(local_x, y, local_z),
            None => false,
        }
    }

    /// Sky light at a world coordinate; unloaded chunks are fully lit.
    pub fn sky_light_at(&self, x: i32, y: i32, z: i32) -> u8 {
        let (chunk_pos, local_x, local_z) = Self::world_to_chunk(x, z);
        match self.get_chunk(chunk_pos) {
            Some(chunk) => chunk.get().sky_light(local_x, y, local_z),
            None => 15,
        }
    }

    /// Writes a block at a world coordinate.
    ///
    /// The owning chunk is marked dirty; a write on a chunk border also
    /// dirties the adjacent resident chunk so its frontier faces re-cull.
    ///
    /// # Errors
    /// [`WorldError::OutOfRange`] for `y` outside the world,
    /// [`WorldError::ChunkNotResident`] when the owning chunk is not loaded.
    pub fn set_block(&self, x: i32, y: i32, z: i32, id: BlockTypeSize) -> Result<(), WorldError> {
        if y < 0 || y >= CHUNK_HEIGHT {
            return Err(WorldError::OutOfRange { x, y, z });
        }
        let (chunk_pos, local_x, local_z) = Self::world_to_chunk(x, z);
        let chunk = self
            .get_chunk(chunk_pos)
            .ok_or(WorldError::ChunkNotResident {
                x: chunk_pos.x,
                z: chunk_pos.y,
            })?;
        chunk.get_mut().set_block(local_x, y, local_z, id)?;

        if local_x == 0 {
            self.mark_dirty(Point2::new(chunk_pos.x - 1, chunk_pos.y));
        }
        if local_x == CHUNK_DIMENSION - 1 {
            self.mark_dirty(Point2::new(chunk_pos.x + 1, chunk_pos.y));
        }
        if local_z == 0 {
            self.mark_dirty(Point2::new(chunk_pos.x, chunk_pos.y - 1));
        }
        if local_z == CHUNK_DIMENSION - 1 {
            self.mark_dirty(Point2::new(chunk_pos.x, chunk_pos.y + 1));
        }
        Ok(())
    }

    fn mark_dirty(&self, position: Point2<i32>) {
        if let Some(chunk) = self.get_chunk(position) {
            chunk.get_mut().dirty = true;
        }
    }

    /// Applies a cross-chunk structure write, or queues it until the target
    /// chunk loads. `replace_air_only` edits never clobber existing blocks.
    pub fn apply_edit(&mut self, edit: WorldEdit) {
        if edit.position.y < 0 || edit.position.y >= CHUNK_HEIGHT {
            return;
        }
        let (chunk_pos, local_x, local_z) = Self::world_to_chunk(edit.position.x, edit.position.z);
        match self.get_chunk(chunk_pos) {
            Some(chunk) => {
                let mut chunk = chunk.get_mut();
                if edit.replace_air_only
                    && chunk.get_block(local_x, edit.position.y, local_z) != BlockType::AIR.id()
                {
                    return;
                }
                // In-range by construction of world_to_chunk and the y check.
                let _ = chunk.set_block(local_x, edit.position.y, local_z, edit.block);
            }
            None => {
                self.pending_edits
                    .entry((chunk_pos.x, chunk_pos.y))
                    .or_default()
                    .push(edit);
            }
        }
    }

    /// Installs a freshly generated chunk and routes its cross-chunk edits.
    ///
    /// Generation results that arrive after the player has moved on are
    /// discarded rather than installed outside the load radius. Pending
    /// edits addressed to this chunk are drained into it before it becomes
    /// visible, and resident neighbors are dirtied so their frontier faces
    /// re-cull against real data.
    pub fn install_chunk(&mut self, chunk: Chunk, edits: Vec<WorldEdit>) {
        let position = chunk.position;
        self.in_flight.remove(&(position.x, position.y));

        if !self.in_radius(position) {
            debug!(
                "discarding generated chunk ({}, {}): outside load radius",
                position.x, position.y
            );
            return;
        }

        let mut chunk = chunk;
        self.drain_pending_edits(position, &mut chunk);

        self.chunks
            .insert((position.x, position.y), MtResource::new(chunk));

        for edit in edits {
            self.apply_edit(edit);
        }

        for neighbor in [
            Point2::new(position.x - 1, position.y),
            Point2::new(position.x + 1, position.y),
            Point2::new(position.x, position.y - 1),
            Point2::new(position.x, position.y + 1),
        ] {
            self.mark_dirty(neighbor);
        }
    }

    /// Drains queued edits addressed to a chunk position into the chunk,
    /// honoring `replace_air_only`. Runs both when a freshly generated chunk
    /// is installed and when an evicted chunk revives, so edits queued while
    /// the chunk was away are never lost.
    fn drain_pending_edits(&mut self, position: Point2<i32>, chunk: &mut Chunk) {
        let Some(pending) = self.pending_edits.remove(&(position.x, position.y)) else {
            return;
        };
        for edit in pending {
            let (_, local_x, local_z) = Self::world_to_chunk(edit.position.x, edit.position.z);
            if edit.replace_air_only
                && chunk.get_block(local_x, edit.position.y, local_z) != BlockType::AIR.id()
            {
                continue;
            }
            let _ = chunk.set_block(local_x, edit.position.y, local_z, edit.block);
        }
    }

    /// Whether a chunk coordinate lies within the load radius of the
    /// current center.
    pub fn in_radius(&self, position: Point2<i32>) -> bool {
        (position.x - self.center.x).abs() <= self.load_radius
            && (position.y - self.center.y).abs() <= self.load_radius
    }

    /// All chunk coordinates within `radius` of `center`, row-major.
    pub fn positions_in_radius(center: Point2<i32>, radius: i32) -> Vec<Point2<i32>> {
        let mut positions = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for z in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                positions.push(Point2::new(x, z));
            }
        }
        positions
    }

    /// Resident chunks within `radius` of `center`, for the renderer's
    /// per-frame walk. Chunks still generating are simply absent.
    pub fn chunks_in_radius(
        &self,
        center: Point2<i32>,
        radius: i32,
    ) -> Vec<(Point2<i32>, MtResource<Chunk>)> {
        Self::positions_in_radius(center, radius)
            .into_iter()
            .filter_map(|position| self.get_chunk(position).map(|chunk| (position, chunk)))
            .collect()
    }

    /// Moves the streaming center and reconciles residency.
    ///
    /// Chunks outside the new radius are evicted (geometry released, chunk
    /// parked in the LRU cache); missing chunks inside the radius are
    /// revived from the cache when possible. Returns the positions that
    /// need background generation, skipping any already in flight.
    pub fn update_loaded(&mut self, center: Point2<i32>) -> Vec<Point2<i32>> {
        self.center = center;

        let evict: Vec<(i32, i32)> = self
            .chunks
            .keys()
            .copied()
            .filter(|&(x, z)| !self.in_radius(Point2::new(x, z)))
            .collect();
        for key in evict {
            if let Some(chunk) = self.chunks.remove(&key) {
                chunk.get_mut().release_mesh();
                self.evicted.put(key, chunk);
            }
        }

        let mut to_generate = Vec::new();
        for position in Self::positions_in_radius(center, self.load_radius) {
            let key = (position.x, position.y);
            if self.chunks.contains_key(&key) || self.in_flight.contains(&key) {
                continue;
            }
            if let Some(chunk) = self.evicted.pop(&key) {
                {
                    let mut guard = chunk.get_mut();
                    guard.dirty = true;
                    self.drain_pending_edits(position, &mut guard);
                }
                self.chunks.insert(key, chunk);
                for neighbor in [
                    Point2::new(position.x - 1, position.y),
                    Point2::new(position.x + 1, position.y),
                    Point2::new(position.x, position.y - 1),
                    Point2::new(position.x, position.y + 1),
                ] {
                    self.mark_dirty(neighbor);
                }
                continue;
            }
            self.in_flight.insert(key);
            to_generate.push(position);
        }
        to_generate
    }

    /// Drains the dirty flags of resident chunks, returning the positions
    /// that need a mesh rebuild. An edit landing while a rebuild is running
    /// re-dirties the chunk, so a newer build always follows a stale one.
    pub fn take_dirty_chunks(&self) -> Vec<Point2<i32>> {
        let mut dirty = Vec::new();
        for chunk in self.chunks.values() {
            let mut chunk = chunk.get_mut();
            if chunk.dirty {
                chunk.dirty = false;
                dirty.push(chunk.position);
            }
        }
        dirty
    }

    /// The terrain generator, cloned so generation can run off the world
    /// lock.
    pub fn generator(&self) -> TerrainGenerator {
        self.generator.clone()
    }

    /// Casts a ray against the loaded terrain. See [`physics::raycast`].
    ///
    /// [`physics::raycast`]: crate::physics::raycast
    pub fn raycast(
        &self,
        origin: cgmath::Point3<f32>,
        direction: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<crate::physics::RaycastHit> {
        crate::physics::raycast(self, origin, direction, max_distance)
    }

    /// Moves a box through the loaded terrain, resolving collisions. See
    /// [`physics::resolve_collision`].
    ///
    /// [`physics::resolve_collision`]: crate::physics::resolve_collision
    pub fn resolve_collision(
        &self,
        aabb: &crate::physics::Aabb,
        velocity: cgmath::Vector3<f32>,
        dt: f32,
    ) -> crate::physics::CollisionResult {
        crate::physics::resolve_collision(self, aabb, velocity, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn test_world() -> World {
        World::new(&WorldConfig {
            seed: 1,
            load_radius: 2,
            ..WorldConfig::default()
        })
    }

    fn flat_chunk(position: Point2<i32>, surface: i32) -> Chunk {
        let mut chunk = Chunk::empty(position);
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                for y in 0..=surface {
                    chunk.set_block(x, y, z, BlockType::STONE.id()).unwrap();
                }
            }
        }
        chunk
    }

    #[test]
    fn world_to_chunk_handles_negative_coordinates() {
        let (chunk, x, z) = World::world_to_chunk(-1, -16);
        assert_eq!(chunk, Point2::new(-1, -1));
        assert_eq!((x, z), (15, 0));

        let (chunk, x, z) = World::world_to_chunk(17, 0);
        assert_eq!(chunk, Point2::new(1, 0));
        assert_eq!((x, z), (1, 0));
    }

    #[test]
    fn absent_chunks_read_as_air() {
        let world = test_world();
        assert_eq!(world.block_at(100, 50, 100), BlockType::AIR.id());
        assert!(!world.is_solid_at(100, 50, 100));
        assert_eq!(world.sky_light_at(100, 50, 100), 15);
    }

    #[test]
    fn set_block_requires_a_resident_chunk() {
        let mut world = test_world();
        assert_eq!(
            world.set_block(5, 10, 5, BlockType::STONE.id()),
            Err(WorldError::ChunkNotResident { x: 0, z: 0 })
        );

        world.install_chunk(Chunk::empty(Point2::new(0, 0)), Vec::new());
        world.set_block(5, 10, 5, BlockType::STONE.id()).unwrap();
        assert_eq!(world.block_at(5, 10, 5), BlockType::STONE.id());
        assert!(world.is_solid_at(5, 10, 5));
    }

    #[test]
    fn border_writes_dirty_the_neighbor() {
        let mut world = test_world();
        world.install_chunk(Chunk::empty(Point2::new(0, 0)), Vec::new());
        world.install_chunk(Chunk::empty(Point2::new(1, 0)), Vec::new());
        world.take_dirty_chunks();

        world.set_block(15, 10, 5, BlockType::STONE.id()).unwrap();
        let mut dirty = world.take_dirty_chunks();
        dirty.sort_by_key(|p| (p.x, p.y));
        assert_eq!(dirty, vec![Point2::new(0, 0), Point2::new(1, 0)]);
    }

    #[test]
    fn pending_edits_drain_into_late_chunks() {
        let mut world = test_world();
        world.apply_edit(WorldEdit {
            position: Point3::new(17, 80, 3),
            block: BlockType::LEAVES.id(),
            replace_air_only: true,
        });
        assert_eq!(world.block_at(17, 80, 3), BlockType::AIR.id());

        world.install_chunk(Chunk::empty(Point2::new(1, 0)), Vec::new());
        assert_eq!(world.block_at(17, 80, 3), BlockType::LEAVES.id());
    }

    #[test]
    fn replace_air_only_edits_never_clobber() {
        let mut world = test_world();
        world.install_chunk(Chunk::empty(Point2::new(0, 0)), Vec::new());
        world.set_block(3, 80, 3, BlockType::STONE.id()).unwrap();

        world.apply_edit(WorldEdit {
            position: Point3::new(3, 80, 3),
            block: BlockType::LEAVES.id(),
            replace_air_only: true,
        });
        assert_eq!(world.block_at(3, 80, 3), BlockType::STONE.id());

        world.apply_edit(WorldEdit {
            position: Point3::new(3, 80, 3),
            block: BlockType::WOOD.id(),
            replace_air_only: false,
        });
        assert_eq!(world.block_at(3, 80, 3), BlockType::WOOD.id());
    }

    #[test]
    fn out_of_radius_results_are_discarded() {
        let mut world = test_world();
        world.install_chunk(Chunk::empty(Point2::new(50, 50)), Vec::new());
        assert!(!world.is_loaded(Point2::new(50, 50)));
    }

    #[test]
    fn update_loaded_requests_missing_chunks_once() {
        let mut world = test_world();
        let first = world.update_loaded(Point2::new(0, 0));
        assert_eq!(first.len(), 25, "5x5 square at radius 2");

        let second = world.update_loaded(Point2::new(0, 0));
        assert!(second.is_empty(), "positions already in flight");
    }

    #[test]
    fn chunks_in_radius_skips_missing_chunks() {
        let mut world = test_world();
        world.install_chunk(Chunk::empty(Point2::new(0, 0)), Vec::new());
        world.install_chunk(Chunk::empty(Point2::new(1, 0)), Vec::new());

        let visible = world.chunks_in_radius(Point2::new(0, 0), 1);
        let mut positions: Vec<_> = visible.iter().map(|(p, _)| *p).collect();
        positions.sort_by_key(|p| (p.x, p.y));
        assert_eq!(positions, vec![Point2::new(0, 0), Point2::new(1, 0)]);
    }

    #[test]
    fn revived_chunks_drain_pending_edits() {
        let mut world = test_world();
        world.install_chunk(Chunk::empty(Point2::new(0, 0)), Vec::new());

        // Move far away so chunk (0,0) drops into the evicted cache, then
        // queue a canopy write addressed to it while it is away.
        world.update_loaded(Point2::new(100, 100));
        assert!(!world.is_loaded(Point2::new(0, 0)));
        world.apply_edit(WorldEdit {
            position: Point3::new(3, 80, 3),
            block: BlockType::LEAVES.id(),
            replace_air_only: true,
        });
        assert_eq!(world.block_at(3, 80, 3), BlockType::AIR.id());

        // Revival must apply the queued edit just like a fresh install.
        world.update_loaded(Point2::new(0, 0));
        assert!(world.is_loaded(Point2::new(0, 0)));
        assert_eq!(world.block_at(3, 80, 3), BlockType::LEAVES.id());
    }

    #[test]
    fn eviction_parks_chunks_for_revival() {
        let mut world = test_world();
        let chunk = flat_chunk(Point2::new(0, 0), 20);
        world.install_chunk(chunk, Vec::new());
        assert!(world.is_solid_at(5, 20, 5));

        // Move far away: chunk (0,0) leaves the radius.
        let requested = world.update_loaded(Point2::new(100, 100));
        assert!(!world.is_loaded(Point2::new(0, 0)));
        assert!(requested.contains(&Point2::new(100, 100)));

        // Move back: the chunk revives from the cache, not generation.
        let requested = world.update_loaded(Point2::new(0, 0));
        assert!(world.is_loaded(Point2::new(0, 0)));
        assert!(!requested.contains(&Point2::new(0, 0)));
        assert!(world.is_solid_at(5, 20, 5));
    }
}
