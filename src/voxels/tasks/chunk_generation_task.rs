//! # Chunk Generation Task
//!
//! Asynchronous terrain generation for one chunk position. Scheduled by the
//! streaming reconciliation whenever a position inside the load radius has
//! no resident chunk and nothing already in flight.

use cgmath::Point2;

use crate::core::MtResource;
use crate::meshing::tasks::remesh_tasks;
use crate::tasks::task::{Task, TaskResult};
use crate::voxels::chunk::Chunk;
use crate::voxels::generation::{TerrainGenerator, WorldEdit};
use crate::voxels::world::World;

/// Generates the chunk at one position on a worker thread.
///
/// The generator is cloned in up front so the whole terrain computation
/// runs without touching the world lock; only installation does.
pub struct ChunkGenerationTask {
    generator: TerrainGenerator,
    position: Point2<i32>,
}

impl ChunkGenerationTask {
    /// Creates a generation task for a chunk position, snapshotting the
    /// world's generator.
    pub fn new(world: &World, position: Point2<i32>) -> Self {
        ChunkGenerationTask {
            generator: world.generator(),
            position,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let (chunk, edits) = self.generator.generate(self.position);
        Box::new(ChunkGenerationTaskResult { chunk, edits })
    }
}

/// A generated chunk waiting to be installed.
pub struct ChunkGenerationTaskResult {
    chunk: Chunk,
    edits: Vec<WorldEdit>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Installs the chunk (the world discards it if the player has moved
    /// on) and schedules mesh rebuilds for every chunk the installation
    /// dirtied, the new chunk included.
    fn handle_result(self: Box<Self>, world: &MtResource<World>) -> Vec<Box<dyn Task + Send>> {
        world.get_mut().install_chunk(self.chunk, self.edits);
        remesh_tasks(world)
    }
}
