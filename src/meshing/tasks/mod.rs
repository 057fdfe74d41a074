//! Background mesh build jobs.

pub mod chunk_mesh_generation_task;

pub use chunk_mesh_generation_task::ChunkMeshGenerationTask;

use crate::core::MtResource;
use crate::tasks::task::Task;
use crate::voxels::world::World;

/// Drains the world's dirty chunks into mesh rebuild tasks.
///
/// Dirty flags are cleared as part of the drain; a chunk edited while its
/// rebuild runs goes dirty again and is picked up by the next drain.
pub fn remesh_tasks(world: &MtResource<World>) -> Vec<Box<dyn Task + Send>> {
    let dirty = world.get().take_dirty_chunks();
    dirty
        .into_iter()
        .map(|position| {
            Box::new(ChunkMeshGenerationTask::new(world.clone(), position))
                as Box<dyn Task + Send>
        })
        .collect()
}
