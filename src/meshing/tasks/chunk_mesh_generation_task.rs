//! # Chunk Mesh Generation Task
//!
//! Rebuilds one chunk's geometry on a worker thread. The world lock is held
//! only long enough to clone the chunk handles; the actual build reads the
//! chunks through their own locks, and installation happens back on the
//! driving thread so a chunk's mesh never changes out from under a frame.

use cgmath::Point2;
use log::debug;

use crate::core::MtResource;
use crate::meshing::builder::{ChunkNeighborhood, MeshBuilder};
use crate::meshing::greedy::GreedyMesher;
use crate::meshing::mesh::ChunkMesh;
use crate::tasks::task::{Task, TaskResult};
use crate::voxels::chunk::GenerationState;
use crate::voxels::world::World;

/// Builds the mesh for the chunk at one position.
pub struct ChunkMeshGenerationTask {
    world: MtResource<World>,
    position: Point2<i32>,
}

impl ChunkMeshGenerationTask {
    /// Creates a mesh build task for a chunk position.
    pub fn new(world: MtResource<World>, position: Point2<i32>) -> Self {
        ChunkMeshGenerationTask { world, position }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let (center, neighbors, atlas_cells, greedy) = {
            let world = self.world.get();
            match world.get_chunk(self.position) {
                Some(center) => (
                    center,
                    world.neighbor_chunks(self.position),
                    world.atlas_cells(),
                    world.greedy_meshing(),
                ),
                None => {
                    return Box::new(ChunkMeshGenerationTaskResult {
                        position: self.position,
                        mesh: None,
                    })
                }
            }
        };

        let center = center.get();
        let neg_x = neighbors[0].as_ref().map(|chunk| chunk.get());
        let pos_x = neighbors[1].as_ref().map(|chunk| chunk.get());
        let neg_z = neighbors[2].as_ref().map(|chunk| chunk.get());
        let pos_z = neighbors[3].as_ref().map(|chunk| chunk.get());
        let neighborhood = ChunkNeighborhood {
            center: &center,
            neg_x: neg_x.as_deref(),
            pos_x: pos_x.as_deref(),
            neg_z: neg_z.as_deref(),
            pos_z: pos_z.as_deref(),
        };

        let mesh = if greedy {
            GreedyMesher.build(&neighborhood)
        } else {
            MeshBuilder::new(atlas_cells).build(&neighborhood)
        };

        Box::new(ChunkMeshGenerationTaskResult {
            position: self.position,
            mesh: Some(mesh.into_chunk_mesh()),
        })
    }
}

/// A finished geometry buffer waiting to be installed on its chunk.
pub struct ChunkMeshGenerationTaskResult {
    position: Point2<i32>,
    mesh: Option<ChunkMesh>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Installs the mesh, unless the chunk was evicted while the build ran.
    fn handle_result(self: Box<Self>, world: &MtResource<World>) -> Vec<Box<dyn Task + Send>> {
        if let Some(mesh) = self.mesh {
            match world.get().get_chunk(self.position) {
                Some(chunk) => {
                    let mut chunk = chunk.get_mut();
                    chunk.mesh = Some(mesh);
                    chunk.state = GenerationState::Meshed;
                }
                None => {
                    debug!(
                        "discarding mesh for evicted chunk ({}, {})",
                        self.position.x, self.position.y
                    );
                }
            }
        }
        Vec::new()
    }
}
