//! Background jobs owned by the voxel core.

pub mod chunk_generation_task;

pub use chunk_generation_task::ChunkGenerationTask;
