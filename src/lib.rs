#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The simulation core of a voxel world: chunked block storage, seeded
//! procedural terrain, chunk meshing, grid physics and background
//! streaming. Rendering is deliberately out of scope; the meshers emit
//! upload-ready vertex and index buffers and stop there.
//!
//! ## Key Modules
//!
//! * `voxels` - blocks, chunks, terrain generation and the `World`
//! * `meshing` - face-culling and greedy geometry builders
//! * `physics` - swept AABB collision and block raycasting
//! * `tasks` - the worker pool that runs generation and meshing
//! * `config` - JSON-backed world settings
//! * `core` - shared concurrency primitives
//!
//! ## Driving the world
//!
//! The world lives in an [`core::MtResource`] shared with a
//! [`tasks::TaskManager`]. Each beat of the driving loop moves the
//! streaming center, publishes generation tasks for the positions the
//! world requests, and ticks the manager so finished chunks install and
//! chain into mesh rebuilds:
//!
//! ```no_run
//! use cgmath::Point2;
//! use voxel_world::config::WorldConfig;
//! use voxel_world::core::MtResource;
//! use voxel_world::tasks::TaskManager;
//! use voxel_world::voxels::tasks::ChunkGenerationTask;
//! use voxel_world::voxels::world::World;
//!
//! let config = WorldConfig::default();
//! let world = MtResource::new(World::new(&config));
//! let mut tasks = TaskManager::new(config.worker_threads, world.clone());
//!
//! loop {
//!     let wanted = world.get_mut().update_loaded(Point2::new(0, 0));
//!     for position in wanted {
//!         tasks.publish_task(Box::new(ChunkGenerationTask::new(&world.get(), position)));
//!     }
//!     tasks.tick();
//! }
//! ```

pub mod config;
pub mod core;
pub mod meshing;
pub mod physics;
pub mod tasks;
pub mod voxels;

/// Initializes logging from the `RUST_LOG` environment variable.
///
/// Call once at startup; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
