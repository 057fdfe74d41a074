//! # Voxel Core
//!
//! The voxel-world core: block definitions, chunk storage, procedural
//! generation, and the `World` that stitches chunks into one addressable
//! grid.
//!
//! ## Architecture
//!
//! * **Block**: block ids, faces, and the read-only capability registry
//! * **Chunk**: a fixed 16×256×16 flat block array, the unit of generation,
//!   meshing and loading
//! * **Generation**: deterministic seeded terrain population
//! * **World**: the chunk map, load radius, and the single query surface for
//!   cross-chunk block access
//! * **Tasks**: background chunk generation jobs
//!
//! ## Data Flow
//!
//! 1. World requests a chunk; a generation task fills it deterministically
//! 2. The completed chunk is installed on the draining thread, never partially
//! 3. Installation dirties edge-adjacent neighbors and schedules meshing
//! 4. Block edits through World re-dirty the owning chunk (and neighbors on
//!    borders) and trigger a rebuild

use thiserror::Error;

pub mod block;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;

/// Errors surfaced by chunk and world block mutation.
///
/// Reads are total functions and never produce these; only writes validate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A local block coordinate fell outside the chunk bounds.
    #[error("block coordinate ({x}, {y}, {z}) is outside the chunk bounds")]
    OutOfRange {
        /// Local x coordinate.
        x: i32,
        /// Local y coordinate.
        y: i32,
        /// Local z coordinate.
        z: i32,
    },

    /// A world-coordinate write targeted a chunk that is not resident.
    #[error("no resident chunk at chunk coordinate ({x}, {z})")]
    ChunkNotResident {
        /// Chunk x coordinate.
        x: i32,
        /// Chunk z coordinate.
        z: i32,
    },
}
