//! # Meshing Module
//!
//! Conversion of chunk block data into renderable geometry. The output of
//! this module is the boundary to the (external) graphics pipeline: one
//! interleaved vertex buffer and one index buffer per chunk, suitable for a
//! single draw call.
//!
//! ## Components
//!
//! * `vertex` - the GPU-facing interleaved vertex format
//! * `face` - quad bookkeeping and the merge primitives
//! * `mesh` - per-side assembly buffers and the final `ChunkMesh`
//! * `builder` - the face-culling baseline mesher
//! * `greedy` - optional coplanar-face merging on top of the same culling
//! * `tasks` - background mesh build jobs
//!
//! Vertex positions are chunk-local; the renderer offsets each chunk by its
//! chunk coordinate at draw time.

pub mod builder;
pub mod face;
pub mod greedy;
pub mod mesh;
pub mod tasks;
pub mod vertex;

pub use builder::{ChunkNeighborhood, MeshBuilder};
pub use mesh::{ChunkMesh, Mesh};
pub use vertex::Vertex;
