//! # Block Module
//!
//! Block-level building blocks of the voxel world: the block type enum, the
//! six block faces, and the process-wide capability registry.
//!
//! Block state in chunk storage is a bare id (`BlockTypeSize`); everything a
//! system needs to know about a block (solidity, opacity, atlas indices,
//! tool category, light emission) is looked up from the read-only registry
//! rather than dispatched through per-block objects.

pub mod block_side;
pub mod block_type;
pub mod registry;

pub use block_side::BlockSide;
pub use block_type::BlockType;
pub use registry::{properties, BlockProperties, ToolKind, Transparency};

/// The underlying integer type used to represent block types in chunk storage.
pub type BlockTypeSize = u8;
