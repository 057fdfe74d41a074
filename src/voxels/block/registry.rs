//! # Block Registry
//!
//! The process-wide, read-only capability table for block types. Every
//! property a system needs (solidity for physics, opacity and atlas indices
//! for meshing, emission for lighting, tool category for interaction) lives
//! in one flat entry per block id. Lookup never fails: unknown ids resolve to
//! a placeholder entry so a single bad id cannot abort a chunk's mesh build.

use super::BlockTypeSize;

/// How a block interacts with light and neighboring faces.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transparency {
    /// No substance at all; never meshed, never occludes.
    Air,
    /// Fully opaque; hides any face it touches.
    Opaque,
    /// Solid-transparent (water, glass); faces against the same type are
    /// suppressed, faces against opaque blocks are drawn by the opaque side.
    Transparent,
}

/// The tool category that harvests a block fastest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToolKind {
    /// No particular tool.
    None,
    /// Stone-like blocks.
    Pickaxe,
    /// Soil-like blocks.
    Shovel,
    /// Wood-like blocks.
    Axe,
}

/// One registry entry: the full capability set of a block type.
///
/// Entries are constructed at compile time and are immutable for the life of
/// the process.
#[derive(Debug)]
pub struct BlockProperties {
    /// Human-readable name, for logs and debugging.
    pub name: &'static str,
    /// Whether the block participates in collision and raycast occupancy.
    pub solid: bool,
    /// Light/face interaction class.
    pub transparency: Transparency,
    /// Texture atlas cell per face, in `BlockSide` discriminant order
    /// `[FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]`.
    pub texture_indices: [u32; 6],
    /// Preferred harvesting tool.
    pub tool: ToolKind,
    /// Emitted light level, 0..=15.
    pub emission: u8,
}

impl BlockProperties {
    /// Whether this block fully occludes a neighboring face.
    pub fn is_opaque(&self) -> bool {
        self.transparency == Transparency::Opaque
    }
}

/// Atlas cell used when a block id has no registry entry.
pub const MISSING_TEXTURE_INDEX: u32 = 15;

/// Fallback entry for unknown block ids.
static PLACEHOLDER: BlockProperties = BlockProperties {
    name: "unknown",
    solid: true,
    transparency: Transparency::Opaque,
    texture_indices: [MISSING_TEXTURE_INDEX; 6],
    tool: ToolKind::None,
    emission: 0,
};

/// The block capability table, keyed by storage id.
static BLOCK_PROPERTIES: phf::Map<u8, BlockProperties> = phf::phf_map! {
    0u8 => BlockProperties {
        name: "air",
        solid: false,
        transparency: Transparency::Air,
        texture_indices: [0; 6],
        tool: ToolKind::None,
        emission: 0,
    },
    1u8 => BlockProperties {
        name: "stone",
        solid: true,
        transparency: Transparency::Opaque,
        texture_indices: [1, 1, 1, 1, 1, 1],
        tool: ToolKind::Pickaxe,
        emission: 0,
    },
    2u8 => BlockProperties {
        name: "dirt",
        solid: true,
        transparency: Transparency::Opaque,
        texture_indices: [2, 2, 2, 2, 2, 2],
        tool: ToolKind::Shovel,
        emission: 0,
    },
    3u8 => BlockProperties {
        name: "grass",
        solid: true,
        transparency: Transparency::Opaque,
        // Sides show grass-on-dirt, bottom plain dirt, top full grass.
        texture_indices: [3, 3, 2, 10, 3, 3],
        tool: ToolKind::Shovel,
        emission: 0,
    },
    4u8 => BlockProperties {
        name: "sand",
        solid: true,
        transparency: Transparency::Opaque,
        texture_indices: [4, 4, 4, 4, 4, 4],
        tool: ToolKind::Shovel,
        emission: 0,
    },
    5u8 => BlockProperties {
        name: "water",
        solid: false,
        transparency: Transparency::Transparent,
        texture_indices: [5, 5, 5, 5, 5, 5],
        tool: ToolKind::None,
        emission: 0,
    },
    6u8 => BlockProperties {
        name: "glass",
        solid: true,
        transparency: Transparency::Transparent,
        texture_indices: [6, 6, 6, 6, 6, 6],
        tool: ToolKind::None,
        emission: 0,
    },
    7u8 => BlockProperties {
        name: "wood",
        solid: true,
        transparency: Transparency::Opaque,
        // Bark on the sides, rings on top and bottom.
        texture_indices: [7, 7, 8, 8, 7, 7],
        tool: ToolKind::Axe,
        emission: 0,
    },
    8u8 => BlockProperties {
        name: "leaves",
        solid: true,
        transparency: Transparency::Opaque,
        texture_indices: [9, 9, 9, 9, 9, 9],
        tool: ToolKind::Axe,
        emission: 0,
    },
    9u8 => BlockProperties {
        name: "bedrock",
        solid: true,
        transparency: Transparency::Opaque,
        texture_indices: [10, 10, 10, 10, 10, 10],
        tool: ToolKind::None,
        emission: 0,
    },
};

/// Looks up the properties of a block id.
///
/// Total over all ids: unknown ids resolve to the placeholder entry rather
/// than failing, so callers in hot paths never need an error branch.
pub fn properties(id: BlockTypeSize) -> &'static BlockProperties {
    BLOCK_PROPERTIES.get(&id).unwrap_or(&PLACEHOLDER)
}
