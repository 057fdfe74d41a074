//! # Block Type Module
//!
//! Defines the block type ids of the voxel world and conversion between the
//! compact storage integer and the rich enum type.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all block types in the voxel world.
///
/// The discriminant doubles as the storage id in chunk block arrays and as
/// the key into the block property registry. `FromPrimitive` allows recovery
/// of the enum from a stored id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, non-solid and invisible.
    AIR,

    /// Raw stone, the bulk of underground terrain.
    STONE,

    /// Dirt, the thin layer beneath grassy surfaces.
    DIRT,

    /// A grass block with distinct top, side and bottom textures.
    GRASS,

    /// Sand found along shorelines.
    SAND,

    /// Water, non-solid and transparent.
    WATER,

    /// Glass, solid but transparent.
    GLASS,

    /// Tree-trunk wood.
    WOOD,

    /// Tree canopy leaves.
    LEAVES,

    /// The unbreakable world floor.
    BEDROCK,
}

impl BlockType {
    /// Converts a stored id back to a `BlockType`.
    ///
    /// Returns `None` for ids with no registered block type; callers that
    /// need a total function should go through the registry, which falls
    /// back to a placeholder entry.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The compact storage id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for ty in [
            BlockType::AIR,
            BlockType::STONE,
            BlockType::WATER,
            BlockType::BEDROCK,
        ] {
            assert_eq!(BlockType::from_id(ty.id()), Some(ty));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(BlockType::from_id(200), None);
    }
}
