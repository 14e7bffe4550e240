//! # Block Module
//!
//! Block-type identifiers and the registry that maps them to their
//! properties. A voxel grid stores bare [`BlockId`]s; everything the mesher
//! needs to know about an id (solidity, per-face atlas textures) lives in the
//! [`BlockRegistry`] and is validated at the boundary, so unknown ids are
//! rejected when they enter the grid rather than deep inside a mesh build.

use num_derive::FromPrimitive;
use serde::Deserialize;

use super::error::VoxelError;
use block_side::BlockSide;

pub mod block_side;

/// The integer type used to store block types in the voxel grid.
/// Id `0` is always air.
pub type BlockId = u8;

/// The block id reserved for air (empty space).
pub const AIR: BlockId = 0;

/// The built-in block types used by the default registry.
///
/// The discriminants are the raw [`BlockId`] values; `FromPrimitive` allows
/// converting a stored id back into the rich enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockKind {
    /// Empty space; never solid, never meshed.
    AIR,

    /// The indestructible world floor.
    BEDROCK,

    /// Plain stone, the bulk of generated terrain.
    STONE,

    /// A grass block with a distinct top texture.
    GRASS,

    /// Sand.
    SAND,

    /// Dirt, found under the grass surface layer.
    DIRT,
}

impl BlockKind {
    /// Converts a raw grid id into a `BlockKind`, if it is one of the
    /// built-in types.
    pub fn from_id(id: BlockId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The raw id this kind is stored as in a voxel grid.
    pub fn id(self) -> BlockId {
        self as BlockId
    }
}

/// The properties of a single block type.
///
/// `face_textures` holds one atlas cell id per face, indexed in
/// [`BlockSide`] order: [back, front, top, bottom, left, right].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BlockDescriptor {
    /// Human-readable name, used only for logs and data files.
    pub name: String,
    /// Whether this block occludes neighboring faces and is meshed itself.
    pub is_solid: bool,
    /// Atlas cell id for each face, in [`BlockSide`] order.
    pub face_textures: [u32; 6],
}

impl BlockDescriptor {
    /// The atlas cell id for the given face of this block type.
    pub fn texture_id(&self, side: BlockSide) -> u32 {
        self.face_textures[side.index()]
    }
}

/// A validated lookup table from [`BlockId`] to [`BlockDescriptor`].
///
/// The id of a block is its position in the table. Construction enforces the
/// two structural invariants the rest of the crate relies on: the table is
/// non-empty, and id `0` (air) is not solid.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    descriptors: Vec<BlockDescriptor>,
}

impl BlockRegistry {
    /// Builds a registry from an ordered descriptor table.
    ///
    /// # Errors
    /// Returns [`VoxelError::InvalidRegistry`] if the table is empty or if
    /// entry `0` is marked solid.
    pub fn new(descriptors: Vec<BlockDescriptor>) -> Result<Self, VoxelError> {
        if descriptors.is_empty() {
            return Err(VoxelError::InvalidRegistry(
                "registry must contain at least the air entry".into(),
            ));
        }
        if descriptors[0].is_solid {
            return Err(VoxelError::InvalidRegistry(
                "block id 0 is air and must not be solid".into(),
            ));
        }
        Ok(BlockRegistry { descriptors })
    }

    /// Parses a registry from a JSON array of descriptors and validates it.
    ///
    /// # Errors
    /// Returns [`VoxelError::InvalidRegistry`] on malformed JSON or on a
    /// table that fails validation.
    pub fn from_json(json: &str) -> Result<Self, VoxelError> {
        let descriptors: Vec<BlockDescriptor> = serde_json::from_str(json)
            .map_err(|e| VoxelError::InvalidRegistry(e.to_string()))?;
        Self::new(descriptors)
    }

    /// The built-in block table covering every [`BlockKind`].
    pub fn default_blocks() -> Self {
        let block = |name: &str, is_solid, face_textures| BlockDescriptor {
            name: name.to_string(),
            is_solid,
            face_textures,
        };
        // Face texture order: back, front, top, bottom, left, right.
        BlockRegistry {
            descriptors: vec![
                block("air", false, [0, 0, 0, 0, 0, 0]),
                block("bedrock", true, [9, 9, 9, 9, 9, 9]),
                block("stone", true, [1, 1, 1, 1, 1, 1]),
                block("grass", true, [3, 3, 7, 2, 3, 3]),
                block("sand", true, [10, 10, 10, 10, 10, 10]),
                block("dirt", true, [2, 2, 2, 2, 2, 2]),
            ],
        }
    }

    /// Looks up the descriptor for a block id.
    ///
    /// # Errors
    /// Returns [`VoxelError::UnknownBlock`] for ids outside the table.
    pub fn get(&self, id: BlockId) -> Result<&BlockDescriptor, VoxelError> {
        self.descriptors
            .get(id as usize)
            .ok_or(VoxelError::UnknownBlock(id))
    }

    /// Whether the table contains the given id.
    pub fn contains(&self, id: BlockId) -> bool {
        (id as usize) < self.descriptors.len()
    }

    /// Solidity of a block id.
    ///
    /// # Errors
    /// Returns [`VoxelError::UnknownBlock`] for ids outside the table.
    pub fn is_solid(&self, id: BlockId) -> Result<bool, VoxelError> {
        Ok(self.get(id)?.is_solid)
    }

    /// The number of block types in the table.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the table is empty. Never true for a validated registry.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_air_is_not_solid() {
        let registry = BlockRegistry::default_blocks();
        assert!(!registry.is_solid(AIR).unwrap());
        assert!(registry.is_solid(BlockKind::STONE.id()).unwrap());
    }

    #[test]
    fn unknown_id_is_rejected() {
        let registry = BlockRegistry::default_blocks();
        assert_eq!(registry.get(250), Err(VoxelError::UnknownBlock(250)));
    }

    #[test]
    fn solid_air_fails_validation() {
        let result = BlockRegistry::new(vec![BlockDescriptor {
            name: "air".into(),
            is_solid: true,
            face_textures: [0; 6],
        }]);
        assert!(matches!(result, Err(VoxelError::InvalidRegistry(_))));
    }

    #[test]
    fn empty_table_fails_validation() {
        assert!(matches!(
            BlockRegistry::new(Vec::new()),
            Err(VoxelError::InvalidRegistry(_))
        ));
    }

    #[test]
    fn registry_parses_from_json() {
        let json = r#"[
            { "name": "air", "is_solid": false, "face_textures": [0, 0, 0, 0, 0, 0] },
            { "name": "stone", "is_solid": true, "face_textures": [1, 1, 1, 1, 1, 1] }
        ]"#;
        let registry = BlockRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(1));
        assert!(!registry.contains(2));
        assert_eq!(registry.get(1).unwrap().name, "stone");
        assert_eq!(
            registry.get(1).unwrap().texture_id(BlockSide::TOP),
            1
        );
    }

    #[test]
    fn block_kind_round_trips_through_id() {
        for kind in [
            BlockKind::AIR,
            BlockKind::BEDROCK,
            BlockKind::STONE,
            BlockKind::GRASS,
            BlockKind::SAND,
            BlockKind::DIRT,
        ] {
            assert_eq!(BlockKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(BlockKind::from_id(99), None);
    }

    #[test]
    fn grass_has_distinct_top_texture() {
        let registry = BlockRegistry::default_blocks();
        let grass = registry.get(BlockKind::GRASS.id()).unwrap();
        assert_ne!(
            grass.texture_id(BlockSide::TOP),
            grass.texture_id(BlockSide::LEFT)
        );
    }
}
