//! Error taxonomy for voxel-grid and meshing operations.
//!
//! Failures here indicate programming or data errors, not transient
//! conditions; callers are expected to surface them rather than retry.

use thiserror::Error;

use super::block::BlockId;
use super::chunk::ChunkCoordinate;

/// Errors produced by chunk population, meshing, and edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoxelError {
    /// A local voxel index fell outside the chunk grid. Raised by edits and
    /// global voxel reads whose position is not inside the chunk footprint.
    #[error("voxel index ({x}, {y}, {z}) is outside the chunk bounds")]
    OutOfBounds {
        /// Local x index that was computed.
        x: i32,
        /// Local y index that was computed.
        y: i32,
        /// Local z index that was computed.
        z: i32,
    },

    /// A block-type id not present in the block registry.
    #[error("unknown block id {0}")]
    UnknownBlock(BlockId),

    /// The chunk owning a world position is not currently loaded.
    #[error("no loaded chunk at coordinate {0:?}")]
    ChunkNotLoaded(ChunkCoordinate),

    /// A mesh rebuild or edit was requested before the voxel map was
    /// populated from the terrain oracle.
    #[error("chunk {0:?} has no populated voxel map")]
    NotPopulated(ChunkCoordinate),

    /// A block registry failed structural validation.
    #[error("invalid block registry: {0}")]
    InvalidRegistry(String),
}
