#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunks
//!
//! The voxel-chunk subsystem of a block-world renderer: a dense per-chunk
//! voxel grid, a face-culling mesher that converts solid voxels into
//! triangle geometry with texture-atlas UVs, and a cross-chunk edit protocol
//! that keeps neighboring chunks visually consistent at their shared
//! borders.
//!
//! ## Key Modules
//!
//! * `voxels` - Chunk storage, block types, the world boundary interface,
//!   and the terrain oracle
//! * `meshing` - Face-culled mesh construction and atlas UV mapping
//! * `core` - The shared chunk handle type
//!
//! ## Usage
//!
//! ```
//! use cgmath::Point3;
//! use voxel_chunks::voxels::block::{BlockKind, BlockRegistry};
//! use voxel_chunks::voxels::chunk::ChunkCoordinate;
//! use voxel_chunks::voxels::terrain::FlatTerrain;
//! use voxel_chunks::voxels::world::VoxelWorld;
//!
//! let world = VoxelWorld::new(
//!     BlockRegistry::default_blocks(),
//!     Box::new(FlatTerrain::new(4, BlockKind::STONE.id())),
//! );
//!
//! let chunk = world.create_chunk(ChunkCoordinate::new(0, 0), true).unwrap();
//! assert!(!chunk.get().mesh().is_empty());
//!
//! world
//!     .edit_voxel(Point3::new(8.0, 3.0, 8.0), BlockKind::AIR.id())
//!     .unwrap();
//! ```
//!
//! ## Scope
//!
//! The host rendering loop, persistence, and player logic are external
//! collaborators. A renderer consumes [`meshing::ChunkMesh`] (or its
//! interleaved [`meshing::MeshVertex`] buffer) and places it at the owning
//! chunk's anchor position; everything else it needs is behind the
//! [`voxels::world::ChunkWorld`] capability trait.

pub mod core;
pub mod meshing;
pub mod voxels;

pub use meshing::{ChunkMesh, MeshVertex, TextureAtlas};
pub use voxels::block::{BlockDescriptor, BlockId, BlockKind, BlockRegistry};
pub use voxels::chunk::{Chunk, ChunkCoordinate};
pub use voxels::error::VoxelError;
pub use voxels::world::{ChunkWorld, VoxelWorld};
