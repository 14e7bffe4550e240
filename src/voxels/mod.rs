//! # Voxel Core
//!
//! This module contains the core voxel-grid functionality: representing,
//! populating, and editing a chunked block world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block-type identifiers and the validated registry of their
//!   properties (solidity, per-face atlas textures)
//! * **Chunk**: A fixed-size dense grid of block ids, the unit of meshing
//!   and editing
//! * **World**: The boundary interface chunks see past their own bounds
//!   through, plus the in-memory chunk registry implementing it
//! * **Terrain**: The generation oracle and its biome/lode parameter tables
//!
//! ## Data Flow
//!
//! 1. The world creates a chunk for a coordinate
//! 2. The chunk fills its grid by querying the terrain oracle per cell
//! 3. The meshing module converts the grid into culled geometry
//! 4. Point edits rewrite one cell and trigger rebuilds of the edited chunk
//!    and any neighbor sharing the edited border
//!
//! ## Thread Safety
//!
//! Chunks are shared as [`crate::core::MtResource`] handles. Operations on
//! one chunk are serialized through its lock; the world layer orders
//! cross-chunk rebuilds so no chunk's lock is held while a neighbor queries
//! back across the border.

pub mod block;
pub mod chunk;
pub mod error;
pub mod terrain;
pub mod voxel_data;
pub mod world;
