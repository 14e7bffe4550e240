//! # Meshing Module
//!
//! Conversion of voxel grids into renderable geometry: the face-culling mesh
//! builder and the texture-atlas UV mapping it emits coordinates from.

pub mod atlas;
pub mod mesh;

pub use atlas::TextureAtlas;
pub use mesh::{build_chunk_mesh, ChunkMesh, MeshVertex};
