//! # Voxel Data Module
//!
//! Shared geometric constants for the voxel grid: chunk dimensions, the unit
//! cube corner positions, the per-face vertex-index table, and texture-atlas
//! sizing. Everything here is a fixed lookup table; the meshing code indexes
//! into these rather than computing face geometry on the fly.

use cgmath::Vector3;

/// The width and depth of a chunk in voxels.
pub const CHUNK_SIZE: usize = 16;

/// The height of a chunk in voxels. Chunks span the full world height, so
/// the chunk grid is two-dimensional (x, z).
pub const CHUNK_HEIGHT: usize = 128;

/// The number of texture cells per row of the texture atlas.
pub const TEXTURE_ATLAS_SIZE_IN_BLOCKS: u32 = 16;

/// The UV extent of a single atlas cell.
pub const NORMALIZED_BLOCK_TEXTURE_SIZE: f32 = 1.0 / TEXTURE_ATLAS_SIZE_IN_BLOCKS as f32;

/// The eight corner positions of a unit cube, in local voxel space.
///
/// The per-face vertex table ([`VOXEL_TRIANGLES`]) indexes into this array.
pub const VOXEL_VERTICES: [Vector3<f32>; 8] = [
    Vector3::new(0.0, 0.0, 0.0),
    Vector3::new(1.0, 0.0, 0.0),
    Vector3::new(1.0, 1.0, 0.0),
    Vector3::new(0.0, 1.0, 0.0),
    Vector3::new(0.0, 0.0, 1.0),
    Vector3::new(1.0, 0.0, 1.0),
    Vector3::new(1.0, 1.0, 1.0),
    Vector3::new(0.0, 1.0, 1.0),
];

/// For each of the six faces, the four corner indices into [`VOXEL_VERTICES`]
/// that make up the face quad.
///
/// Face order matches [`BlockSide::all`](super::block::block_side::BlockSide::all):
/// back, front, top, bottom, left, right. The four corners are listed so that
/// the two triangles `(0,1,2)` and `(2,1,3)` wind outward.
pub const VOXEL_TRIANGLES: [[usize; 4]; 6] = [
    [0, 3, 1, 2], // back   (-z)
    [5, 6, 4, 7], // front  (+z)
    [3, 7, 2, 6], // top    (+y)
    [1, 5, 0, 4], // bottom (-y)
    [4, 7, 0, 3], // left   (-x)
    [1, 2, 5, 6], // right  (+x)
];
