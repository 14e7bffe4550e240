//! Chunk mesh construction.
//!
//! This module converts a populated voxel grid into a face-culled triangle
//! mesh. The builder visits every voxel in ascending (y, x, z) order and,
//! for each solid voxel, emits one quad per face whose neighbor is not
//! solid. Neighbors outside the chunk are resolved through the world's
//! global solidity query, which is what keeps faces at chunk borders
//! consistent with the adjacent chunk.
//!
//! The builder accumulates into its own buffers; the published [`ChunkMesh`]
//! is only produced once the full scan has succeeded.

use cgmath::{InnerSpace, Point3, Vector2, Vector3};

use super::atlas::TextureAtlas;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::chunk::Chunk;
use crate::voxels::error::VoxelError;
use crate::voxels::voxel_data::{CHUNK_HEIGHT, CHUNK_SIZE, VOXEL_TRIANGLES, VOXEL_VERTICES};
use crate::voxels::world::ChunkWorld;

/// A single interleaved vertex in the layout a renderer uploads to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local space.
    pub position: [f32; 3],
    /// Flat-averaged vertex normal.
    pub normal: [f32; 3],
    /// Texture-atlas UV coordinate.
    pub uv: [f32; 2],
}

/// A finished chunk mesh: parallel vertex/normal/uv buffers plus a flat
/// triangle index list (3 indices per triangle).
///
/// Invariants after any successful build:
/// `vertices.len() == uvs.len() == normals.len() == 4 * visible_faces` and
/// `triangles.len() == 6 * visible_faces`, with every index in `triangles`
/// below `vertices.len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex positions in chunk-local space.
    pub vertices: Vec<Point3<f32>>,
    /// One normal per vertex, recomputed from geometry.
    pub normals: Vec<Vector3<f32>>,
    /// Triangle vertex indices, stored flat.
    pub triangles: Vec<u32>,
    /// One atlas UV per vertex.
    pub uvs: Vec<Vector2<f32>>,
}

impl ChunkMesh {
    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The number of emitted quads.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Interleaves the parallel buffers into GPU-uploadable vertices.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        self.vertices
            .iter()
            .zip(self.normals.iter())
            .zip(self.uvs.iter())
            .map(|((position, normal), uv)| MeshVertex {
                position: [position.x, position.y, position.z],
                normal: [normal.x, normal.y, normal.z],
                uv: [uv.x, uv.y],
            })
            .collect()
    }

    /// Recomputes per-vertex normals by averaging the face normals of every
    /// triangle sharing the vertex.
    fn recalculate_normals(&mut self) {
        let mut normals = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];
        for triangle in self.triangles.chunks_exact(3) {
            let (a, b, c) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let face_normal =
                (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }
        for normal in &mut normals {
            if normal.magnitude2() > 0.0 {
                *normal = normal.normalize();
            }
        }
        self.normals = normals;
    }
}

/// Scratch buffers for one mesh build.
struct MeshBuilder {
    vertices: Vec<Point3<f32>>,
    triangles: Vec<u32>,
    uvs: Vec<Vector2<f32>>,
    vertex_index: u32,
    atlas: TextureAtlas,
}

impl MeshBuilder {
    fn new() -> Self {
        MeshBuilder {
            vertices: Vec::new(),
            triangles: Vec::new(),
            uvs: Vec::new(),
            vertex_index: 0,
            atlas: TextureAtlas::default(),
        }
    }

    /// Emits the quad for one visible face: 4 vertices from the per-face
    /// corner table, 2 triangles in `(0,1,2,2,1,3)` fan order, 4 atlas UVs.
    fn add_face(&mut self, local: Vector3<f32>, side: BlockSide, texture_id: u32) {
        for corner in VOXEL_TRIANGLES[side.index()] {
            self.vertices.push(Point3::new(
                VOXEL_VERTICES[corner].x + local.x,
                VOXEL_VERTICES[corner].y + local.y,
                VOXEL_VERTICES[corner].z + local.z,
            ));
        }
        self.uvs.extend(self.atlas.face_uvs(texture_id));

        self.triangles.push(self.vertex_index);
        self.triangles.push(self.vertex_index + 1);
        self.triangles.push(self.vertex_index + 2);
        self.triangles.push(self.vertex_index + 2);
        self.triangles.push(self.vertex_index + 1);
        self.triangles.push(self.vertex_index + 3);
        self.vertex_index += 4;
    }

    fn finish(self) -> ChunkMesh {
        let mut mesh = ChunkMesh {
            vertices: self.vertices,
            normals: Vec::new(),
            triangles: self.triangles,
            uvs: self.uvs,
        };
        mesh.recalculate_normals();
        mesh
    }
}

/// Builds a face-culled mesh for the chunk's current voxel grid.
///
/// Visits voxels in ascending (y, x, z) order so output is deterministic:
/// rebuilding an unchanged grid produces an identical mesh.
///
/// # Errors
/// Returns [`VoxelError::UnknownBlock`] if a solid grid cell holds an id the
/// registry does not know. No partial mesh is returned on error.
pub fn build_chunk_mesh(
    chunk: &Chunk,
    world: &dyn ChunkWorld,
) -> Result<ChunkMesh, VoxelError> {
    let mut builder = MeshBuilder::new();

    for y in 0..CHUNK_HEIGHT {
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                if !chunk.is_solid_local(x, y, z) {
                    continue;
                }
                let descriptor = world.blocks().get(chunk.voxel(x, y, z))?;
                let local = Vector3::new(x as i32, y as i32, z as i32);
                for side in BlockSide::all() {
                    if chunk.is_solid_at(local + side.offset(), world) {
                        continue;
                    }
                    builder.add_face(
                        Vector3::new(x as f32, y as f32, z as f32),
                        side,
                        descriptor.texture_id(side),
                    );
                }
            }
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MtResource;
    use crate::voxels::block::{BlockKind, BlockRegistry};
    use crate::voxels::chunk::ChunkCoordinate;
    use std::collections::HashSet;

    /// A minimal world with a fixed set of solid stone cells and no chunk
    /// registry, so border queries resolve against the oracle alone.
    struct FixedWorld {
        blocks: BlockRegistry,
        solids: HashSet<(i32, i32, i32)>,
    }

    impl FixedWorld {
        fn new(solids: &[(i32, i32, i32)]) -> Self {
            FixedWorld {
                blocks: BlockRegistry::default_blocks(),
                solids: solids.iter().copied().collect(),
            }
        }
    }

    impl ChunkWorld for FixedWorld {
        fn blocks(&self) -> &BlockRegistry {
            &self.blocks
        }

        fn voxel_at(&self, pos: Point3<f32>) -> u8 {
            let key = (
                pos.x.floor() as i32,
                pos.y.floor() as i32,
                pos.z.floor() as i32,
            );
            if self.solids.contains(&key) {
                BlockKind::STONE.id()
            } else {
                BlockKind::AIR.id()
            }
        }

        fn is_voxel_solid(&self, pos: Point3<f32>) -> bool {
            self.voxel_at(pos) != BlockKind::AIR.id()
        }

        fn chunk_at(&self, _pos: Point3<f32>) -> Option<MtResource<Chunk>> {
            None
        }
    }

    fn populated_chunk(world: &FixedWorld) -> Chunk {
        let mut chunk = Chunk::new(ChunkCoordinate::new(0, 0));
        chunk.populate_voxel_map(world).unwrap();
        chunk
    }

    #[test]
    fn lone_voxel_emits_six_faces() {
        let world = FixedWorld::new(&[(5, 10, 5)]);
        let chunk = populated_chunk(&world);
        let mesh = build_chunk_mesh(&chunk, &world).unwrap();

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.uvs.len(), 24);
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.triangles.len(), 36);
        let max = *mesh.triangles.iter().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn touching_faces_are_culled() {
        let world = FixedWorld::new(&[(5, 10, 5), (6, 10, 5)]);
        let chunk = populated_chunk(&world);
        let mesh = build_chunk_mesh(&chunk, &world).unwrap();

        // Two cubes sharing one face: 12 faces minus the 2 hidden ones.
        assert_eq!(mesh.face_count(), 10);
        assert_eq!(mesh.vertices.len(), 40);
        assert_eq!(mesh.triangles.len(), 60);
        assert_eq!(mesh.uvs.len(), 40);
    }

    #[test]
    fn border_face_is_culled_against_the_world() {
        // Solid at the +x border of chunk (0,0) and its out-of-chunk
        // neighbor; the oracle answers the border query.
        let world = FixedWorld::new(&[(15, 10, 5), (16, 10, 5)]);
        let chunk = populated_chunk(&world);
        let mesh = build_chunk_mesh(&chunk, &world).unwrap();

        // Only (15,10,5) is inside the chunk; its +x face is hidden.
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn rebuilding_an_unchanged_grid_is_idempotent() {
        let world = FixedWorld::new(&[(3, 40, 3), (3, 41, 3), (8, 0, 8)]);
        let chunk = populated_chunk(&world);
        let first = build_chunk_mesh(&chunk, &world).unwrap();
        let second = build_chunk_mesh(&chunk, &world).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lone_voxel_top_face_points_up() {
        let world = FixedWorld::new(&[(5, 10, 5)]);
        let chunk = populated_chunk(&world);
        let mesh = build_chunk_mesh(&chunk, &world).unwrap();

        // Face emission order is BlockSide::all(); the top face is third,
        // so its four vertices start at index 8.
        for i in 8..12 {
            assert_eq!(mesh.normals[i], Vector3::new(0.0, 1.0, 0.0));
        }
        // Bottom face is fourth.
        for i in 12..16 {
            assert_eq!(mesh.normals[i], Vector3::new(0.0, -1.0, 0.0));
        }
    }

    #[test]
    fn interleaved_buffer_matches_vertex_count() {
        let world = FixedWorld::new(&[(1, 1, 1)]);
        let chunk = populated_chunk(&world);
        let mesh = build_chunk_mesh(&chunk, &world).unwrap();
        let interleaved = mesh.interleaved();
        assert_eq!(interleaved.len(), mesh.vertices.len());
        // First face is BACK; its first corner is the voxel's min corner.
        assert_eq!(interleaved[0].position, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_grid_produces_empty_mesh() {
        let world = FixedWorld::new(&[]);
        let chunk = populated_chunk(&world);
        let mesh = build_chunk_mesh(&chunk, &world).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.triangles.is_empty());
    }
}
