//! # Chunk Module
//!
//! This module provides the `Chunk` struct and the `ChunkCoordinate` address
//! type for managing `CHUNK_SIZE x CHUNK_HEIGHT x CHUNK_SIZE` blocks of voxel
//! data. A chunk is the unit of meshing: it owns a dense grid of block ids,
//! converts it into a face-culled triangle mesh, and supports point edits
//! that keep neighboring chunks consistent across the shared border.
//!
//! ## Storage
//!
//! Two parallel structures are kept per chunk:
//! - `voxel_map`: the dense grid of [`BlockId`]s, the source of truth
//! - `solid_mask`: a bit vector (1 bit per voxel) caching each block's
//!   solidity so the per-face culling loop does not consult the block
//!   registry for every neighbor check
//!
//! The mask is maintained alongside the grid on population and on edits.
//!
//! ## Mesh publication
//!
//! Mesh rebuilds accumulate into fresh buffers and replace the published
//! [`ChunkMesh`] only once the scan has completed. A failed rebuild leaves
//! the previously published mesh untouched, so a renderer never observes a
//! partial mesh.

use bitvec::prelude::BitVec;
use cgmath::{Point3, Vector3};
use log::{debug, trace};

use super::block::block_side::BlockSide;
use super::block::{BlockId, BlockRegistry};
use super::error::VoxelError;
use super::voxel_data::{CHUNK_HEIGHT, CHUNK_SIZE};
use super::world::ChunkWorld;
use crate::meshing::{build_chunk_mesh, ChunkMesh};

/// Identifies a chunk's position on the 2D chunk grid.
///
/// Derived from a world position by floor-dividing the floored (x, z) by
/// [`CHUNK_SIZE`]. Floor division is used deliberately so that negative world
/// coordinates map to the correct chunk; truncating division would mis-map
/// everything in `(-CHUNK_SIZE, 0)` to chunk 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoordinate {
    /// Chunk-grid x component.
    pub x: i32,
    /// Chunk-grid z component.
    pub z: i32,
}

impl ChunkCoordinate {
    /// Creates a coordinate from chunk-grid components.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoordinate { x, z }
    }

    /// Derives the coordinate of the chunk containing a world position.
    pub fn from_world_position(pos: Point3<f32>) -> Self {
        let size = CHUNK_SIZE as i32;
        ChunkCoordinate {
            x: (pos.x.floor() as i32).div_euclid(size),
            z: (pos.z.floor() as i32).div_euclid(size),
        }
    }

    /// The world-space anchor of this chunk: its minimum corner, at y = 0.
    pub fn anchor(&self) -> Point3<f32> {
        Point3::new(
            (self.x * CHUNK_SIZE as i32) as f32,
            0.0,
            (self.z * CHUNK_SIZE as i32) as f32,
        )
    }
}

/// A fixed-size cuboid region of the voxel world, the unit of meshing.
///
/// A chunk is created with a coordinate and later populated from the world's
/// terrain oracle, either eagerly at creation or lazily. Deactivating a chunk
/// does not discard the voxel grid, so reactivation republishes the prior
/// mesh without re-querying the oracle.
pub struct Chunk {
    /// The chunk-grid address of this chunk.
    pub coord: ChunkCoordinate,

    /// Dense grid of block ids, indexed z-innermost then x then y.
    voxel_map: Vec<BlockId>,

    /// One bit per voxel: whether that block is solid. Kept in sync with
    /// `voxel_map` so face culling never consults the registry per neighbor.
    solid_mask: BitVec,

    /// The last fully built mesh. Empty until the first rebuild completes.
    mesh: ChunkMesh,

    /// World-space anchor position of the chunk's minimum corner.
    position: Point3<f32>,

    is_active: bool,
    is_voxel_map_populated: bool,
}

impl Chunk {
    const VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT;

    /// Creates an unpopulated chunk at the given coordinate.
    ///
    /// The grid is all air until [`Chunk::populate_voxel_map`] runs; meshing
    /// or editing before that is rejected with [`VoxelError::NotPopulated`].
    pub fn new(coord: ChunkCoordinate) -> Self {
        Chunk {
            coord,
            voxel_map: vec![0; Self::VOLUME],
            solid_mask: BitVec::repeat(false, Self::VOLUME),
            mesh: ChunkMesh::default(),
            position: coord.anchor(),
            is_active: true,
            is_voxel_map_populated: false,
        }
    }

    /// Populates the voxel grid and builds the first mesh.
    ///
    /// # Errors
    /// Fails if the oracle produces an id unknown to the world's block
    /// registry; in that case neither the grid nor the mesh is published.
    pub fn init(&mut self, world: &dyn ChunkWorld) -> Result<(), VoxelError> {
        self.populate_voxel_map(world)?;
        self.rebuild_mesh(world)
    }

    /// Fills the grid by querying the terrain oracle for every local cell.
    ///
    /// The pass covers the full grid before anything is published: the grid
    /// and solidity mask are built into fresh buffers and swapped in only on
    /// success, so a failing oracle id never leaves a half-written grid.
    ///
    /// # Errors
    /// Returns [`VoxelError::UnknownBlock`] if the oracle returns an id
    /// outside the block registry.
    pub fn populate_voxel_map(&mut self, world: &dyn ChunkWorld) -> Result<(), VoxelError> {
        let mut voxel_map = Vec::with_capacity(Self::VOLUME);
        let mut solid_mask = BitVec::with_capacity(Self::VOLUME);
        let mut solid_count = 0usize;

        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    let pos = self.position
                        + Vector3::new(x as f32, y as f32, z as f32);
                    let id = world.voxel_at(pos);
                    let is_solid = world.blocks().is_solid(id)?;
                    voxel_map.push(id);
                    solid_mask.push(is_solid);
                    solid_count += is_solid as usize;
                }
            }
        }

        self.voxel_map = voxel_map;
        self.solid_mask = solid_mask;
        self.is_voxel_map_populated = true;
        debug!(
            "populated chunk ({}, {}): {} solid voxels",
            self.coord.x, self.coord.z, solid_count
        );
        Ok(())
    }

    /// Rebuilds and publishes this chunk's mesh from the current grid.
    ///
    /// Also invoked by the world when a neighboring chunk edits a cell on
    /// the shared border, since this chunk's face visibility near the border
    /// depends on that cell.
    ///
    /// # Errors
    /// Returns [`VoxelError::NotPopulated`] if the grid was never populated,
    /// or [`VoxelError::UnknownBlock`] if a grid cell holds an id outside
    /// the registry. On error the published mesh is left unchanged.
    pub fn rebuild_mesh(&mut self, world: &dyn ChunkWorld) -> Result<(), VoxelError> {
        if !self.is_voxel_map_populated {
            return Err(VoxelError::NotPopulated(self.coord));
        }
        let mesh = build_chunk_mesh(&*self, world)?;
        trace!(
            "rebuilt chunk ({}, {}): {} vertices, {} triangles",
            self.coord.x,
            self.coord.z,
            mesh.vertices.len(),
            mesh.triangles.len() / 3
        );
        self.mesh = mesh;
        Ok(())
    }

    /// The last fully built mesh for this chunk.
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Whether local indices fall inside the chunk grid.
    pub fn is_voxel_in_chunk(x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && x < CHUNK_SIZE as i32
            && y >= 0
            && y < CHUNK_HEIGHT as i32
            && z >= 0
            && z < CHUNK_SIZE as i32
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        z + CHUNK_SIZE * (x + CHUNK_SIZE * y)
    }

    /// The block id at a local grid cell. Callers must pass in-bounds indices.
    pub(crate) fn voxel(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.voxel_map[Self::index(x, y, z)]
    }

    /// Whether the local grid cell holds a solid block.
    pub(crate) fn is_solid_local(&self, x: usize, y: usize, z: usize) -> bool {
        self.solid_mask[Self::index(x, y, z)]
    }

    /// Face-visibility solidity check for a (possibly out-of-bounds) local
    /// position.
    ///
    /// In-bounds positions are answered from the local solidity mask.
    /// Positions outside the grid are delegated to the world's global
    /// solidity query at the corresponding world position; that is how
    /// face culling at chunk borders is resolved.
    pub fn is_solid_at(&self, local: Vector3<i32>, world: &dyn ChunkWorld) -> bool {
        if !Self::is_voxel_in_chunk(local.x, local.y, local.z) {
            return world.is_voxel_solid(self.world_position_of(local));
        }
        self.is_solid_local(local.x as usize, local.y as usize, local.z as usize)
    }

    /// Reads the block id at a world position inside this chunk.
    ///
    /// # Errors
    /// Returns [`VoxelError::OutOfBounds`] if the position is not within
    /// this chunk's footprint and height range.
    pub fn voxel_from_global_position(&self, pos: Point3<f32>) -> Result<BlockId, VoxelError> {
        let (x, y, z) = self.local_from_global(pos)?;
        Ok(self.voxel(x, y, z))
    }

    /// Reads the solidity of the voxel at a world position inside this chunk.
    ///
    /// # Errors
    /// Returns [`VoxelError::OutOfBounds`] if the position is not within
    /// this chunk's footprint and height range.
    pub fn is_voxel_solid_global(&self, pos: Point3<f32>) -> Result<bool, VoxelError> {
        let (x, y, z) = self.local_from_global(pos)?;
        Ok(self.is_solid_local(x, y, z))
    }

    /// Overwrites a single grid cell with a new block id.
    ///
    /// This is the chunk-local half of the edit protocol: it validates and
    /// writes the cell, then reports the world positions of the edited
    /// cell's face neighbors that fall outside this chunk. The world manager
    /// rebuilds those neighbor chunks and then this chunk, in that order,
    /// taking each chunk's lock in its own scope.
    ///
    /// # Errors
    /// Returns [`VoxelError::NotPopulated`] before population,
    /// [`VoxelError::UnknownBlock`] for ids outside the registry, and
    /// [`VoxelError::OutOfBounds`] for positions outside this chunk.
    pub fn edit_voxel(
        &mut self,
        pos: Point3<f32>,
        id: BlockId,
        blocks: &BlockRegistry,
    ) -> Result<Vec<Point3<f32>>, VoxelError> {
        if !self.is_voxel_map_populated {
            return Err(VoxelError::NotPopulated(self.coord));
        }
        let is_solid = blocks.is_solid(id)?;
        let (x, y, z) = self.local_from_global(pos)?;

        let index = Self::index(x, y, z);
        self.voxel_map[index] = id;
        self.solid_mask.set(index, is_solid);

        let local = Vector3::new(x as i32, y as i32, z as i32);
        let mut border_neighbors = Vec::new();
        for side in BlockSide::all() {
            let neighbor = local + side.offset();
            if !Self::is_voxel_in_chunk(neighbor.x, neighbor.y, neighbor.z) {
                border_neighbors.push(self.world_position_of(neighbor));
            }
        }
        Ok(border_neighbors)
    }

    /// Converts a local position (in-bounds or not) to world space.
    fn world_position_of(&self, local: Vector3<i32>) -> Point3<f32> {
        self.position + Vector3::new(local.x as f32, local.y as f32, local.z as f32)
    }

    fn local_from_global(&self, pos: Point3<f32>) -> Result<(usize, usize, usize), VoxelError> {
        let x = (pos.x.floor() as i32) - self.coord.x * CHUNK_SIZE as i32;
        let y = pos.y.floor() as i32;
        let z = (pos.z.floor() as i32) - self.coord.z * CHUNK_SIZE as i32;
        if !Self::is_voxel_in_chunk(x, y, z) {
            return Err(VoxelError::OutOfBounds { x, y, z });
        }
        Ok((x as usize, y as usize, z as usize))
    }

    /// Whether this chunk is currently active (visible to the renderer).
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Sets the active flag. The voxel grid is kept either way, so a
    /// reactivated chunk republishes its mesh without re-running the oracle.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// World-space anchor position of this chunk's minimum corner.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Whether the voxel grid has been populated from the terrain oracle.
    pub fn is_voxel_map_populated(&self) -> bool {
        self.is_voxel_map_populated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(17.0, 33.0, 1, 2 ; "positive interior")]
    #[test_case(0.0, 0.0, 0, 0 ; "origin")]
    #[test_case(15.9, 15.9, 0, 0 ; "last cell of chunk zero")]
    #[test_case(16.0, 16.0, 1, 1 ; "first cell of chunk one")]
    #[test_case(-0.5, -0.5, -1, -1 ; "just below zero")]
    #[test_case(-16.0, -16.0, -1, -1 ; "negative chunk interior")]
    #[test_case(-16.5, -17.0, -2, -2 ; "second negative chunk")]
    fn coordinate_from_world_position(wx: f32, wz: f32, cx: i32, cz: i32) {
        let coord = ChunkCoordinate::from_world_position(Point3::new(wx, 5.0, wz));
        assert_eq!(coord, ChunkCoordinate::new(cx, cz));
    }

    #[test]
    fn positions_in_same_cell_are_equal() {
        let a = ChunkCoordinate::from_world_position(Point3::new(17.2, 0.0, 33.9));
        let b = ChunkCoordinate::from_world_position(Point3::new(31.0, 90.0, 47.0));
        assert_eq!(a, b);
    }

    #[test]
    fn anchor_is_chunk_size_multiple() {
        let coord = ChunkCoordinate::new(-2, 3);
        assert_eq!(coord.anchor(), Point3::new(-32.0, 0.0, 48.0));
    }

    #[test]
    fn bounds_check_covers_grid_extents() {
        assert!(Chunk::is_voxel_in_chunk(0, 0, 0));
        assert!(Chunk::is_voxel_in_chunk(15, 127, 15));
        assert!(!Chunk::is_voxel_in_chunk(-1, 0, 0));
        assert!(!Chunk::is_voxel_in_chunk(16, 0, 0));
        assert!(!Chunk::is_voxel_in_chunk(0, 128, 0));
        assert!(!Chunk::is_voxel_in_chunk(0, -1, 0));
        assert!(!Chunk::is_voxel_in_chunk(0, 0, 16));
    }

    #[test]
    fn new_chunk_starts_unpopulated_with_empty_mesh() {
        let chunk = Chunk::new(ChunkCoordinate::new(0, 0));
        assert!(!chunk.is_voxel_map_populated());
        assert!(chunk.mesh().vertices.is_empty());
    }
}
