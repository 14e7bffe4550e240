//! # World Module
//!
//! The boundary between a chunk and everything outside it. Chunks never hold
//! a reference to a concrete world; they receive a [`ChunkWorld`] capability
//! on the operations that need one (population, meshing, border solidity
//! checks), which keeps the core testable against mock worlds.
//!
//! [`VoxelWorld`] is the in-memory implementation: a sparse registry of
//! loaded chunks plus the terrain oracle and block table they share. It also
//! owns the cross-chunk edit protocol, since lock discipline lives at this
//! layer: each chunk's lock is taken in its own scope, never held across a
//! neighboring chunk's rebuild.

use std::collections::HashMap;
use std::sync::RwLock;

use cgmath::Point3;
use log::{debug, info, warn};

use super::block::{BlockId, BlockRegistry};
use super::chunk::{Chunk, ChunkCoordinate};
use super::error::VoxelError;
use super::terrain::TerrainGenerator;
use super::voxel_data::CHUNK_HEIGHT;
use crate::core::MtResource;

/// The capability interface chunks use to see past their own bounds.
///
/// Implemented by [`VoxelWorld`]; tests implement it directly with fixed
/// data instead.
pub trait ChunkWorld {
    /// The block-type table shared by every chunk.
    fn blocks(&self) -> &BlockRegistry;

    /// The terrain oracle: the block id generation places at a position.
    fn voxel_at(&self, pos: Point3<f32>) -> BlockId;

    /// Global solidity query, used when a face-visibility check crosses a
    /// chunk boundary.
    fn is_voxel_solid(&self, pos: Point3<f32>) -> bool;

    /// Resolves the loaded chunk owning a world position, if any.
    fn chunk_at(&self, pos: Point3<f32>) -> Option<MtResource<Chunk>>;
}

/// A sparse registry of loaded chunks sharing one block table and terrain
/// oracle.
///
/// Only chunks that were explicitly created are held in memory; solidity
/// queries against unloaded positions fall back to the terrain oracle, which
/// keeps border culling consistent before and after a neighbor loads.
pub struct VoxelWorld {
    blocks: BlockRegistry,
    generator: Box<dyn TerrainGenerator>,
    chunks: RwLock<HashMap<ChunkCoordinate, MtResource<Chunk>>>,
}

impl VoxelWorld {
    /// A world with the given block table and terrain oracle and no loaded
    /// chunks.
    pub fn new(blocks: BlockRegistry, generator: Box<dyn TerrainGenerator>) -> Self {
        VoxelWorld {
            blocks,
            generator,
            chunks: RwLock::new(HashMap::new()),
        }
    }

    /// Creates (or returns the already loaded) chunk at a coordinate.
    ///
    /// With `generate_on_load` the chunk is populated from the oracle and
    /// meshed before it becomes visible in the registry; otherwise it stays
    /// unpopulated until [`Chunk::init`] is called through its handle.
    ///
    /// # Errors
    /// Propagates population/meshing failures from eager initialization.
    pub fn create_chunk(
        &self,
        coord: ChunkCoordinate,
        generate_on_load: bool,
    ) -> Result<MtResource<Chunk>, VoxelError> {
        if let Some(existing) = self.chunk_handle(coord) {
            return Ok(existing);
        }

        let mut chunk = Chunk::new(coord);
        if generate_on_load {
            // Initialized before insertion: border queries fall back to the
            // oracle, which answers exactly what the chunk will contain, so
            // already-loaded neighbors stay consistent.
            chunk.init(self)?;
        }

        let mut chunks = self.chunks.write().unwrap_or_else(|e| e.into_inner());
        let handle = chunks
            .entry(coord)
            .or_insert_with(|| {
                info!("loaded chunk ({}, {})", coord.x, coord.z);
                MtResource::new(chunk)
            })
            .clone();
        Ok(handle)
    }

    /// The handle of a loaded chunk, by coordinate.
    pub fn chunk_handle(&self, coord: ChunkCoordinate) -> Option<MtResource<Chunk>> {
        self.chunks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&coord)
            .cloned()
    }

    /// The number of currently loaded chunks.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The block id at a world position: the owning chunk's grid when one is
    /// loaded and populated, the terrain oracle otherwise.
    pub fn voxel_from_global_position(&self, pos: Point3<f32>) -> BlockId {
        if let Some(handle) = self.chunk_at(pos) {
            let chunk = handle.get();
            if chunk.is_voxel_map_populated() {
                if let Ok(id) = chunk.voxel_from_global_position(pos) {
                    return id;
                }
            }
        }
        self.generator.voxel_at(pos)
    }

    /// Applies a point edit and keeps neighboring chunks consistent.
    ///
    /// Protocol order: overwrite the cell, rebuild every loaded chunk whose
    /// border is adjacent to the edited cell, then rebuild the edited chunk.
    /// Unloaded or unpopulated neighbors are skipped; they will mesh against
    /// the updated grid whenever they initialize.
    ///
    /// # Errors
    /// Returns [`VoxelError::ChunkNotLoaded`] if no chunk owns the position,
    /// plus any edit/rebuild failure from the owning chunk itself.
    pub fn edit_voxel(&self, pos: Point3<f32>, id: BlockId) -> Result<(), VoxelError> {
        let coord = ChunkCoordinate::from_world_position(pos);
        let handle = self
            .chunk_handle(coord)
            .ok_or(VoxelError::ChunkNotLoaded(coord))?;

        let border_neighbors = { handle.get_mut().edit_voxel(pos, id, &self.blocks)? };

        for neighbor_pos in border_neighbors {
            // Above/below the world the position maps back to the edited
            // chunk's own coordinate; there is nothing to rebuild there.
            if ChunkCoordinate::from_world_position(neighbor_pos) == coord {
                continue;
            }
            match self.chunk_at(neighbor_pos) {
                Some(neighbor) => {
                    let mut guard = neighbor.get_mut();
                    if guard.is_voxel_map_populated() {
                        guard.rebuild_mesh(self)?;
                    }
                }
                None => debug!(
                    "edit at ({}, {}, {}): neighbor chunk not loaded, skipping rebuild",
                    pos.x, pos.y, pos.z
                ),
            }
        }

        let result = handle.get_mut().rebuild_mesh(self);
        result
    }
}

impl ChunkWorld for VoxelWorld {
    fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    fn voxel_at(&self, pos: Point3<f32>) -> BlockId {
        self.generator.voxel_at(pos)
    }

    fn is_voxel_solid(&self, pos: Point3<f32>) -> bool {
        let y = pos.y.floor() as i32;
        if y < 0 || y >= CHUNK_HEIGHT as i32 {
            return false;
        }

        if let Some(handle) = self.chunk_at(pos) {
            let chunk = handle.get();
            if chunk.is_voxel_map_populated() {
                if let Ok(solid) = chunk.is_voxel_solid_global(pos) {
                    return solid;
                }
            }
        }

        let id = self.generator.voxel_at(pos);
        self.blocks.is_solid(id).unwrap_or_else(|_| {
            warn!("terrain oracle produced unknown block id {id}, treating as air");
            false
        })
    }

    fn chunk_at(&self, pos: Point3<f32>) -> Option<MtResource<Chunk>> {
        self.chunk_handle(ChunkCoordinate::from_world_position(pos))
    }
}
