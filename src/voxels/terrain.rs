//! # Terrain Module
//!
//! The terrain-generation oracle consumed during chunk population, plus the
//! biome/lode attribute tables that parameterize it. The meshing core treats
//! generation as an opaque `world position -> block id` function; everything
//! in this module sits behind the [`TerrainGenerator`] trait so tests can
//! substitute fixed or degenerate terrains.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::Deserialize;

use super::block::{BlockId, BlockKind, AIR};
use super::voxel_data::CHUNK_HEIGHT;

/// The block-type oracle: one deterministic block id per world position.
///
/// Determinism matters beyond population: global solidity queries fall back
/// to the oracle for unloaded positions, so repeated queries for the same
/// position must agree.
pub trait TerrainGenerator: Send + Sync {
    /// The block id the terrain places at a world position.
    ///
    /// Positions outside the world height range must map to air.
    fn voxel_at(&self, pos: Point3<f32>) -> BlockId;
}

/// A named ore-placement rule: within its height band, cells whose 3D noise
/// sample clears the threshold are replaced with the lode's block.
#[derive(Clone, Debug, Deserialize)]
pub struct Lode {
    /// Display name, used in data files and logs.
    pub name: String,
    /// The block id placed where the lode applies.
    pub block_id: BlockId,
    /// Lowest world y the lode can appear at.
    pub min_height: i32,
    /// Highest world y the lode can appear at.
    pub max_height: i32,
    /// Noise frequency scale.
    pub scale: f64,
    /// Noise sample (in [0, 1]) above which the lode replaces the block.
    pub threshold: f64,
    /// Offset added to the sample position, decorrelating lodes that share
    /// a noise source.
    pub offset: f64,
}

/// The parameter table for one biome: terrain height bounds, noise scale,
/// and the ore lodes carved into it.
#[derive(Clone, Debug, Deserialize)]
pub struct BiomeAttributes {
    /// Biome display name.
    pub name: String,
    /// Terrain surface height when the height noise sample is 1.
    pub highest_terrain_height: i32,
    /// Terrain surface height when the height noise sample is 0.
    pub lowest_terrain_height: i32,
    /// Frequency scale for the 2D surface-height noise.
    pub terrain_scale: f64,
    /// Ore-placement rules applied below the surface.
    pub lodes: Vec<Lode>,
}

impl BiomeAttributes {
    /// Parses a biome table from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// A plains-like default biome with a single sand lode.
    pub fn default_biome() -> Self {
        BiomeAttributes {
            name: "plains".to_string(),
            highest_terrain_height: 90,
            lowest_terrain_height: 42,
            terrain_scale: 0.02,
            lodes: vec![Lode {
                name: "sand pocket".to_string(),
                block_id: BlockKind::SAND.id(),
                min_height: 10,
                max_height: 60,
                scale: 0.1,
                threshold: 0.6,
                offset: 345.0,
            }],
        }
    }
}

/// Perlin-noise terrain: bedrock floor, stone body, dirt cap, grass
/// surface, then a lode pass over the solid cells.
pub struct NoiseTerrain {
    biome: BiomeAttributes,
    perlin: Perlin,
}

impl NoiseTerrain {
    /// A generator for the given biome and noise seed.
    pub fn new(biome: BiomeAttributes, seed: u32) -> Self {
        NoiseTerrain {
            biome,
            perlin: Perlin::new(seed),
        }
    }

    /// 2D surface-height sample, remapped from [-1, 1] to [0, 1].
    fn height_sample(&self, x: f64, z: f64) -> f64 {
        let scale = self.biome.terrain_scale;
        (self.perlin.get([x * scale, z * scale]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// 3D lode sample, remapped from [-1, 1] to [0, 1].
    fn lode_sample(&self, x: f64, y: f64, z: f64, lode: &Lode) -> f64 {
        let sample = self.perlin.get([
            x * lode.scale + lode.offset,
            y * lode.scale + lode.offset,
            z * lode.scale + lode.offset,
        ]);
        (sample * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl TerrainGenerator for NoiseTerrain {
    fn voxel_at(&self, pos: Point3<f32>) -> BlockId {
        let x = pos.x.floor() as f64;
        let y = pos.y.floor() as i32;
        let z = pos.z.floor() as f64;

        if y < 0 || y >= CHUNK_HEIGHT as i32 {
            return AIR;
        }
        if y == 0 {
            return BlockKind::BEDROCK.id();
        }

        let span = (self.biome.highest_terrain_height - self.biome.lowest_terrain_height) as f64;
        let terrain_height =
            self.biome.lowest_terrain_height + (span * self.height_sample(x, z)) as i32;

        let mut id = if y > terrain_height {
            AIR
        } else if y == terrain_height {
            BlockKind::GRASS.id()
        } else if y >= terrain_height - 3 {
            BlockKind::DIRT.id()
        } else {
            BlockKind::STONE.id()
        };

        if id != AIR {
            for lode in &self.biome.lodes {
                if y >= lode.min_height
                    && y <= lode.max_height
                    && self.lode_sample(x, y as f64, z, lode) > lode.threshold
                {
                    id = lode.block_id;
                }
            }
        }

        id
    }
}

/// Flat terrain: one block type fills every cell below the given height.
/// The degenerate case `height == 0` is an empty world.
pub struct FlatTerrain {
    /// First y that is air.
    pub height: i32,
    /// The block id used for the filled layers.
    pub block: BlockId,
}

impl FlatTerrain {
    /// Flat terrain of the given height, filled with one block type.
    pub fn new(height: i32, block: BlockId) -> Self {
        FlatTerrain { height, block }
    }

    /// A world with no solid voxels at all.
    pub fn empty() -> Self {
        FlatTerrain {
            height: 0,
            block: AIR,
        }
    }
}

impl TerrainGenerator for FlatTerrain {
    fn voxel_at(&self, pos: Point3<f32>) -> BlockId {
        let y = pos.y.floor() as i32;
        if y >= 0 && y < self.height.min(CHUNK_HEIGHT as i32) {
            self.block
        } else {
            AIR
        }
    }
}

/// Position-seeded random fill, for stress and soak tests. Each cell's id is
/// derived from a hash of its coordinates, so the oracle stays deterministic
/// across repeated queries.
pub struct RandomTerrain {
    seed: u64,
    /// Probability in [0, 1] that a cell is solid.
    fill: f32,
    block: BlockId,
}

impl RandomTerrain {
    /// A random fill with the given seed and solid-cell probability.
    pub fn new(seed: u64, fill: f32, block: BlockId) -> Self {
        RandomTerrain { seed, fill, block }
    }
}

impl TerrainGenerator for RandomTerrain {
    fn voxel_at(&self, pos: Point3<f32>) -> BlockId {
        let y = pos.y.floor() as i32;
        if y < 0 || y >= CHUNK_HEIGHT as i32 {
            return AIR;
        }
        let mut key = self.seed;
        for component in [pos.x.floor() as i64, y as i64, pos.z.floor() as i64] {
            key = (key ^ component as u64).wrapping_mul(0x517c_c1b7_2722_0a95);
        }
        let mut rng = fastrand::Rng::with_seed(key);
        if rng.f32() < self.fill {
            self.block
        } else {
            AIR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_terrain_layers() {
        let terrain = NoiseTerrain::new(BiomeAttributes::default_biome(), 7);
        let at = |y: f32| terrain.voxel_at(Point3::new(8.0, y, 8.0));

        assert_eq!(at(-1.0), AIR);
        assert_eq!(at(0.0), BlockKind::BEDROCK.id());
        assert_eq!(at(CHUNK_HEIGHT as f32), AIR);
        // Above the highest possible surface there is only air.
        assert_eq!(at(91.0), AIR);
        // Below the lowest possible surface (and below the lode band floor
        // sampled here) everything is solid.
        assert_ne!(at(5.0), AIR);
    }

    #[test]
    fn noise_terrain_is_deterministic() {
        let terrain = NoiseTerrain::new(BiomeAttributes::default_biome(), 7);
        let pos = Point3::new(123.0, 37.0, -54.0);
        assert_eq!(terrain.voxel_at(pos), terrain.voxel_at(pos));
    }

    #[test]
    fn flat_terrain_fills_up_to_height() {
        let terrain = FlatTerrain::new(4, BlockKind::STONE.id());
        assert_eq!(
            terrain.voxel_at(Point3::new(0.0, 0.0, 0.0)),
            BlockKind::STONE.id()
        );
        assert_eq!(
            terrain.voxel_at(Point3::new(0.0, 3.9, 0.0)),
            BlockKind::STONE.id()
        );
        assert_eq!(terrain.voxel_at(Point3::new(0.0, 4.0, 0.0)), AIR);
        assert_eq!(terrain.voxel_at(Point3::new(0.0, -1.0, 0.0)), AIR);
    }

    #[test]
    fn random_terrain_is_stable_per_position() {
        let terrain = RandomTerrain::new(99, 0.5, BlockKind::DIRT.id());
        for i in 0..32 {
            let pos = Point3::new(i as f32, 10.0, -i as f32);
            assert_eq!(terrain.voxel_at(pos), terrain.voxel_at(pos));
        }
    }

    #[test]
    fn biome_parses_from_json() {
        let json = r#"{
            "name": "desert",
            "highest_terrain_height": 70,
            "lowest_terrain_height": 40,
            "terrain_scale": 0.03,
            "lodes": [
                {
                    "name": "sandstone",
                    "block_id": 4,
                    "min_height": 5,
                    "max_height": 50,
                    "scale": 0.2,
                    "threshold": 0.55,
                    "offset": 100.0
                }
            ]
        }"#;
        let biome = BiomeAttributes::from_json(json).unwrap();
        assert_eq!(biome.name, "desert");
        assert_eq!(biome.lodes.len(), 1);
        assert_eq!(biome.lodes[0].block_id, 4);
    }
}
