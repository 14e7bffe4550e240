//! Texture-atlas UV mapping.
//!
//! The atlas is a single image tiled into a grid of square cells, addressed
//! by a linear cell id counted row-major from the top-left. UV space has its
//! origin at the bottom-left, so the v coordinate is flipped here. The
//! mapping is pure arithmetic and bit-reproducible, which snapshot tests
//! rely on.

use cgmath::Vector2;

use crate::voxels::voxel_data::TEXTURE_ATLAS_SIZE_IN_BLOCKS;

/// Maps linear atlas cell ids to UV quads.
#[derive(Copy, Clone, Debug)]
pub struct TextureAtlas {
    size_in_blocks: u32,
}

impl TextureAtlas {
    /// An atlas with the given number of cells per row.
    pub fn new(size_in_blocks: u32) -> Self {
        TextureAtlas { size_in_blocks }
    }

    /// The UV extent of one atlas cell.
    pub fn cell_size(&self) -> f32 {
        1.0 / self.size_in_blocks as f32
    }

    /// The four UV corners for an atlas cell id.
    ///
    /// The corner order matches the per-face vertex order used by the mesh
    /// builder: bottom-left, top-left, bottom-right, top-right of the cell.
    pub fn face_uvs(&self, texture_id: u32) -> [Vector2<f32>; 4] {
        let cell = self.cell_size();
        let row = texture_id / self.size_in_blocks;
        let col = texture_id - row * self.size_in_blocks;

        let u = col as f32 * cell;
        let v = 1.0 - row as f32 * cell - cell;

        [
            Vector2::new(u, v),
            Vector2::new(u, v + cell),
            Vector2::new(u + cell, v),
            Vector2::new(u + cell, v + cell),
        ]
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        TextureAtlas::new(TEXTURE_ATLAS_SIZE_IN_BLOCKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(0, 0.0, 0.9375 ; "first cell")]
    #[test_case(17, 0.0625, 0.875 ; "row one column one")]
    #[test_case(15, 0.9375, 0.9375 ; "end of first row")]
    #[test_case(16, 0.0, 0.875 ; "start of second row")]
    #[test_case(255, 0.9375, 0.0 ; "last cell")]
    fn cell_origin(texture_id: u32, u: f32, v: f32) {
        let atlas = TextureAtlas::default();
        let uvs = atlas.face_uvs(texture_id);
        assert_relative_eq!(uvs[0].x, u);
        assert_relative_eq!(uvs[0].y, v);
    }

    #[test]
    fn quad_spans_exactly_one_cell() {
        let atlas = TextureAtlas::default();
        let cell = atlas.cell_size();
        let uvs = atlas.face_uvs(42);
        assert_relative_eq!(uvs[1].y - uvs[0].y, cell);
        assert_relative_eq!(uvs[2].x - uvs[0].x, cell);
        assert_relative_eq!(uvs[3].x - uvs[0].x, cell);
        assert_relative_eq!(uvs[3].y - uvs[0].y, cell);
    }

    #[test]
    fn default_atlas_matches_shared_sizing() {
        use crate::voxels::voxel_data::NORMALIZED_BLOCK_TEXTURE_SIZE;
        assert_eq!(
            TextureAtlas::default().cell_size(),
            NORMALIZED_BLOCK_TEXTURE_SIZE
        );
    }

    #[test]
    fn mapping_is_reproducible() {
        let atlas = TextureAtlas::default();
        assert_eq!(atlas.face_uvs(131), atlas.face_uvs(131));
    }
}
