//! Mesh assembly buffers.
//!
//! Geometry is assembled per block side, in the six [`MeshSide`] buffers of
//! a [`Mesh`], and flattened into a single [`ChunkMesh`] (one interleaved
//! vertex buffer plus one index buffer) when the build completes. The chunk
//! owns the resulting `ChunkMesh` and it is rebuilt wholesale whenever the
//! chunk is dirtied; it is never patched incrementally.

use crate::voxels::block::BlockSide;

use super::face::Face;
use super::vertex::Vertex;

/// Index pattern of one quad: two triangles over corners ordered
/// `[ll, lr, ul, ur]`.
const QUAD_INDICES: [u32; 6] = [0, 1, 3, 0, 3, 2];

/// Geometry for a single block side across a whole chunk.
#[derive(Debug, Default)]
pub struct MeshSide {
    /// Vertex data for this side.
    pub vertices: Vec<Vertex>,
    /// Index data for this side, relative to `vertices`.
    pub indices: Vec<u32>,
}

/// A complete chunk mesh under assembly, one buffer per block side.
#[derive(Debug)]
pub struct Mesh {
    /// Side buffers, indexed by `BlockSide` discriminant.
    pub sides: [MeshSide; 6],
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh {
            sides: Default::default(),
        }
    }

    /// Appends one quad for `face`, with explicit per-corner UVs ordered
    /// `[ll, lr, ul, ur]`.
    ///
    /// The light attribute is taken from the face; indices are offset to
    /// account for vertices already in the side buffer.
    pub fn push_face(&mut self, face: &Face, uvs: [[f32; 2]; 4], texture_index: u32) {
        let side_mesh = &mut self.sides[face.side as usize];
        let base = side_mesh.vertices.len() as u32;
        let normal = face.side.normal();
        let light = face.light as f32 / 15.0;

        for (corner, uv) in [face.ll, face.lr, face.ul, face.ur].into_iter().zip(uvs) {
            side_mesh
                .vertices
                .push(Vertex::new(corner, uv, normal, light, texture_index));
        }
        side_mesh
            .indices
            .extend(QUAD_INDICES.iter().map(|index| base + index));
    }

    /// Total number of quads across all sides.
    pub fn quad_count(&self) -> usize {
        self.sides
            .iter()
            .map(|side| side.vertices.len() / 4)
            .sum()
    }

    /// Quad count for one block side.
    pub fn side_quad_count(&self, side: BlockSide) -> usize {
        self.sides[side as usize].vertices.len() / 4
    }

    /// Flattens the per-side buffers into the final single-draw-call
    /// buffer pair, in `BlockSide` discriminant order.
    pub fn into_chunk_mesh(self) -> ChunkMesh {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for side in self.sides {
            let base = vertices.len() as u32;
            vertices.extend(side.vertices);
            indices.extend(side.indices.into_iter().map(|index| base + index));
        }

        ChunkMesh { vertices, indices }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// The finished geometry of one chunk: one interleaved vertex buffer and
/// one index buffer, immutable until the next rebuild.
#[derive(Debug, Default)]
pub struct ChunkMesh {
    /// Interleaved vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Whether the mesh contains no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex buffer as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockType;

    #[test]
    fn quads_carry_four_vertices_and_six_indices() {
        let mut mesh = Mesh::new();
        let face = Face::new(0, 0, 0, BlockType::STONE.id(), BlockSide::TOP, 15);
        mesh.push_face(&face, [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]], 1);

        let chunk_mesh = mesh.into_chunk_mesh();
        assert_eq!(chunk_mesh.vertices.len(), 4);
        assert_eq!(chunk_mesh.indices.len(), 6);
        assert!(chunk_mesh.indices.iter().all(|&i| i < 4));
    }

    #[test]
    fn flattening_offsets_indices_across_sides() {
        let mut mesh = Mesh::new();
        let stone = BlockType::STONE.id();
        let uvs = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];
        mesh.push_face(&Face::new(0, 0, 0, stone, BlockSide::TOP, 15), uvs, 1);
        mesh.push_face(&Face::new(0, 0, 0, stone, BlockSide::FRONT, 15), uvs, 1);

        let chunk_mesh = mesh.into_chunk_mesh();
        assert_eq!(chunk_mesh.vertices.len(), 8);
        assert_eq!(chunk_mesh.indices.len(), 12);
        // The second quad's indices must address the second vertex block.
        assert!(chunk_mesh.indices[6..].iter().all(|&i| (4..8).contains(&i)));
    }
}
