//! # Mesh Buffers
//!
//! Parallel vertex arrays handed to the renderer after each rebuild.
//!
//! Every face contributes six vertices (two triangles). Faces are stored
//! sorted by material then direction so each `(material, face)` pair is
//! one contiguous [`FaceGroup`], ready for a single draw call.

use lithos_procedural::BlockType;

use crate::face::{Face, QUAD_TEX_COORDS, QUAD_TRIANGLES};

/// Vertices emitted per face.
pub const VERTICES_PER_FACE: usize = QUAD_TRIANGLES.len();

/// Material and direction of one emitted face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceTag {
    /// Voxel material, used for texture-atlas lookup.
    pub material: BlockType,
    /// Face direction.
    pub face: Face,
}

/// Contiguous run of faces sharing a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceGroup {
    /// Shared tag.
    pub tag: FaceTag,
    /// Index of the first vertex.
    pub first_vertex: usize,
    /// Number of vertices.
    pub vertex_count: usize,
}

/// A visible face waiting to be written into the buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Quad {
    pub origin: [i32; 3],
    pub tag: FaceTag,
}

/// Vertex data for one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    tags: Vec<FaceTag>,
}

impl MeshBuffers {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every face, keeping allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.tex_coords.clear();
        self.tags.clear();
    }

    /// Replaces the contents with `quads`, grouped by tag.
    pub(crate) fn fill(&mut self, quads: &mut [Quad]) {
        self.clear();
        quads.sort_by_key(|q| q.tag);

        let vertices = quads.len() * VERTICES_PER_FACE;
        self.positions.reserve(vertices);
        self.colors.reserve(vertices);
        self.tex_coords.reserve(vertices);
        self.tags.reserve(quads.len());

        for quad in quads.iter() {
            self.push_quad(quad);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn push_quad(&mut self, quad: &Quad) {
        let face = quad.tag.face;
        let corners = face.corners();
        let shade = face.shade();
        let origin = quad.origin.map(|v| v as f32);

        for &corner in &QUAD_TRIANGLES {
            let c = corners[corner];
            self.positions
                .push([origin[0] + c[0], origin[1] + c[1], origin[2] + c[2]]);
            self.colors.push([shade; 3]);
            self.tex_coords.push(QUAD_TEX_COORDS[corner]);
        }
        self.tags.push(quad.tag);
    }

    /// Vertex positions, chunk-local.
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Per-vertex colors.
    #[must_use]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Per-vertex texture coordinates.
    #[must_use]
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// One tag per face, in buffer order.
    #[must_use]
    pub fn tags(&self) -> &[FaceTag] {
        &self.tags
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.tags.len()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// True if no face is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Faces with the given direction.
    #[must_use]
    pub fn count_faces(&self, face: Face) -> usize {
        self.tags.iter().filter(|t| t.face == face).count()
    }

    /// Contiguous runs of faces sharing a tag.
    #[must_use]
    pub fn groups(&self) -> Vec<FaceGroup> {
        let mut groups: Vec<FaceGroup> = Vec::new();
        for (i, tag) in self.tags.iter().enumerate() {
            match groups.last_mut() {
                Some(group) if group.tag == *tag => group.vertex_count += VERTICES_PER_FACE,
                _ => groups.push(FaceGroup {
                    tag: *tag,
                    first_vertex: i * VERTICES_PER_FACE,
                    vertex_count: VERTICES_PER_FACE,
                }),
            }
        }
        groups
    }

    /// Positions as raw bytes for GPU upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as raw bytes for GPU upload.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Texture coordinates as raw bytes for GPU upload.
    #[must_use]
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }
}
