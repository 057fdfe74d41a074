//! Vertex data for voxel rendering.
//!
//! Defines the interleaved vertex format handed to the external renderer.
//! The layout is `#[repr(C)]` and `Pod` so a completed buffer can be
//! uploaded byte-for-byte without repacking.

use cgmath::{Point3, Vector3};

/// One vertex of chunk geometry.
///
/// # Memory Layout
/// - Position: `[f32; 3]` (12 bytes), chunk-local
/// - Texture coordinates: `[f32; 2]` (8 bytes)
/// - Face normal: `[f32; 3]` (12 bytes)
/// - Light: `f32` (4 bytes), 0.0–1.0, sampled from the lighting model and
///   threaded through as an attribute rather than recomputed in the shader
/// - Texture index: `u32` (4 bytes), the atlas cell, for pipelines that
///   prefer array textures over baked UVs
///
/// Total size: 40 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position.
    pub position: [f32; 3],
    /// UV texture coordinates.
    pub tex_coords: [f32; 2],
    /// Outward face normal.
    pub normal: [f32; 3],
    /// Combined sky/emission light term, normalized to 0.0–1.0.
    pub light: f32,
    /// Atlas cell index of the face this vertex belongs to.
    pub texture_index: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(
        position: Point3<i32>,
        tex_coords: [f32; 2],
        normal: Vector3<f32>,
        light: f32,
        texture_index: u32,
    ) -> Self {
        Vertex {
            position: [position.x as f32, position.y as f32, position.z as f32],
            tex_coords,
            normal: [normal.x, normal.y, normal.z],
            light,
            texture_index,
        }
    }
}
