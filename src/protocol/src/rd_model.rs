// rd_model: render-facing snapshot of the deformable bodies

use serde::{Deserialize, Serialize};

/// Flat buffers for one deformable body, ready for vertex upload.
/// Triangles whose supporting springs have snapped are absent from
/// `indices`; the vertex arrays always cover the full lattice.
#[derive(Clone, Serialize, Deserialize)]
pub struct RdMesh {
	pub positions: Vec<f32>,
	pub normals: Vec<f32>,
	pub texcoords: Vec<f32>,
	pub indices: Vec<u32>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RdModel {
	pub meshes: Vec<RdMesh>,
}
