use crate::particle::Particle;
use crate::spring::Spring;
use crate::V3;

/// One render triangle: vertex indices plus the springs along its
/// edges. A triangle disappears from the render index list once any
/// supporting edge snaps.
#[derive(Clone)]
pub struct Tri {
	pub indices: [usize; 3],
	pub edges: [usize; 3],
	broken: bool,
}

impl Tri {
	pub fn new(indices: [usize; 3], edges: [usize; 3]) -> Self {
		Self {
			indices,
			edges,
			broken: false,
		}
	}

	/// Broken iff any edge spring is broken; memoized, monotonic.
	pub fn is_broken(&mut self, springs: &[Spring]) -> bool {
		if self.broken {
			return true;
		}
		if self.edges.iter().any(|&s| springs[s].broken) {
			self.broken = true;
		}
		self.broken
	}

	/// Unnormalized face normal (x1 - x0) x (x2 - x0); its norm is
	/// twice the triangle area.
	pub fn normal(&self, particles: &[Particle]) -> V3 {
		let x0 = particles[self.indices[0]].x;
		let x1 = particles[self.indices[1]].x;
		let x2 = particles[self.indices[2]].x;
		(x1 - x0).cross(&(x2 - x0))
	}
}

/// Two triangles sharing a cell's anti-diagonal edge.
#[derive(Clone)]
pub struct Quad {
	pub tris: [Tri; 2],
}

/// The six-quad exterior skin of one lattice cube.
#[derive(Clone)]
pub struct Hexa {
	pub quads: [Quad; 6],
}

/// Flatten particle positions into 3 floats per particle.
pub fn positions_buf(particles: &[Particle]) -> Vec<f32> {
	let mut buf = Vec::with_capacity(particles.len() * 3);
	for p in particles {
		buf.extend_from_slice(&[p.x[0] as f32, p.x[1] as f32, p.x[2] as f32]);
	}
	buf
}

/// Normalize accumulated vertex normals into a flat f32 buffer.
/// Vertices touched by no intact triangle get a zero normal.
pub fn normals_buf(accum: &[V3]) -> Vec<f32> {
	let mut buf = Vec::with_capacity(accum.len() * 3);
	for n in accum {
		let n = n.try_normalize(f64::EPSILON).unwrap_or_else(V3::zeros);
		buf.extend_from_slice(&[n[0] as f32, n[1] as f32, n[2] as f32]);
	}
	buf
}
