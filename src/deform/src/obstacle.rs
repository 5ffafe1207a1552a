//! Rigid obstacles. Each shape answers one question: given a particle
//! center and radius, how far must the particle translate to stop
//! penetrating? Obstacles are static or externally repositioned; the
//! solver never moves them.

use crate::particle::Particle;
use crate::V3;

/// Spheres reuse the particle shape: `sphere.x` is the center and
/// `sphere.r` the radius. A penetrating particle is pushed to exactly
/// the summed-radius distance along the separating direction. A
/// particle sitting on the center has no such direction and is left
/// alone for this step.
pub fn sphere_correction(sphere: &Particle, x: &V3, r: f64) -> Option<V3> {
	let dx = x - sphere.x;
	if dx.norm() >= r + sphere.r {
		return None;
	}
	match dx.try_normalize(f64::EPSILON) {
		Some(dir) => Some((sphere.r + r) * dir + sphere.x - x),
		None => {
			log::warn!("particle at sphere center, skipping correction");
			None
		}
	}
}

/// Half-space boundary through `x` with outward unit normal `n`.
#[derive(Clone)]
pub struct Plane {
	pub x: V3,
	pub n: V3,
}

impl Plane {
	pub fn new(x: V3, n: V3) -> Self {
		Self { x, n }
	}

	pub fn correction(&self, x: &V3, r: f64) -> Option<V3> {
		let distance = (x - self.x).dot(&self.n);
		if distance < r {
			Some(-self.n * (distance - r))
		} else {
			None
		}
	}
}

/// Capped cylinder from base point `x`, extending `h` along the unit
/// `axis`, radius `r`.
#[derive(Clone)]
pub struct Cylinder {
	pub x: V3,
	pub axis: V3,
	pub r: f64,
	pub h: f64,
}

impl Cylinder {
	pub fn new(x: V3, axis: V3, r: f64, h: f64) -> Self {
		Self { x, axis, r, h }
	}

	/// A particle is embedded only when inside the top cap, bottom cap
	/// and lateral surface at once; it leaves through whichever face is
	/// nearest (largest, least negative signed distance).
	pub fn correction(&self, x: &V3, r: f64) -> Option<V3> {
		let top = (x - (self.x + self.h * self.axis)).dot(&self.axis) - r;
		let bottom = (x - self.x).dot(&-self.axis) - r;
		let mut d = x - self.x;
		d -= d.dot(&self.axis) * self.axis;
		let radial = d.norm() - self.r - r;

		if top < 0.0 && bottom < 0.0 && radial < 0.0 {
			if top > bottom && top > radial {
				Some(-self.axis * top)
			} else if bottom > radial {
				Some(self.axis * bottom)
			} else {
				Some(-d.normalize() * radial)
			}
		} else {
			None
		}
	}
}

/// One outward-oriented tetrahedron face.
pub struct Face {
	pub x: V3,
	pub n: V3,
}

/// Convex tetrahedron with externally driven vertices. The face/
/// opposite-vertex topology is fixed; face planes are recomputed from
/// the live vertices on every query so a collaborator may overwrite
/// `x` between steps.
#[derive(Clone)]
pub struct Tetrahedron {
	pub x: [V3; 4],
}

const FACE_INDICES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
const FACE_OPPOSITE: [usize; 4] = [3, 1, 2, 0];

impl Tetrahedron {
	pub fn new(x: [V3; 4]) -> Self {
		Self { x }
	}

	/// The canonical unit tetrahedron at the origin.
	pub fn unit() -> Self {
		Self::new([
			V3::new(0., 0., 0.),
			V3::new(1., 0., 0.),
			V3::new(0., 1., 0.),
			V3::new(0., 0., 1.),
		])
	}

	pub fn faces(&self) -> [Face; 4] {
		std::array::from_fn(|i| {
			let [a, b, c] = FACE_INDICES[i];
			let p0 = self.x[a];
			let mut n = (self.x[b] - p0).cross(&(self.x[c] - p0)).normalize();
			if n.dot(&(self.x[FACE_OPPOSITE[i]] - p0)) > 0.0 {
				n = -n;
			}
			Face { x: p0, n }
		})
	}
}

/// Push a particle inside all four faces out through the face of least
/// penetration.
pub fn face_correction(faces: &[Face; 4], x: &V3, r: f64) -> Option<V3> {
	let mut max_distance = f64::NEG_INFINITY;
	let mut max_face = 0;
	for (i, face) in faces.iter().enumerate() {
		let distance = (x - face.x).dot(&face.n) - r;
		if distance > max_distance {
			max_distance = distance;
			max_face = i;
		}
	}
	if max_distance < 0.0 {
		Some(-max_distance * faces[max_face].n)
	} else {
		None
	}
}
