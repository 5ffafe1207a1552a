//! Volumetric soft body: a trilinear particle lattice with structural
//! and face-shear springs, five volume constraints per lattice cube,
//! and a hexahedral surface topology for render extraction.

use protocol::rd_model::RdMesh;

use crate::obstacle::{Cylinder, Plane, Tetrahedron};
use crate::particle::Particle;
use crate::solver;
use crate::spring::{Spring, SpringSet};
use crate::topology::{self, Hexa, Quad, Tri};
use crate::volume::Volume;
use crate::V3;

/// Spring passes per step; the volume pass runs once after them.
const SPRING_PASSES: usize = 10;

pub struct SoftBody {
	pub rows: usize,
	pub cols: usize,
	pub tubes: usize,
	pub particles: Vec<Particle>,
	pub springs: Vec<Spring>,
	pub volumes: Vec<Volume>,
	/// One skin per lattice cube, row-major over (i, j, k).
	pub cells: Vec<Hexa>,
	texcoords: Vec<f32>,
}

impl SoftBody {
	/// Build a rows x cols x tubes lattice filling the axis-aligned box
	/// between the two opposite corners. The (0, 0, 0) corner particle
	/// is fixed as an anchor; the total mass is spread evenly.
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		rows: usize,
		cols: usize,
		tubes: usize,
		x000: V3,
		x111: V3,
		mass: f64,
		alpha: f64,
		damping: f64,
		pradius: f64,
	) -> Self {
		assert!(rows > 1, "soft body needs at least 2 rows");
		assert!(cols > 1, "soft body needs at least 2 cols");
		assert!(tubes > 1, "soft body needs at least 2 tubes");
		assert!(mass > 0.0, "mass must be positive");
		assert!(alpha >= 0.0, "compliance must be non-negative");
		assert!(damping >= 0.0, "damping must be non-negative");
		assert!(pradius >= 0.0, "particle radius must be non-negative");

		let n = rows * cols * tubes;
		let particle_m = mass / n as f64;
		let mut particles = Vec::with_capacity(n);
		for i in 0..rows {
			let u = i as f64 / (rows - 1) as f64;
			for j in 0..cols {
				let v = j as f64 / (cols - 1) as f64;
				for k in 0..tubes {
					let w = k as f64 / (tubes - 1) as f64;
					let pos = V3::new(
						(1.0 - u) * x000[0] + u * x111[0],
						(1.0 - v) * x000[1] + v * x111[1],
						(1.0 - w) * x000[2] + w * x111[2],
					);
					let mut p = Particle::new(pos, particle_m, pradius, damping);
					if i == 0 && j == 0 && k == 0 {
						p.fixed = true;
					}
					particles.push(p);
				}
			}
		}

		let at = |i: usize, j: usize, k: usize| i * cols * tubes + j * tubes + k;

		// structural springs along each axis, plus both diagonals of
		// every cube face; the symmetric-key set dedups face diagonals
		// shared between adjacent cube traversals
		let mut set = SpringSet::default();
		for i in 0..rows {
			for j in 0..cols {
				for k in 0..tubes {
					let p0 = at(i, j, k);
					if i < rows - 1 {
						set.add(&particles, p0, at(i + 1, j, k), alpha);
					}
					if j < cols - 1 {
						set.add(&particles, p0, at(i, j + 1, k), alpha);
					}
					if k < tubes - 1 {
						set.add(&particles, p0, at(i, j, k + 1), alpha);
					}
					if i < rows - 1 && j < cols - 1 {
						set.add(&particles, p0, at(i + 1, j + 1, k), alpha);
						set.add(&particles, at(i + 1, j, k), at(i, j + 1, k), alpha);
					}
					if j < cols - 1 && k < tubes - 1 {
						set.add(&particles, p0, at(i, j + 1, k + 1), alpha);
						set.add(&particles, at(i, j + 1, k), at(i, j, k + 1), alpha);
					}
					if i < rows - 1 && k < tubes - 1 {
						set.add(&particles, p0, at(i + 1, j, k + 1), alpha);
						set.add(&particles, at(i + 1, j, k), at(i, j, k + 1), alpha);
					}
				}
			}
		}

		// five tetrahedra per cube: four corner tetrahedra and the
		// center one, each referencing the springs along its six edges
		let mut volumes = Vec::with_capacity(5 * (rows - 1) * (cols - 1) * (tubes - 1));
		let mut cells = Vec::with_capacity((rows - 1) * (cols - 1) * (tubes - 1));
		for i in 0..rows - 1 {
			for j in 0..cols - 1 {
				for k in 0..tubes - 1 {
					let a = at(i, j, k);
					let b = at(i + 1, j, k);
					let c = at(i + 1, j + 1, k);
					let d = at(i, j + 1, k);
					let e = at(i, j, k + 1);
					let f = at(i + 1, j, k + 1);
					let g = at(i + 1, j + 1, k + 1);
					let h = at(i, j + 1, k + 1);

					let tetra = |ps: [usize; 4]| {
						let [p0, p1, p2, p3] = ps;
						let edges = [
							set.get(p0, p1),
							set.get(p0, p2),
							set.get(p0, p3),
							set.get(p1, p2),
							set.get(p1, p3),
							set.get(p2, p3),
						];
						Volume::new(&particles, ps, edges, 0.0)
					};
					volumes.push(tetra([a, b, d, e]));
					volumes.push(tetra([c, b, g, d]));
					volumes.push(tetra([f, b, e, g]));
					volumes.push(tetra([h, d, g, e]));
					volumes.push(tetra([b, d, e, g]));

					let tri = |p0: usize, p1: usize, p2: usize| {
						Tri::new(
							[p0, p1, p2],
							[set.get(p0, p1), set.get(p0, p2), set.get(p1, p2)],
						)
					};
					// one quad per cube face, each split along a face
					// diagonal that exists as a shear spring
					cells.push(Hexa {
						quads: [
							// abcd
							Quad {
								tris: [tri(a, b, d), tri(c, d, b)],
							},
							// bfgc
							Quad {
								tris: [tri(c, b, g), tri(f, g, b)],
							},
							// ehgf
							Quad {
								tris: [tri(f, e, g), tri(h, g, e)],
							},
							// adhe
							Quad {
								tris: [tri(a, d, e), tri(h, e, d)],
							},
							// cghd
							Quad {
								tris: [tri(c, g, d), tri(h, d, g)],
							},
							// aefb
							Quad {
								tris: [tri(a, e, b), tri(f, b, e)],
							},
						],
					});
				}
			}
		}

		let mut texcoords = Vec::with_capacity(n * 2);
		for i in 0..rows {
			for j in 0..cols {
				for _ in 0..tubes {
					texcoords.push(i as f32 / (rows - 1) as f32);
					texcoords.push(j as f32 / (cols - 1) as f32);
				}
			}
		}

		let springs = set.into_springs();
		log::info!(
			"soft body {}x{}x{}: {} particles, {} springs, {} volumes",
			rows,
			cols,
			tubes,
			n,
			springs.len(),
			volumes.len()
		);
		Self {
			rows,
			cols,
			tubes,
			particles,
			springs,
			volumes,
			cells,
			texcoords,
		}
	}

	/// Advance the body by one fixed timestep. Wind acts as a uniform
	/// force on every free particle.
	#[allow(clippy::too_many_arguments)]
	pub fn step(
		&mut self,
		h: f64,
		gravity: &V3,
		wind: &V3,
		spheres: &[Particle],
		planes: &[Plane],
		cylinders: &[Cylinder],
		tetrahedra: &[Tetrahedron],
	) {
		let wind = *wind;
		solver::integrate(&mut self.particles, h, gravity, |_| wind);
		solver::project_springs(&mut self.particles, &mut self.springs, h, SPRING_PASSES);
		solver::project_volumes(&mut self.particles, &self.springs, &mut self.volumes, h);
		solver::project_collisions(&mut self.particles, spheres, planes, cylinders, tetrahedra);
		solver::recover_velocities(&mut self.particles, h);
	}

	pub fn tare(&mut self) {
		for p in self.particles.iter_mut() {
			p.tare();
		}
	}

	/// Restore particle kinematics from the tare baseline. Broken
	/// springs and volumes stay broken.
	pub fn reset(&mut self) {
		for p in self.particles.iter_mut() {
			p.reset();
		}
	}

	pub fn positions(&self) -> Vec<f32> {
		topology::positions_buf(&self.particles)
	}

	/// Per-vertex normals averaging the unit normals of the intact skin
	/// triangles touching each vertex.
	pub fn normals(&mut self) -> Vec<f32> {
		let particles = &self.particles;
		let springs = &self.springs;
		let mut accum = vec![V3::zeros(); particles.len()];
		for hexa in self.cells.iter_mut() {
			for quad in hexa.quads.iter_mut() {
				for tri in quad.tris.iter_mut() {
					if tri.is_broken(springs) {
						continue;
					}
					let normal = match tri.normal(particles).try_normalize(f64::EPSILON) {
						Some(n) => n,
						None => continue,
					};
					for &ix in &tri.indices {
						accum[ix] += normal;
					}
				}
			}
		}
		topology::normals_buf(&accum)
	}

	/// Index triples of the currently intact skin triangles.
	pub fn indices(&mut self) -> Vec<u32> {
		let springs = &self.springs;
		let mut buf = Vec::new();
		for hexa in self.cells.iter_mut() {
			for quad in hexa.quads.iter_mut() {
				for tri in quad.tris.iter_mut() {
					if tri.is_broken(springs) {
						continue;
					}
					buf.extend(tri.indices.iter().map(|&ix| ix as u32));
				}
			}
		}
		buf
	}

	pub fn texcoords(&self) -> &[f32] {
		&self.texcoords
	}

	pub fn rd_mesh(&mut self) -> RdMesh {
		RdMesh {
			positions: self.positions(),
			normals: self.normals(),
			texcoords: self.texcoords.clone(),
			indices: self.indices(),
		}
	}
}
