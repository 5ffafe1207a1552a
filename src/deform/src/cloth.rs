//! Rectangular cloth sheet: a bilinear particle lattice joined by
//! structural, shear and bend springs, with a quad/triangle topology
//! used for wind forcing and render extraction.

use protocol::rd_model::RdMesh;

use crate::obstacle::{Cylinder, Plane, Tetrahedron};
use crate::particle::Particle;
use crate::solver;
use crate::spring::{Spring, SpringSet};
use crate::topology::{self, Quad, Tri};
use crate::V3;

pub struct Cloth {
	pub rows: usize,
	pub cols: usize,
	pub particles: Vec<Particle>,
	pub springs: Vec<Spring>,
	/// (rows - 1) * (cols - 1) cells in row-major order, two triangles
	/// each.
	pub cells: Vec<Quad>,
	wind_force: Vec<V3>,
	texcoords: Vec<f32>,
}

impl Cloth {
	/// Build a rows x cols sheet spanned by the four corner positions
	/// (x00 top-left, x01 top-right, x10 bottom-left, x11
	/// bottom-right). The two top corners are fixed; the total mass is
	/// spread evenly over the particles.
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		rows: usize,
		cols: usize,
		x00: V3,
		x01: V3,
		x10: V3,
		x11: V3,
		mass: f64,
		alpha: f64,
		damping: f64,
		pradius: f64,
	) -> Self {
		assert!(rows > 1, "cloth needs at least 2 rows");
		assert!(cols > 1, "cloth needs at least 2 cols");
		assert!(mass > 0.0, "mass must be positive");
		assert!(alpha >= 0.0, "compliance must be non-negative");
		assert!(damping >= 0.0, "damping must be non-negative");
		assert!(pradius >= 0.0, "particle radius must be non-negative");

		let n = rows * cols;
		let particle_m = mass / n as f64;
		let mut particles = Vec::with_capacity(n);
		for i in 0..rows {
			let beta = i as f64 / (rows - 1) as f64;
			for j in 0..cols {
				let t = j as f64 / (cols - 1) as f64;
				let top = (1.0 - t) * x00 + t * x01;
				let bottom = (1.0 - t) * x10 + t * x11;
				let pos = (1.0 - beta) * top + beta * bottom;
				let mut p = Particle::new(pos, particle_m, pradius, damping);
				if i == 0 && (j == 0 || j == cols - 1) {
					p.fixed = true;
				}
				particles.push(p);
			}
		}

		let at = |i: usize, j: usize| i * cols + j;
		let mut set = SpringSet::default();

		// structural, along each axis
		for i in 0..rows {
			for j in 0..cols - 1 {
				set.add(&particles, at(i, j), at(i, j + 1), alpha);
			}
		}
		for i in 0..rows - 1 {
			for j in 0..cols {
				set.add(&particles, at(i, j), at(i + 1, j), alpha);
			}
		}
		// shear, both diagonals of every cell
		for i in 0..rows - 1 {
			for j in 0..cols - 1 {
				set.add(&particles, at(i, j), at(i + 1, j + 1), alpha);
				set.add(&particles, at(i + 1, j), at(i, j + 1), alpha);
			}
		}
		// bend, two cells apart along each axis
		for i in 0..rows {
			for j in 0..cols - 2 {
				set.add(&particles, at(i, j), at(i, j + 2), alpha);
			}
		}
		for i in 0..rows - 2 {
			for j in 0..cols {
				set.add(&particles, at(i, j), at(i + 2, j), alpha);
			}
		}

		// two triangles per cell, sharing the anti-diagonal shear edge
		let mut cells = Vec::with_capacity((rows - 1) * (cols - 1));
		for i in 0..rows - 1 {
			for j in 0..cols - 1 {
				let a = at(i, j);
				let b = at(i + 1, j);
				let c = at(i, j + 1);
				let d = at(i + 1, j + 1);
				let tri0 = Tri::new([a, b, c], [set.get(a, c), set.get(a, b), set.get(b, c)]);
				let tri1 = Tri::new([c, b, d], [set.get(b, d), set.get(c, d), set.get(b, c)]);
				cells.push(Quad { tris: [tri0, tri1] });
			}
		}

		let mut texcoords = Vec::with_capacity(n * 2);
		for i in 0..rows {
			for j in 0..cols {
				texcoords.push(i as f32 / (rows - 1) as f32);
				texcoords.push(j as f32 / (cols - 1) as f32);
			}
		}

		let springs = set.into_springs();
		log::info!(
			"cloth {}x{}: {} particles, {} springs",
			rows,
			cols,
			n,
			springs.len()
		);
		Self {
			rows,
			cols,
			particles,
			springs,
			cells,
			wind_force: vec![V3::zeros(); n],
			texcoords,
		}
	}

	/// Project the wind vector onto every intact triangle and spread a
	/// third of the resulting face force onto each of its vertices.
	fn accumulate_wind(&mut self, wind: &V3) {
		for f in self.wind_force.iter_mut() {
			*f = V3::zeros();
		}
		let particles = &self.particles;
		let springs = &self.springs;
		let wind_force = &mut self.wind_force;
		for quad in self.cells.iter_mut() {
			for tri in quad.tris.iter_mut() {
				if tri.is_broken(springs) {
					continue;
				}
				let normal = tri.normal(particles);
				let area = normal.norm();
				let n = match normal.try_normalize(f64::EPSILON) {
					Some(n) => n,
					None => continue,
				};
				let pressure = n.dot(wind);
				let force = n * (pressure * area / 3.0);
				for &ix in &tri.indices {
					wind_force[ix] += force;
				}
			}
		}
	}

	/// Advance the sheet by one fixed timestep under gravity, wind and
	/// the given obstacles.
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
		self.accumulate_wind(wind);
		let wind_force = &self.wind_force;
		solver::integrate(&mut self.particles, h, gravity, |i| wind_force[i]);
		solver::project_springs(&mut self.particles, &mut self.springs, h, 1);
		solver::project_collisions(&mut self.particles, spheres, planes, cylinders, tetrahedra);
		solver::recover_velocities(&mut self.particles, h);
	}

	pub fn tare(&mut self) {
		for p in self.particles.iter_mut() {
			p.tare();
		}
	}

	/// Restore particle kinematics from the tare baseline. Broken
	/// springs stay broken.
	pub fn reset(&mut self) {
		for p in self.particles.iter_mut() {
			p.reset();
		}
	}

	pub fn positions(&self) -> Vec<f32> {
		topology::positions_buf(&self.particles)
	}

	/// Per-vertex normals averaging the unit normals of the intact
	/// triangles touching each vertex; every face counts once
	/// regardless of its area.
	pub fn normals(&mut self) -> Vec<f32> {
		let particles = &self.particles;
		let springs = &self.springs;
		let mut accum = vec![V3::zeros(); particles.len()];
		for quad in self.cells.iter_mut() {
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
		topology::normals_buf(&accum)
	}

	/// Index triples of the currently intact triangles.
	pub fn indices(&mut self) -> Vec<u32> {
		let springs = &self.springs;
		let mut buf = Vec::new();
		for quad in self.cells.iter_mut() {
			for tri in quad.tris.iter_mut() {
				if tri.is_broken(springs) {
					continue;
				}
				buf.extend(tri.indices.iter().map(|&ix| ix as u32));
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
