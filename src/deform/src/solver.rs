//! The per-step projection phases shared by cloth and soft bodies.
//!
//! A step runs the phases strictly in sequence: external-force
//! integration, spring projection, volume projection (soft bodies),
//! collision projection, velocity recovery. Projection is Gauss-Seidel
//! over the constraint lists in insertion order; that order is part of
//! the observable behavior, not an implementation detail.

use crate::obstacle::{face_correction, sphere_correction, Cylinder, Plane, Tetrahedron};
use crate::particle::Particle;
use crate::spring::Spring;
use crate::volume::Volume;
use crate::V3;

/// Explicit update of velocities from external forces, then position
/// prediction. Fixed particles keep their rest velocity and do not
/// move. `wind_force` yields the accumulated wind force per particle
/// (a constant for soft bodies, a per-triangle accumulation for
/// cloth).
pub fn integrate<F>(particles: &mut [Particle], h: f64, gravity: &V3, wind_force: F)
where
	F: Fn(usize) -> V3,
{
	for (i, particle) in particles.iter_mut().enumerate() {
		if particle.fixed {
			particle.v = particle.v0;
			continue;
		}
		let force = particle.m * gravity - particle.d * particle.v + wind_force(i);
		particle.v += (h / particle.m) * force;
		particle.p = particle.x;
		particle.x += h * particle.v;
	}
}

/// Gauss-Seidel passes over the springs in insertion order. Broken
/// springs are skipped; overstretched ones snap and stay snapped.
pub fn project_springs(particles: &mut [Particle], springs: &mut [Spring], h: f64, passes: usize) {
	for _ in 0..passes {
		for spring in springs.iter_mut() {
			spring.project(particles, h);
		}
	}
}

/// One pass over the volume constraints, after the spring passes.
pub fn project_volumes(
	particles: &mut [Particle],
	springs: &[Spring],
	volumes: &mut [Volume],
	h: f64,
) {
	for volume in volumes.iter_mut() {
		volume.project(particles, springs, h);
	}
}

/// Resolve penetration of every free particle against every obstacle,
/// in the fixed order spheres, planes, cylinders, tetrahedra.
pub fn project_collisions(
	particles: &mut [Particle],
	spheres: &[Particle],
	planes: &[Plane],
	cylinders: &[Cylinder],
	tetrahedra: &[Tetrahedron],
) {
	for sphere in spheres {
		for particle in particles.iter_mut().filter(|p| !p.fixed) {
			if let Some(dx) = sphere_correction(sphere, &particle.x, particle.r) {
				particle.x += dx;
			}
		}
	}
	for plane in planes {
		for particle in particles.iter_mut().filter(|p| !p.fixed) {
			if let Some(dx) = plane.correction(&particle.x, particle.r) {
				particle.x += dx;
			}
		}
	}
	for cylinder in cylinders {
		for particle in particles.iter_mut().filter(|p| !p.fixed) {
			if let Some(dx) = cylinder.correction(&particle.x, particle.r) {
				particle.x += dx;
			}
		}
	}
	for tetrahedron in tetrahedra {
		let faces = tetrahedron.faces();
		for particle in particles.iter_mut().filter(|p| !p.fixed) {
			if let Some(dx) = face_correction(&faces, &particle.x, particle.r) {
				particle.x += dx;
			}
		}
	}
}

/// Recover velocities from the projected position delta. Fixed
/// particles already carry their rest velocity from `integrate`.
pub fn recover_velocities(particles: &mut [Particle], h: f64) {
	for particle in particles.iter_mut() {
		if particle.fixed {
			continue;
		}
		particle.v = (particle.x - particle.p) / h;
	}
}
