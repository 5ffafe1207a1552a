//! Oracle tests driving the projection phases directly on hand-built
//! particle and constraint arenas.

use deform::particle::Particle;
use deform::solver;
use deform::spring::{Spring, SpringSet};
use deform::volume::{signed_volume, Volume};
use deform::V3;

fn tetra_particles() -> Vec<Particle> {
	[
		V3::new(0., 0., 0.),
		V3::new(1., 0., 0.),
		V3::new(0., 1., 0.),
		V3::new(0., 0., 1.),
	]
	.into_iter()
	.map(|x| Particle::new(x, 1.0, 0.0, 0.0))
	.collect()
}

#[test]
fn single_rigid_spring_converges_in_one_pass() {
	let mut particles = vec![
		Particle::new(V3::zeros(), 1.0, 0.0, 0.0),
		Particle::new(V3::new(1., 0., 0.), 1.0, 0.0, 0.0),
	];
	let mut springs = vec![Spring::new(&particles, 0, 1, 0.0)];
	particles[1].x[0] = 2.0;

	solver::project_springs(&mut particles, &mut springs, 0.016, 1);
	let l = (particles[1].x - particles[0].x).norm();
	assert!((l - 1.0).abs() < 1e-12);
	// both endpoints moved symmetrically
	assert!((particles[0].x[0] - 0.5).abs() < 1e-12);
	assert!((particles[1].x[0] - 1.5).abs() < 1e-12);
}

#[test]
fn fixed_particle_invariant_over_steps() {
	let mut particles = vec![
		Particle::new(V3::zeros(), 1.0, 0.0, 0.0).fixed(),
		Particle::new(V3::new(1., 0., 0.), 1.0, 0.0, 0.0),
	];
	let mut springs = vec![Spring::new(&particles, 0, 1, 0.0)];
	let gravity = V3::new(0., -9.8, 0.);
	let h = 0.01;
	for _ in 0..100 {
		solver::integrate(&mut particles, h, &gravity, |_| V3::zeros());
		solver::project_springs(&mut particles, &mut springs, h, 1);
		solver::project_collisions(&mut particles, &[], &[], &[], &[]);
		solver::recover_velocities(&mut particles, h);
	}
	assert_eq!(particles[0].x, V3::zeros());
	assert_eq!(particles[0].v, particles[0].v0);
	// the free particle hangs from the fixed one instead of falling away
	assert!((particles[1].x - particles[0].x).norm() < 2.5);
}

#[test]
fn tetrahedron_falls_rigidly_with_conserved_volume() {
	let mut particles = tetra_particles();
	let mut set = SpringSet::default();
	let pairs = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
	let mut edges = [0; 6];
	for (e, &(a, b)) in pairs.iter().enumerate() {
		edges[e] = set.add(&particles, a, b, 0.0);
	}
	let mut springs = set.into_springs();
	let mut volumes = vec![Volume::new(&particles, [0, 1, 2, 3], edges, 0.0)];
	let v0 = volumes[0].v0;

	let gravity = V3::new(0., -9.8, 0.);
	let h = 0.01;
	for _ in 0..100 {
		solver::integrate(&mut particles, h, &gravity, |_| V3::zeros());
		solver::project_springs(&mut particles, &mut springs, h, 10);
		solver::project_volumes(&mut particles, &springs, &mut volumes, h);
		solver::recover_velocities(&mut particles, h);
	}

	let v = signed_volume(
		&particles[0].x,
		&particles[1].x,
		&particles[2].x,
		&particles[3].x,
	);
	assert!((v - v0).abs() < 1e-9 * v0.abs().max(1.0));
	// it did fall
	assert!(particles.iter().all(|p| p.x[1] < -1.0));
	assert!(springs.iter().all(|s| !s.broken));
}

#[test]
fn sphere_collision_resolves_to_summed_radii() {
	let mut particles = vec![Particle::new(V3::new(0.05, 0., 0.), 1.0, 0.1, 0.0)];
	let sphere = Particle::new(V3::zeros(), 1.0, 0.1, 0.0).fixed();

	solver::project_collisions(&mut particles, &[sphere], &[], &[], &[]);
	let x = particles[0].x;
	assert!((x.norm() - 0.2).abs() < 1e-12);
	assert!(x[0] > 0.0 && x[1] == 0.0 && x[2] == 0.0);
}

#[test]
fn collision_skips_fixed_particles() {
	let mut particles = vec![Particle::new(V3::new(0.05, 0., 0.), 1.0, 0.1, 0.0).fixed()];
	let sphere = Particle::new(V3::zeros(), 1.0, 0.1, 0.0);

	solver::project_collisions(&mut particles, &[sphere], &[], &[], &[]);
	assert_eq!(particles[0].x, V3::new(0.05, 0., 0.));
}

#[test]
fn velocity_recovered_from_position_delta() {
	let mut particles = vec![Particle::new(V3::zeros(), 1.0, 0.0, 0.0)];
	let h = 0.01;
	solver::integrate(&mut particles, h, &V3::zeros(), |_| V3::zeros());
	// a collision-style teleport shows up as velocity after recovery
	particles[0].x = V3::new(0.1, 0., 0.);
	solver::recover_velocities(&mut particles, h);
	assert!((particles[0].v - V3::new(10., 0., 0.)).norm() < 1e-12);
}
