use deform::cloth::Cloth;
use deform::V3;

fn flat_cloth(rows: usize, cols: usize) -> Cloth {
	Cloth::new(
		rows,
		cols,
		V3::new(-0.25, 0.5, 0.0),
		V3::new(0.25, 0.5, 0.0),
		V3::new(-0.25, 0.5, -0.5),
		V3::new(0.25, 0.5, -0.5),
		0.1,
		0.0,
		1e-3,
		0.01,
	)
}

#[test]
fn lattice_counts() {
	let cloth = flat_cloth(4, 3);
	assert_eq!(cloth.particles.len(), 12);
	// structural 8 + 9, shear 12, bend 4 + 6
	assert_eq!(cloth.springs.len(), 39);
	assert_eq!(cloth.cells.len(), 6);
}

#[test]
fn top_corners_fixed() {
	let cloth = flat_cloth(5, 7);
	for (ix, p) in cloth.particles.iter().enumerate() {
		let expected = ix == 0 || ix == 6;
		assert_eq!(p.fixed, expected, "particle {}", ix);
	}
}

#[test]
#[should_panic]
fn rejects_degenerate_resolution() {
	flat_cloth(1, 3);
}

#[test]
fn fixed_corners_never_move() {
	let mut cloth = flat_cloth(6, 6);
	let anchors: Vec<V3> = [0usize, 5].iter().map(|&ix| cloth.particles[ix].x).collect();
	let wind = V3::new(0.002, 0., 0.001);
	for _ in 0..50 {
		cloth.step(
			1e-3,
			&V3::new(0., -9.8, 0.),
			&wind,
			&[],
			&[],
			&[],
			&[],
		);
	}
	assert_eq!(cloth.particles[0].x, anchors[0]);
	assert_eq!(cloth.particles[5].x, anchors[1]);
	assert_eq!(cloth.particles[0].v, cloth.particles[0].v0);
	assert_eq!(cloth.particles[5].v, cloth.particles[5].v0);
	// the interior sagged
	assert!(cloth.particles[3 * 6 + 3].x[1] < 0.5);
}

#[test]
fn wind_pushes_free_particles() {
	let mut cloth = flat_cloth(4, 4);
	// wind normal to the sheet, no gravity
	cloth.step(
		1e-3,
		&V3::zeros(),
		&V3::new(0., 0.4, 0.),
		&[],
		&[],
		&[],
		&[],
	);
	let center = &cloth.particles[1 * 4 + 1];
	assert!(center.v[1] > 0.0);
	assert!(center.x[1] > 0.5);
}

#[test]
fn tare_then_reset_round_trip() {
	let mut cloth = flat_cloth(5, 5);
	let h = 1e-3;
	let gravity = V3::new(0., -9.8, 0.);
	for _ in 0..20 {
		cloth.step(h, &gravity, &V3::zeros(), &[], &[], &[], &[]);
	}
	cloth.tare();
	let xs: Vec<V3> = cloth.particles.iter().map(|p| p.x).collect();
	let vs: Vec<V3> = cloth.particles.iter().map(|p| p.v).collect();

	for _ in 0..20 {
		cloth.step(h, &gravity, &V3::zeros(), &[], &[], &[], &[]);
	}
	cloth.reset();
	for (ix, p) in cloth.particles.iter().enumerate() {
		assert_eq!(p.x, xs[ix]);
		assert_eq!(p.v, vs[ix]);
	}
}

#[test]
fn breakage_is_monotonic_and_survives_reset() {
	let mut cloth = flat_cloth(2, 2);
	assert_eq!(cloth.indices().len(), 6);

	// rip the bottom-left particle away
	cloth.particles[2].x += V3::new(0., -10., 0.);
	cloth.step(1e-3, &V3::zeros(), &V3::zeros(), &[], &[], &[], &[]);
	let broken: Vec<usize> = cloth
		.springs
		.iter()
		.enumerate()
		.filter(|(_, s)| s.broken)
		.map(|(ix, _)| ix)
		.collect();
	assert!(!broken.is_empty());
	assert!(cloth.indices().len() < 6);

	cloth.reset();
	for &ix in &broken {
		assert!(cloth.springs[ix].broken);
	}
	for _ in 0..10 {
		cloth.step(1e-3, &V3::new(0., -9.8, 0.), &V3::zeros(), &[], &[], &[], &[]);
	}
	for &ix in &broken {
		assert!(cloth.springs[ix].broken);
	}
}

#[test]
fn extraction_buffers() {
	let mut cloth = flat_cloth(4, 3);
	assert_eq!(cloth.positions().len(), 12 * 3);
	assert_eq!(cloth.indices().len(), 6 * 2 * 3);
	assert_eq!(cloth.texcoords().len(), 12 * 2);

	// a flat sheet has vertical normals everywhere
	let normals = cloth.normals();
	assert_eq!(normals.len(), 12 * 3);
	for n in normals.chunks(3) {
		assert!(n[0].abs() < 1e-6);
		assert!((n[1].abs() - 1.0).abs() < 1e-6);
		assert!(n[2].abs() < 1e-6);
	}

	// extraction is idempotent and does not disturb physics state
	let xs: Vec<V3> = cloth.particles.iter().map(|p| p.x).collect();
	let a = cloth.rd_mesh();
	let b = cloth.rd_mesh();
	assert_eq!(a.indices, b.indices);
	assert_eq!(a.positions, b.positions);
	for (ix, p) in cloth.particles.iter().enumerate() {
		assert_eq!(p.x, xs[ix]);
	}
}

#[test]
fn vertex_normals_average_unit_face_normals() {
	// one cell, two triangles of very different area and orientation
	let mut cloth = flat_cloth(2, 2);
	cloth.particles[0].x = V3::new(0., 0., 0.);
	cloth.particles[1].x = V3::new(1., 0., 0.);
	cloth.particles[2].x = V3::new(0., 0., 1.);
	cloth.particles[3].x = V3::new(1., -2., 1.);

	let normals = cloth.normals();
	// first face normal is +y with area 1/2, second is (2, 1, 2)/3
	// with area 3/2; each contributes its unit normal once
	let expected = (V3::new(0., 1., 0.) + V3::new(2., 1., 2.) / 3.0).normalize();
	for ix in [1usize, 2] {
		for a in 0..3 {
			assert!((normals[ix * 3 + a] as f64 - expected[a]).abs() < 1e-5);
		}
	}
	// the vertex touched only by the small face keeps its full normal
	let lone = [0., 1., 0.];
	for a in 0..3 {
		assert!((normals[a] as f64 - lone[a]).abs() < 1e-5);
	}
}

#[test]
fn cloth_rests_on_plane() {
	use deform::obstacle::Plane;

	let mut cloth = Cloth::new(
		4,
		4,
		V3::new(-0.25, 0.1, 0.25),
		V3::new(0.25, 0.1, 0.25),
		V3::new(-0.25, 0.1, -0.25),
		V3::new(0.25, 0.1, -0.25),
		0.1,
		0.0,
		1e-3,
		0.01,
	);
	// unpin so the whole sheet falls onto the ground
	for p in cloth.particles.iter_mut() {
		p.fixed = false;
	}
	let planes = [Plane::new(V3::zeros(), V3::new(0., 1., 0.))];
	for _ in 0..500 {
		cloth.step(1e-3, &V3::new(0., -9.8, 0.), &V3::zeros(), &[], &planes, &[], &[]);
	}
	for p in &cloth.particles {
		assert!(p.x[1] > 0.01 - 1e-9, "particle below ground: {}", p.x[1]);
	}
}
