use crate::particle::Particle;
use crate::spring::Spring;
use crate::V3;

/// Signed volume of the tetrahedron (x0, x1, x2, x3).
pub fn signed_volume(x0: &V3, x1: &V3, x2: &V3, x3: &V3) -> f64 {
	(x1 - x0).cross(&(x2 - x0)).dot(&(x3 - x0)) / 6.0
}

/// Volume constraint over one lattice tetrahedron. Its broken state is
/// a function of the six springs along its edges, cached once true.
#[derive(Clone)]
pub struct Volume {
	pub ps: [usize; 4],
	pub springs: [usize; 6],
	pub v0: f64,
	pub alpha: f64,
	broken: bool,
}

impl Volume {
	pub fn new(particles: &[Particle], ps: [usize; 4], springs: [usize; 6], alpha: f64) -> Self {
		let v0 = signed_volume(
			&particles[ps[0]].x,
			&particles[ps[1]].x,
			&particles[ps[2]].x,
			&particles[ps[3]].x,
		);
		Self {
			ps,
			springs,
			v0,
			alpha,
			broken: false,
		}
	}

	/// Broken iff any edge spring is broken; memoized, monotonic.
	pub fn is_broken(&mut self, springs: &[Spring]) -> bool {
		if self.broken {
			return true;
		}
		if self.springs.iter().any(|&s| springs[s].broken) {
			self.broken = true;
		}
		self.broken
	}

	/// One projection of the volume constraint: a single lambda over
	/// the four face-cross-product gradients, applied to every
	/// non-fixed vertex.
	pub fn project(&mut self, particles: &mut [Particle], springs: &[Spring], h: f64) {
		if self.is_broken(springs) {
			return;
		}
		let [i0, i1, i2, i3] = self.ps;
		let x0 = particles[i0].x;
		let x1 = particles[i1].x;
		let x2 = particles[i2].x;
		let x3 = particles[i3].x;

		let vcur = signed_volume(&x0, &x1, &x2, &x3);
		let c = 6.0 * (vcur - self.v0);

		let grad0 = (x3 - x1).cross(&(x2 - x1));
		let grad1 = (x2 - x0).cross(&(x3 - x0));
		let grad2 = (x3 - x0).cross(&(x1 - x0));
		let grad3 = (x1 - x0).cross(&(x2 - x0));

		let w0 = 1.0 / particles[i0].m;
		let w1 = 1.0 / particles[i1].m;
		let w2 = 1.0 / particles[i2].m;
		let w3 = 1.0 / particles[i3].m;

		let denom = w0 * grad0.norm_squared()
			+ w1 * grad1.norm_squared()
			+ w2 * grad2.norm_squared()
			+ w3 * grad3.norm_squared()
			+ self.alpha / (h * h);
		if !denom.is_normal() {
			log::warn!("degenerate volume gradients, skipping projection");
			return;
		}
		let lambda = -c / denom;

		if !particles[i0].fixed {
			particles[i0].x += lambda * w0 * grad0;
		}
		if !particles[i1].fixed {
			particles[i1].x += lambda * w1 * grad1;
		}
		if !particles[i2].fixed {
			particles[i2].x += lambda * w2 * grad2;
		}
		if !particles[i3].fixed {
			particles[i3].x += lambda * w3 * grad3;
		}
	}
}
