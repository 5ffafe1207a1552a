use fnv::FnvHashMap;

use crate::particle::Particle;

/// A spring snaps permanently once stretched to this multiple of its
/// rest length.
pub const BREAK_STRETCH: f64 = 2.5;

/// Symmetric key on an unordered particle index pair. Shared lattice
/// edges hash to the same key no matter which cell traversal creates
/// them.
pub fn pair_key(p0: usize, p1: usize) -> u64 {
	let (lo, hi) = if p0 < p1 { (p0, p1) } else { (p1, p0) };
	((lo as u64) << 32) | hi as u64
}

/// Distance constraint between two particles, addressed by arena
/// index. The rest length is measured at construction and never
/// recomputed; `broken` is monotonic and survives `reset`.
#[derive(Clone)]
pub struct Spring {
	pub p0: usize,
	pub p1: usize,
	pub l0: f64,
	pub alpha: f64,
	pub broken: bool,
}

impl Spring {
	pub fn new(particles: &[Particle], p0: usize, p1: usize, alpha: f64) -> Self {
		let l0 = (particles[p1].x - particles[p0].x).norm();
		Self {
			p0,
			p1,
			l0,
			alpha,
			broken: false,
		}
	}

	/// One Gauss-Seidel projection. Positions are corrected in place,
	/// so later springs in the same pass see the updated endpoints.
	/// Stretching past `BREAK_STRETCH * l0` snaps the spring instead.
	pub fn project(&mut self, particles: &mut [Particle], h: f64) {
		if self.broken {
			return;
		}
		let dx = particles[self.p1].x - particles[self.p0].x;
		let l = dx.norm();
		if l >= BREAK_STRETCH * self.l0 {
			self.broken = true;
			return;
		}
		if !l.is_normal() {
			log::warn!("degenerate spring length {}", l);
			return;
		}
		let c = l - self.l0;
		let grad0 = -dx / l;
		let grad1 = dx / l;

		let w0 = 1.0 / particles[self.p0].m;
		let w1 = 1.0 / particles[self.p1].m;
		let lambda = -c / (w0 + w1 + self.alpha / (h * h));

		if !particles[self.p0].fixed {
			particles[self.p0].x += lambda * w0 * grad0;
		}
		if !particles[self.p1].fixed {
			particles[self.p1].x += lambda * w1 * grad1;
		}
	}
}

/// Spring arena with symmetric-pair lookup. Lattice builders insert
/// each unordered pair at most once; tetrahedra and topology cells
/// find their edge springs through the same key.
#[derive(Default)]
pub struct SpringSet {
	pub springs: Vec<Spring>,
	index: FnvHashMap<u64, usize>,
}

impl SpringSet {
	/// Insert a spring for the pair unless one already exists; returns
	/// its index either way.
	pub fn add(&mut self, particles: &[Particle], p0: usize, p1: usize, alpha: f64) -> usize {
		let key = pair_key(p0, p1);
		if let Some(&ix) = self.index.get(&key) {
			return ix;
		}
		let ix = self.springs.len();
		self.springs.push(Spring::new(particles, p0, p1, alpha));
		self.index.insert(key, ix);
		ix
	}

	/// Index of the spring joining the pair. Panics if the lattice
	/// builder never created it; that is a construction bug.
	pub fn get(&self, p0: usize, p1: usize) -> usize {
		self.index[&pair_key(p0, p1)]
	}

	pub fn into_springs(self) -> Vec<Spring> {
		self.springs
	}
}
