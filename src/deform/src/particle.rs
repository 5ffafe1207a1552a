use crate::V3;

/// Point mass state. Springs, volume constraints and topology cells
/// refer to particles by index into the owning body's arena, never by
/// reference.
#[derive(Clone)]
pub struct Particle {
	pub x: V3,
	pub v: V3,
	/// Position at the start of the current step, used to recover the
	/// velocity once projection is done.
	pub p: V3,
	pub x0: V3,
	pub v0: V3,
	pub m: f64,
	pub r: f64,
	pub d: f64,
	/// Fixed particles are never moved by constraint or collision
	/// projection; their velocity is forced back to `v0` each step.
	pub fixed: bool,
}

impl Particle {
	pub fn new(x: V3, m: f64, r: f64, d: f64) -> Self {
		Self {
			x,
			v: V3::zeros(),
			p: x,
			x0: x,
			v0: V3::zeros(),
			m,
			r,
			d,
			fixed: false,
		}
	}

	pub fn fixed(mut self) -> Self {
		self.fixed = true;
		self
	}

	/// Snapshot (x, v) as the new reset baseline.
	pub fn tare(&mut self) {
		self.x0 = self.x;
		self.v0 = self.v;
	}

	/// Restore (x, v) from the baseline.
	pub fn reset(&mut self) {
		self.x = self.x0;
		self.v = self.v0;
	}
}
