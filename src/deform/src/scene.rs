//! Scene: owns the deformable bodies and the rigid obstacles, advances
//! simulated time on a fixed step, schedules wind gusts and scripted
//! obstacle motion, and publishes render snapshots. The solver itself
//! only ever consumes the wind vector and obstacle state handed to it.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, SystemTime};

use rand::Rng;

use protocol::rd_model::RdModel;
use protocol::Message;

use crate::cloth::Cloth;
use crate::obstacle::{Cylinder, Plane, Tetrahedron};
use crate::particle::Particle;
use crate::softbody::SoftBody;
use crate::V3;

pub enum SceneCommand {
	TogglePause,
	FrameForward,
}

pub struct Scene {
	pub t: f64,
	pub h: f64,
	pub gravity: V3,
	/// Steps per published frame in `run_thread`.
	pub ppr: usize,

	wind: V3,
	wind_max: f64,
	wind_target: V3,
	prev_wind_target: V3,
	wind_period: u32,
	wind_i: u32,

	// -1: always play
	// 0: pause
	// n: play n frames
	forward_frames: i32,

	pub cloths: Vec<Cloth>,
	pub soft_bodies: Vec<SoftBody>,

	pub spheres: Vec<Particle>,
	pub planes: Vec<Plane>,
	pub cylinders: Vec<Cylinder>,
	pub tetrahedra: Vec<Tetrahedron>,
}

impl Default for Scene {
	fn default() -> Self {
		Self {
			t: 0.0,
			h: 1e-3,
			gravity: V3::new(0.0, -9.8, 0.0),
			ppr: 10,
			wind: V3::zeros(),
			wind_max: 0.005,
			wind_target: V3::zeros(),
			prev_wind_target: V3::zeros(),
			wind_period: 1500,
			wind_i: 0,
			forward_frames: -1,
			cloths: Vec::new(),
			soft_bodies: Vec::new(),
			spheres: Vec::new(),
			planes: Vec::new(),
			cylinders: Vec::new(),
			tetrahedra: Vec::new(),
		}
	}
}

impl Scene {
	/// The demo setup: a pinned cloth above a swept sphere, a small
	/// soft-body block, a ground plane and a short pole.
	pub fn init_test(&mut self) {
		// units: meters, kilograms, seconds
		self.cloths.push(Cloth::new(
			15,
			15,
			V3::new(-0.25, 0.5, 0.0),
			V3::new(0.25, 0.5, 0.0),
			V3::new(-0.25, 0.5, -0.5),
			V3::new(0.25, 0.5, -0.5),
			0.1,
			0.0,
			1e-3,
			0.01,
		));
		self.soft_bodies.push(SoftBody::new(
			4,
			4,
			4,
			V3::new(0.5, 0.6, -0.2),
			V3::new(0.9, 1.0, 0.2),
			1.0,
			0.0,
			1e-3,
			0.01,
		));

		let mut sphere = Particle::new(V3::new(0.0, 0.2, 0.0), 1.0, 0.1, 0.0);
		sphere.fixed = true;
		self.spheres.push(sphere);

		self.planes
			.push(Plane::new(V3::zeros(), V3::new(0.0, 1.0, 0.0)));
		self.cylinders
			.push(Cylinder::new(V3::zeros(), V3::new(0.0, 1.0, 0.0), 0.1, 0.2));
	}

	pub fn wind(&self) -> V3 {
		self.wind
	}

	/// Every `wind_period` steps pick a new random gust target and
	/// linearly blend toward it; the bodies only see the blended
	/// vector.
	fn update_wind(&mut self) {
		self.wind_i += 1;
		if self.wind_i == self.wind_period {
			self.prev_wind_target = self.wind_target;
			let mut rng = rand::thread_rng();
			let magnitude = self.wind_max * rng.gen::<f64>();
			let direction = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
			self.wind_target = V3::new(
				magnitude * direction.cos(),
				0.0,
				magnitude * direction.sin(),
			);
			self.wind_i = 0;
		}
		let blend = self.wind_i as f64 / self.wind_period as f64;
		self.wind = self.prev_wind_target * (1.0 - blend) + self.wind_target * blend;
	}

	/// Advance every body by one fixed timestep.
	pub fn step(&mut self) {
		self.t += self.h;

		// the first sphere slides on a sine track
		if let Some(sphere) = self.spheres.first_mut() {
			sphere.x[2] = 0.5 * (0.5 * self.t).sin();
		}
		self.update_wind();

		let wind = self.wind;
		for cloth in self.cloths.iter_mut() {
			cloth.step(
				self.h,
				&self.gravity,
				&wind,
				&self.spheres,
				&self.planes,
				&self.cylinders,
				&self.tetrahedra,
			);
		}
		for body in self.soft_bodies.iter_mut() {
			body.step(
				self.h,
				&self.gravity,
				&wind,
				&self.spheres,
				&self.planes,
				&self.cylinders,
				&self.tetrahedra,
			);
		}
	}

	pub fn tare(&mut self) {
		for sphere in self.spheres.iter_mut() {
			sphere.tare();
		}
		for cloth in self.cloths.iter_mut() {
			cloth.tare();
		}
		for body in self.soft_bodies.iter_mut() {
			body.tare();
		}
	}

	/// Rewind time and restore every body from its tare baseline.
	/// Broken constraints stay broken.
	pub fn reset(&mut self) {
		self.t = 0.0;
		for sphere in self.spheres.iter_mut() {
			sphere.reset();
		}
		for cloth in self.cloths.iter_mut() {
			cloth.reset();
		}
		for body in self.soft_bodies.iter_mut() {
			body.reset();
		}
	}

	/// Snapshot every body's render buffers.
	pub fn rd_model(&mut self) -> RdModel {
		let mut meshes = Vec::new();
		for cloth in self.cloths.iter_mut() {
			meshes.push(cloth.rd_mesh());
		}
		for body in self.soft_bodies.iter_mut() {
			meshes.push(body.rd_mesh());
		}
		RdModel { meshes }
	}

	/// Step one published frame's worth of simulation.
	pub fn run(&mut self) {
		for _ in 0..self.ppr {
			self.step();
		}
	}

	/// Dedicated stepping loop: advance at the fixed rate and publish
	/// snapshots; the consumer never touches live solver state.
	pub fn run_thread(&mut self, tx: Sender<Message>, rx: Receiver<SceneCommand>) {
		let mut start_time = SystemTime::now();
		let rtime: u64 = (self.h * 1e6 * self.ppr as f64) as u64;
		let mut first_frame = true;
		loop {
			if self.forward_frames != 0 {
				self.forward_frames -= 1;
				if !first_frame {
					self.run();
				} else {
					first_frame = false;
				}
				let model = self.rd_model();
				if tx.send(Message::WorldUpdate(model)).is_err() {
					return;
				}
			}

			let next_time = SystemTime::now();
			let dt = next_time.duration_since(start_time).unwrap().as_micros() as u64;
			while let Ok(msg) = rx.try_recv() {
				match msg {
					SceneCommand::TogglePause => {
						if self.forward_frames == 0 {
							self.forward_frames = -1;
						} else {
							self.forward_frames = 0;
						}
					}
					SceneCommand::FrameForward => {
						if self.forward_frames == 0 {
							self.forward_frames += 1;
						}
					}
				}
			}
			if dt < rtime {
				std::thread::sleep(Duration::from_micros(rtime - dt));
			}
			start_time = next_time;
		}
	}
}
