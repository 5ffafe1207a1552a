use std::time::SystemTime;

use deform::scene::Scene;

fn main() {
	env_logger::init();
	let start = SystemTime::now();
	let mut scene = Scene::default();
	scene.init_test();
	let frames = 2000;
	for _ in 0..frames {
		scene.step();
	}
	let simulated = frames as f64 * scene.h;
	let duration = SystemTime::now().duration_since(start).unwrap().as_micros();
	eprintln!("{:.3}% realtime", duration as f64 / simulated / 1e4);
}
