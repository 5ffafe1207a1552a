use std::sync::mpsc;
use std::thread;

use deform::scene::Scene;
use protocol::sock::SockServer;

fn main() {
	env_logger::init();
	let (tx, rx) = mpsc::channel();
	let (_command_tx, command_rx) = mpsc::channel();
	let mut scene = Scene::default();
	scene.init_test();
	thread::spawn(move || scene.run_thread(tx, command_rx));

	let mut server = SockServer::default();
	for msg in rx {
		server.send_msg(&msg.to_bytes());
	}
}
