use std::thread;
use std::time::{Duration, Instant};

use protocol::rd_model::{RdMesh, RdModel};
use protocol::sock::{SockClient, SockServer};
use protocol::Message;

#[test]
fn server_feeds_connected_client() {
	let path = std::env::temp_dir().join(format!("deform-sock-test-{}", std::process::id()));
	let mut server = SockServer::bind(&path);

	let publisher = thread::spawn(move || {
		let model = RdModel {
			meshes: vec![RdMesh {
				positions: vec![0.; 9],
				normals: vec![0.; 9],
				texcoords: vec![0.; 6],
				indices: vec![0, 1, 2],
			}],
		};
		let bytes = Message::WorldUpdate(model).to_bytes();
		// send_msg blocks in accept until the client shows up
		for _ in 0..50 {
			server.send_msg(&bytes);
			thread::sleep(Duration::from_millis(5));
		}
	});

	let mut client = SockClient::connect(&path);
	let deadline = Instant::now() + Duration::from_secs(10);
	loop {
		match client.read_msg() {
			Message::WorldUpdate(model) => {
				assert_eq!(model.meshes.len(), 1);
				assert_eq!(model.meshes[0].indices, vec![0, 1, 2]);
				break;
			}
			Message::Nop => {
				assert!(Instant::now() < deadline, "no world update received");
				thread::sleep(Duration::from_millis(5));
			}
		}
	}

	publisher.join().unwrap();
	let _ = std::fs::remove_file(&path);
}
