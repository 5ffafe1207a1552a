//! Unix socket pair carrying world snapshots: one publishing server,
//! one polling consumer. The consumer reads non-blocking and reports
//! `Nop` while no update is pending.

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use crate::Message;

const SOCK_PATH: &str = "deform.socket";

/// Upper bound on one serialized snapshot.
const MSG_BUF_LEN: usize = 1 << 20;

pub struct SockServer {
	listener: UnixListener,
	stream: Option<UnixStream>,
}

impl Default for SockServer {
	fn default() -> Self {
		Self::bind(SOCK_PATH)
	}
}

impl SockServer {
	/// Bind the publishing endpoint, replacing any stale socket file.
	pub fn bind<P: AsRef<Path>>(path: P) -> Self {
		let path = path.as_ref();
		let _ = std::fs::remove_file(path);
		let listener = UnixListener::bind(path).unwrap();
		Self {
			listener,
			stream: None,
		}
	}

	fn listen(&mut self) {
		log::info!("waiting for consumer");
		let stream = self.listener.incoming().next().unwrap().unwrap();
		log::info!("consumer connected");
		self.stream = Some(stream);
	}

	/// Push one serialized message, blocking for a consumer when none
	/// is connected or the previous one went away.
	pub fn send_msg(&mut self, msg: &[u8]) {
		loop {
			if let Some(stream) = self.stream.as_mut() {
				if stream.write_all(msg).is_ok() {
					return;
				}
				log::warn!("consumer lost");
				self.stream = None;
			}
			self.listen();
		}
	}
}

pub struct SockClient {
	path: PathBuf,
	stream: Option<UnixStream>,
	buf: Vec<u8>,
}

impl Default for SockClient {
	fn default() -> Self {
		Self::connect(SOCK_PATH)
	}
}

impl SockClient {
	/// Remember the endpoint; the connection itself is made lazily by
	/// `read_msg`.
	pub fn connect<P: AsRef<Path>>(path: P) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			stream: None,
			buf: vec![0u8; MSG_BUF_LEN],
		}
	}

	/// Poll for the latest message. `Nop` while disconnected or idle;
	/// a lost server drops the client back to reconnecting.
	pub fn read_msg(&mut self) -> Message {
		if self.stream.is_none() {
			match UnixStream::connect(&self.path) {
				Ok(s) => {
					s.set_nonblocking(true).unwrap();
					self.stream = Some(s);
				}
				Err(e) => {
					log::warn!("connect {}: {}", self.path.display(), e);
					return Message::Nop;
				}
			}
		}
		if let Some(stream) = self.stream.as_mut() {
			match stream.read(&mut self.buf) {
				Ok(0) => {
					log::warn!("server closed, reconnecting");
					self.stream = None;
				}
				Ok(buflen) => return Message::from_bytes(&self.buf[..buflen]),
				Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
				Err(e) => panic!("{:?}", e),
			}
		}
		Message::Nop
	}
}
