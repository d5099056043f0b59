use std::str;

use crate::error::{Result, TransportError};
use crate::vxi11::CoreClient;

/// The four primitives the driver needs from a connection to an instrument.
///
/// A link carries one command stream. Nothing here serializes access, so callers sharing a
/// link between threads must hold it exclusively for the length of a whole operation (a
/// waveform fetch is many round trips, and interleaving them corrupts the framing).
pub trait InstrumentLink {
	/// Sends a command or query without waiting for a response.
	fn write(&mut self, command:&str) -> Result<()>;

	/// Reads one text response with the terminator and surrounding whitespace trimmed.
	fn read_line(&mut self) -> Result<String>;

	/// Reads a raw response, such as a binary block, stopping after `max_bytes` if given.
	fn read_raw(&mut self, max_bytes:Option<usize>) -> Result<Vec<u8>>;

	fn query(&mut self, command:&str) -> Result<String> {
		self.write(command)?;
		self.read_line()
	}
}

impl<L: InstrumentLink + ?Sized> InstrumentLink for &mut L {
	fn write(&mut self, command:&str) -> Result<()> { (**self).write(command) }
	fn read_line(&mut self) -> Result<String> { (**self).read_line() }
	fn read_raw(&mut self, max_bytes:Option<usize>) -> Result<Vec<u8>> { (**self).read_raw(max_bytes) }
	fn query(&mut self, command:&str) -> Result<String> { (**self).query(command) }
}

impl InstrumentLink for CoreClient {

	fn write(&mut self, command:&str) -> Result<()> {
		log::debug!("scpi: > {}", command);
		let mut data:Vec<u8> = command.as_bytes().to_vec();
		if !command.ends_with('\n') { data.push(b'\n'); }
		Ok(CoreClient::write(self, &data)?)
	}

	fn read_line(&mut self) -> Result<String> {
		let data:Vec<u8> = self.read(None)?;
		let line:&str = str::from_utf8(&data).map_err(|_| TransportError::Utf8)?;
		log::debug!("scpi: < {}", line.trim());
		Ok(line.trim().to_owned())
	}

	fn read_raw(&mut self, max_bytes:Option<usize>) -> Result<Vec<u8>> {
		let data:Vec<u8> = self.read(max_bytes)?;
		log::debug!("scpi: < {} raw bytes", data.len());
		Ok(data)
	}

}
