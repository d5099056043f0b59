// A DS1000Z that lives in memory.  It keeps the waveform point range and source the way the
// real instrument does and answers the queries the driver makes.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;

use ds1000z::{InstrumentLink, Result, TransportError};

pub const IDN:&str = "RIGOL TECHNOLOGIES,DS1104Z,DS1ZA000000001,00.04.04.SP3";

enum Pending {
	Text(String),
	Binary(Vec<u8>),
}

pub struct SimulatedScope {
	/// Every command written, in order
	pub log: Vec<String>,
	/// Acquisition memory of the selected source
	pub samples: Vec<u8>,
	pub format_code: u8,
	pub x_increment: f64,
	pub x_origin: f64,
	pub y_increment: f64,
	pub y_origin: f64,
	pub y_reference: f64,
	/// Replaces the generated preamble response
	pub preamble_override: Option<String>,
	/// Drop this many bytes from the end of the payload of the given `:WAVeform:DATA?` (0-based)
	pub truncate_data_read: Option<(usize, usize)>,
	/// Keep only this many bytes of the whole response to the given `:WAVeform:DATA?` (0-based)
	pub cut_data_read: Option<(usize, usize)>,
	/// Fail the given `:WAVeform:DATA?` (0-based) as if the instrument had timed out
	pub fail_data_read: Option<usize>,
	/// Scripted answers for other queries.  The last answer in a queue repeats.
	pub responses: HashMap<String, VecDeque<String>>,
	pub screen_image: Vec<u8>,
	/// Drop this many bytes from the end of the screenshot payload
	pub truncate_screen: Option<usize>,
	start: usize,
	stop: usize,
	data_reads: usize,
	pending: Option<Pending>,
}

pub fn binary_block(payload:&[u8]) -> Vec<u8> {
	let mut raw = format!("#9{:09}", payload.len()).into_bytes();
	raw.extend_from_slice(payload);
	raw.push(b'\n');
	raw
}

fn timeout() -> ds1000z::Error {
	TransportError::Io(io::Error::new(io::ErrorKind::TimedOut, "no response from instrument")).into()
}

impl SimulatedScope {

	pub fn with_points(points:usize) -> Self {
		let samples:Vec<u8> = (0..points).map(|i| (i % 251) as u8).collect();
		Self::with_samples(samples)
	}

	pub fn with_samples(samples:Vec<u8>) -> Self {
		let mut responses:HashMap<String, VecDeque<String>> = HashMap::new();
		responses.insert("*IDN?".to_owned(), VecDeque::from(vec![IDN.to_owned()]));

		SimulatedScope {
			log: vec![],
			samples,
			format_code: 0,
			x_increment: 1e-6,
			x_origin: -6e-4,
			y_increment: 0.04,
			y_origin: 0.0,
			y_reference: 127.0,
			preamble_override: None,
			truncate_data_read: None,
			cut_data_read: None,
			fail_data_read: None,
			responses,
			screen_image: b"\x89PNG\r\n\x1a\nfake image".to_vec(),
			truncate_screen: None,
			start: 1,
			stop: 1200,
			data_reads: 0,
			pending: None,
		}
	}

	pub fn respond(&mut self, query:&str, answers:&[&str]) {
		self.responses.insert(query.to_owned(), answers.iter().map(|s| s.to_string()).collect());
	}

	/// Commands written after the identity check made at connect time
	pub fn commands(&self) -> Vec<&str> {
		self.log.iter().map(|s| s.as_str()).filter(|c| *c != "*IDN?").collect()
	}

	pub fn count(&self, cmd:&str) -> usize {
		self.log.iter().filter(|c| *c == cmd).count()
	}

	pub fn ranges(&self) -> Vec<(usize, usize)> {
		let starts = self.log.iter().filter_map(|c| c.strip_prefix(":WAVeform:STARt ")).map(|n| n.parse().unwrap());
		let stops = self.log.iter().filter_map(|c| c.strip_prefix(":WAVeform:STOP ")).map(|n| n.parse().unwrap());
		starts.zip(stops).collect()
	}

	fn preamble(&self) -> String {
		match &self.preamble_override {
			Some(p) => p.clone(),
			None => format!("{},0,{},1,{:e},{:e},0,{:e},{},{}",
				self.format_code, self.samples.len(), self.x_increment, self.x_origin,
				self.y_increment, self.y_origin, self.y_reference),
		}
	}

	// None leaves nothing to read, so the following read times out
	fn data_block(&mut self) -> Option<Vec<u8>> {
		let read = self.data_reads;
		self.data_reads += 1;

		if self.fail_data_read == Some(read) {
			return None;
		}

		let mut payload:Vec<u8> = self.samples[self.start - 1..self.stop].to_vec();
		let mut raw = binary_block(&payload);
		if let Some((idx, short)) = self.truncate_data_read {
			if idx == read {
				payload.truncate(payload.len() - short);
				raw.truncate(11 + payload.len());
			}
		}
		if let Some((idx, keep)) = self.cut_data_read {
			if idx == read {
				raw.truncate(keep);
			}
		}
		Some(raw)
	}

	fn screen_block(&self) -> Vec<u8> {
		let mut raw = binary_block(&self.screen_image);
		if let Some(short) = self.truncate_screen {
			raw.truncate(11 + self.screen_image.len() - short);
		}
		raw
	}

	fn scripted(&mut self, query:&str) -> Result<String> {
		let queue = self.responses.get_mut(query).ok_or_else(timeout)?;
		if queue.len() > 1 {
			Ok(queue.pop_front().unwrap_or_default())
		} else {
			queue.front().cloned().ok_or_else(timeout)
		}
	}

}

impl InstrumentLink for SimulatedScope {

	fn write(&mut self, command:&str) -> Result<()> {
		let command = command.trim().to_owned();
		self.log.push(command.clone());

		if let Some(n) = command.strip_prefix(":WAVeform:STARt ") {
			self.start = n.parse().unwrap();
		} else if let Some(n) = command.strip_prefix(":WAVeform:STOP ") {
			self.stop = n.parse().unwrap();
		} else if command == ":WAVeform:PREamble?" {
			self.pending = Some(Pending::Text(self.preamble()));
		} else if command == ":WAVeform:DATA?" {
			self.pending = self.data_block().map(Pending::Binary);
		} else if command.starts_with(":DISPlay:DATA?") {
			self.pending = Some(Pending::Binary(self.screen_block()));
		} else if command.split_whitespace().next().map_or(false, |header| header.ends_with('?')) {
			self.pending = Some(Pending::Text(self.scripted(&command)?));
		}

		Ok(())
	}

	fn read_line(&mut self) -> Result<String> {
		match self.pending.take() {
			Some(Pending::Text(s)) => Ok(s.trim().to_owned()),
			Some(Pending::Binary(b)) => Ok(String::from_utf8_lossy(&b).trim().to_owned()),
			None => Err(timeout()),
		}
	}

	fn read_raw(&mut self, max_bytes:Option<usize>) -> Result<Vec<u8>> {
		let mut data = match self.pending.take() {
			Some(Pending::Text(s)) => format!("{}\n", s).into_bytes(),
			Some(Pending::Binary(b)) => b,
			None => return Err(timeout()),
		};
		if let Some(max) = max_bytes {
			data.truncate(max);
		}
		Ok(data)
	}

}
