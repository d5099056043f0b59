use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use regex::Regex;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use super::DS1000Z;
use super::acquire::AcquisitionType;
use super::block::{self, BLOCK_HEADER_LEN};

lazy_static! {
	static ref CHAN_RE: Regex = Regex::new("(?i)^(?:CHAN(?:NEL)?|CH|C)(\\d+)$").unwrap();
	static ref DIG_RE: Regex  = Regex::new("(?i)^D(\\d+)$").unwrap();
}

/// Channel whose waveform `:WAVeform:DATA?` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
	Channel(u8),
	Digital(u8),
	Math,
}

impl Source {

	pub fn channel(n:u8) -> Result<Self> { let s = Source::Channel(n); s.validate().map(|_| s) }
	pub fn digital(n:u8) -> Result<Self> { let s = Source::Digital(n); s.validate().map(|_| s) }

	pub fn validate(&self) -> Result<()> {
		match *self {
			Source::Channel(n) if !(1..=4).contains(&n) => Err(Error::InvalidArgument(format!("analog channel {} doesn't exist, expected 1-4", n))),
			Source::Digital(n) if n > 15 => Err(Error::InvalidArgument(format!("digital channel D{} doesn't exist, expected D0-D15", n))),
			_ => Ok(()),
		}
	}

}

impl fmt::Display for Source {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Source::Channel(n) => write!(f, "CHANnel{}", n),
			Source::Digital(n) => write!(f, "D{}", n),
			Source::Math       => write!(f, "MATH"),
		}
	}
}

impl FromStr for Source {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		let s = s.trim();
		let num = |caps:regex::Captures| caps[1].parse::<u8>()
			.map_err(|_| Error::InvalidArgument(format!("bad channel number in {:?}", s)));

		if s.eq_ignore_ascii_case("MATH") {
			Ok(Source::Math)
		} else if let Some(caps) = CHAN_RE.captures(s) {
			Source::channel(num(caps)?)
		} else if let Some(caps) = DIG_RE.captures(s) {
			Source::digital(num(caps)?)
		} else {
			Err(Error::parse("waveform source", s))
		}
	}
}

/// Which points `:WAVeform:DATA?` reads: the screen (NORMal), the screen or memory
/// depending on run state (MAXimum), or the internal memory (RAW)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveMode { Normal, Maximum, Raw }

impl fmt::Display for WaveMode {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			WaveMode::Normal  => "NORMal",
			WaveMode::Maximum => "MAXimum",
			WaveMode::Raw     => "RAW",
		})
	}
}

impl FromStr for WaveMode {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"NORM" | "NORMAL" => Ok(WaveMode::Normal),
			"MAX" | "MAXIMUM" => Ok(WaveMode::Maximum),
			"RAW"             => Ok(WaveMode::Raw),
			_ => Err(Error::parse("waveform mode", s)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveFormat { Byte, Word, Ascii }

impl WaveFormat {

	pub fn from_code(code:i64) -> Result<Self> {
		match code {
			0 => Ok(WaveFormat::Byte),
			1 => Ok(WaveFormat::Word),
			2 => Ok(WaveFormat::Ascii),
			_ => Err(Error::parse("waveform format", format!("unknown format code {}", code))),
		}
	}

	pub fn scpi(self) -> &'static str {
		match self {
			WaveFormat::Byte  => "BYTE",
			WaveFormat::Word  => "WORD",
			WaveFormat::Ascii => "ASCii",
		}
	}

	/// Most points a single `:WAVeform:DATA?` can return in this format
	pub fn max_points(self) -> usize {
		match self {
			WaveFormat::Byte  => 250_000,
			WaveFormat::Word  => 125_000,
			WaveFormat::Ascii => 15_625,
		}
	}

}

/// The ten fields of `:WAVeform:PREamble?`.  Read fresh before every transfer since source,
/// mode and the acquisition itself may have changed since the last one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformPreamble {
	pub format: WaveFormat,
	pub acquisition_type: AcquisitionType,
	pub points: usize,
	pub count: u32,
	pub x_increment: f64,
	pub x_origin: f64,
	pub x_reference: f64,
	pub y_increment: f64,
	pub y_origin: f64,
	pub y_reference: f64,
}

fn field<T: FromStr>(what:&'static str, s:&str) -> Result<T> {
	s.trim().parse::<T>().map_err(|_| Error::parse(what, format!("{:?} is not a number", s)))
}

impl FromStr for WaveformPreamble {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		let f:Vec<&str> = s.trim().split(',').collect();
		if f.len() != 10 {
			return Err(Error::parse("waveform preamble", format!("expected 10 fields, got {}", f.len())));
		}

		Ok(WaveformPreamble {
			format:           WaveFormat::from_code(field("preamble format", f[0])?)?,
			acquisition_type: AcquisitionType::from_code(field("preamble type", f[1])?)?,
			points:           field("preamble points", f[2])?,
			count:            field("preamble count", f[3])?,
			x_increment:      field("preamble xincrement", f[4])?,
			x_origin:         field("preamble xorigin", f[5])?,
			x_reference:      field("preamble xreference", f[6])?,
			y_increment:      field("preamble yincrement", f[7])?,
			y_origin:         field("preamble yorigin", f[8])?,
			y_reference:      field("preamble yreference", f[9])?,
		})
	}
}

impl WaveformPreamble {

	pub fn voltage(&self, sample:u8) -> f64 {
		(sample as f64 - self.y_origin - self.y_reference) * self.y_increment
	}

	/// Time of sample `i` measured from the first transferred sample.  This is the time axis
	/// `fetch_waveform` produces.
	pub fn sample_time(&self, i:usize) -> f64 { i as f64 * self.x_increment }

	/// Time of sample `i` relative to the trigger, anchored with XORigin and XREFerence
	pub fn absolute_time(&self, i:usize) -> f64 {
		self.x_origin + (i as f64 - self.x_reference) * self.x_increment
	}

}

/// 1-based inclusive range of points moved by one `:WAVeform:DATA?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformBlock {
	pub start: usize,
	pub stop: usize,
}

impl WaveformBlock {
	pub fn len(&self) -> usize { self.stop + 1 - self.start }
	pub fn is_empty(&self) -> bool { self.stop < self.start }
}

/// Splits `points` into contiguous blocks of at most `max_points`.  Every block is full
/// except possibly the last, and no empty block is produced when `points` divides evenly.
pub fn partition(points:usize, max_points:usize) -> Vec<WaveformBlock> {
	let max_points = max_points.max(1);
	let num_full_blocks = points / max_points;
	let last_block_pts  = points % max_points;

	let mut blocks:Vec<WaveformBlock> = (0..num_full_blocks)
		.map(|i| WaveformBlock{ start: 1 + i*max_points, stop: max_points*(i + 1) })
		.collect();

	if last_block_pts > 0 {
		blocks.push(WaveformBlock{
			start: 1 + num_full_blocks*max_points,
			stop:  num_full_blocks*max_points + last_block_pts,
		});
	}

	blocks
}

/// Unscaled samples together with the preamble needed to scale them
#[derive(Debug, Clone)]
pub struct RawWaveform {
	pub preamble: WaveformPreamble,
	pub samples: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaveformSeries {
	pub times: Vec<f64>,
	pub voltages: Vec<f64>,
}

impl WaveformSeries {

	pub fn from_samples(preamble:&WaveformPreamble, samples:&[u8]) -> Self {
		WaveformSeries {
			times:    (0..samples.len()).map(|i| preamble.sample_time(i)).collect(),
			voltages: samples.iter().map(|&s| preamble.voltage(s)).collect(),
		}
	}

	pub fn len(&self) -> usize { self.times.len() }
	pub fn is_empty(&self) -> bool { self.times.is_empty() }

	pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
		self.times.iter().copied().zip(self.voltages.iter().copied())
	}

	pub fn write_csv<W: Write>(&self, mut w:W) -> io::Result<()> {
		writeln!(w, "time,voltage")?;
		for (t, v) in self.iter() {
			writeln!(w, "{:e},{:e}", t, v)?;
		}
		w.flush()
	}

}

impl From<RawWaveform> for WaveformSeries {
	fn from(raw:RawWaveform) -> Self { WaveformSeries::from_samples(&raw.preamble, &raw.samples) }
}

impl<L: InstrumentLink> DS1000Z<L> {

	pub fn read_preamble(&mut self) -> Result<WaveformPreamble> {
		self.ask_str(":WAVeform:PREamble?")?.parse()
	}

	/// Stops acquisition and reads every point of `source` in `mode` as unscaled bytes
	pub fn fetch_waveform_raw(&mut self, source:Source, mode:WaveMode) -> Result<RawWaveform> {
		source.validate()?;

		// The sample buffer has to hold still while the blocks are read
		self.stop()?;
		self.send(&format!(":WAVeform:SOURce {}", source))?;
		self.send(&format!(":WAVeform:MODE {}", mode))?;
		self.send(&format!(":WAVeform:FORMat {}", WaveFormat::Byte.scpi()))?;

		let preamble = self.read_preamble()?;
		if preamble.format != WaveFormat::Byte {
			log::warn!("waveform: requested BYTE format but the preamble reports {:?}", preamble.format);
		}

		let blocks = partition(preamble.points, WaveFormat::Byte.max_points());
		let mut samples:Vec<u8> = Vec::with_capacity(preamble.points);

		for (idx, blk) in blocks.iter().enumerate() {
			self.send(&format!(":WAVeform:STARt {}", blk.start))?;
			self.send(&format!(":WAVeform:STOP {}", blk.stop))?;
			self.send(":WAVeform:DATA?")?;

			// Header, payload and the trailing newline
			let raw:Vec<u8> = self.link.read_raw(Some(BLOCK_HEADER_LEN + blk.len() + 1))?;
			if block::is_truncated_header(&raw) {
				return Err(Error::DataIntegrity{ start: blk.start, stop: blk.stop, expected: blk.len(), received: 0 });
			}
			let data = block::parse_block(&raw)?;

			if data.declared_len != blk.len() || !data.is_complete() {
				return Err(Error::DataIntegrity{ start: blk.start, stop: blk.stop, expected: blk.len(), received: data.payload.len() });
			}

			samples.extend_from_slice(data.payload);
			log::debug!("waveform: {} block {}/{} points {}..={}", source, idx + 1, blocks.len(), blk.start, blk.stop);
		}

		Ok(RawWaveform{ preamble, samples })
	}

	/// Reads every point of `source` in `mode` and scales it to seconds and volts
	pub fn fetch_waveform(&mut self, source:Source, mode:WaveMode) -> Result<WaveformSeries> {
		self.fetch_waveform_raw(source, mode).map(WaveformSeries::from)
	}

}
