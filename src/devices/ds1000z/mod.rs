use std::str::FromStr;
use std::thread;
use std::time::Duration;

use regex::Regex;
use serde::{Serialize, Deserialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use crate::vxi11::CoreClient;

lazy_static! {
	static ref IDN_RE: Regex   = Regex::new("([^,]+),([^,]+),([^,]+),([^,\\s]+)").unwrap();
	static ref MODEL_RE: Regex = Regex::new("^(?:DS|MSO)1\\d{3}Z").unwrap();
}

pub mod acquire;
pub mod block;
pub mod channel;
pub mod measure;
pub mod screenshot;
pub mod timebase;
pub mod trigger;
pub mod waveform;

use acquire::{AcquisitionType, MemoryDepth};
use channel::ChannelState;

pub const NUM_CHANNELS:u8 = 4;

/// Rigol DS1000Z-series oscilloscope (DS1054Z, DS1104Z, MSO1104Z, ...) driven over any
/// `InstrumentLink`.  The driver owns its link for its whole life, which keeps every
/// multi-command operation on one uninterrupted command stream.
pub struct DS1000Z<L: InstrumentLink> {
	link: L,
	tx_throttle_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
	pub manufacturer: String,
	pub model: String,
	pub serial_num: String,
	pub fw_version: String,
}

#[derive(Debug, Serialize)]
pub struct State {
	pub identity: Identity,
	pub acquisition_type: AcquisitionType,
	pub memory_depth: MemoryDepth,
	pub sample_rate: f64,
	pub timebase_scale: f64,
	pub timebase_offset: f64,
	pub channels: Vec<ChannelState>,
}

impl FromStr for Identity {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		let caps = IDN_RE.captures(s).ok_or_else(|| Error::parse("*IDN? response", s))?;
		Ok(Identity {
			manufacturer: caps[1].trim().to_owned(),
			model:        caps[2].trim().to_owned(),
			serial_num:   caps[3].trim().to_owned(),
			fw_version:   caps[4].trim().to_owned(),
		})
	}
}

/// Parses a numeric query response, which the DS1000Z formats like `1.000000e-03`
pub(crate) fn parse_num<T: FromStr>(what:&'static str, s:&str) -> Result<T> {
	s.trim().parse::<T>().map_err(|_| Error::parse(what, format!("{:?}", s)))
}

impl DS1000Z<CoreClient> {

	/// Connects over VXI-11 and checks that the other end is a DS1000Z
	pub fn connect(host:&str, config:&Config) -> Result<Self> {
		let core = CoreClient::open(host, config)?;
		Self::new(core, config)
	}

}

impl<L: InstrumentLink> DS1000Z<L> {

	pub fn new(link:L, config:&Config) -> Result<Self> {
		let mut dev = Self{ link, tx_throttle_duration: config.tx_throttle() };

		let idn = dev.identify()?;
		if !MODEL_RE.is_match(&idn.model) {
			return Err(Error::UnexpectedModel(format!("{} {}", idn.manufacturer, idn.model)));
		}
		log::info!("connected to {} {} (serial {}, firmware {})", idn.manufacturer, idn.model, idn.serial_num, idn.fw_version);

		Ok(dev)
	}

	pub fn into_inner(self) -> L { self.link }

	pub fn link_mut(&mut self) -> &mut L { &mut self.link }

	/// Sends a command that has no response
	pub fn send(&mut self, cmd:&str) -> Result<()> {
		if !self.tx_throttle_duration.is_zero() { thread::sleep(self.tx_throttle_duration); }
		self.link.write(cmd)
	}

	pub fn ask_str(&mut self, cmd:&str) -> Result<String> {
		if !self.tx_throttle_duration.is_zero() { thread::sleep(self.tx_throttle_duration); }
		self.link.query(cmd)
	}

	pub(crate) fn ask_num<T: FromStr>(&mut self, what:&'static str, cmd:&str) -> Result<T> {
		let res:String = self.ask_str(cmd)?;
		parse_num(what, &res)
	}

	pub fn identify(&mut self) -> Result<Identity> { self.ask_str("*IDN?")?.parse() }

	pub fn get_full_state(&mut self) -> Result<State> {
		let identity = self.identify()?;

		let acquisition_type = self.get_acquisition_type()?;
		let memory_depth = self.get_memory_depth()?;
		let sample_rate = self.get_sample_rate()?;
		let timebase_scale = self.get_timebase_scale()?;
		let timebase_offset = self.get_timebase_offset()?;

		let channels = (1..=NUM_CHANNELS)
			.map(|n| self.get_channel_state(n))
			.collect::<Result<Vec<ChannelState>>>()?;

		Ok(State{ identity, acquisition_type, memory_depth, sample_rate, timebase_scale, timebase_offset, channels })
	}

	// One-liners
	pub fn run(&mut self)           -> Result<()> { self.send(":RUN")       }
	pub fn stop(&mut self)          -> Result<()> { self.send(":STOP")      }
	pub fn single(&mut self)        -> Result<()> { self.send(":SINGle")    }
	pub fn force_trigger(&mut self) -> Result<()> { self.send(":TFORce")    }
	pub fn autoscale(&mut self)     -> Result<()> { self.send(":AUToscale") }
	pub fn clear(&mut self)         -> Result<()> { self.send(":CLEar")     }
	pub fn reset(&mut self)         -> Result<()> { self.send("*RST")       }
	pub fn clear_status(&mut self)  -> Result<()> { self.send("*CLS")       }

	pub fn operation_complete(&mut self) -> Result<bool> {
		Ok(self.ask_num::<u8>("*OPC? response", "*OPC?")? == 1)
	}

}
