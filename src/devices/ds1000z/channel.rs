use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use super::{DS1000Z, NUM_CHANNELS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coupling { AC, DC, GND }

impl fmt::Display for Coupling {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Coupling::AC  => "AC",
			Coupling::DC  => "DC",
			Coupling::GND => "GND",
		})
	}
}

impl FromStr for Coupling {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"AC"  => Ok(Coupling::AC),
			"DC"  => Ok(Coupling::DC),
			"GND" => Ok(Coupling::GND),
			_ => Err(Error::parse("channel coupling", s)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
	pub channel: u8,
	pub display_enabled: bool,
	pub scale: f64,
	pub offset: f64,
	pub coupling: Coupling,
}

pub fn chan_ok(n:u8) -> Result<()> {
	if n == 0 || n > NUM_CHANNELS { Err(Error::InvalidArgument(format!("DS1000Z only has {} analog channels, got {}", NUM_CHANNELS, n))) }
	else { Ok(()) }
}

impl<L: InstrumentLink> DS1000Z<L> {

	pub fn get_channel_state(&mut self, n:u8) -> Result<ChannelState> {
		chan_ok(n)?;

		let display_enabled = self.get_channel_display(n)?;
		let scale = self.get_channel_scale(n)?;
		let offset = self.get_channel_offset(n)?;
		let coupling = self.get_channel_coupling(n)?;

		Ok(ChannelState{ channel: n, display_enabled, scale, offset, coupling })
	}

	pub fn get_channel_display(&mut self, n:u8) -> Result<bool> {
		chan_ok(n)?;
		let res:String = self.ask_str(&format!(":CHANnel{}:DISPlay?", n))?;
		match res.trim() {
			"1" | "ON"  => Ok(true),
			"0" | "OFF" => Ok(false),
			other => Err(Error::parse("channel display state", other)),
		}
	}

	pub fn set_channel_display(&mut self, n:u8, on:bool) -> Result<()> {
		chan_ok(n)?;
		self.send(&format!(":CHANnel{}:DISPlay {}", n, if on { 1 } else { 0 }))
	}

	/// Vertical scale [V/div]
	pub fn get_channel_scale(&mut self, n:u8) -> Result<f64> {
		chan_ok(n)?;
		self.ask_num("channel scale", &format!(":CHANnel{}:SCALe?", n))
	}

	pub fn set_channel_scale(&mut self, n:u8, volts_per_div:f64) -> Result<()> {
		chan_ok(n)?;
		self.send(&format!(":CHANnel{}:SCALe {:e}", n, volts_per_div))
	}

	/// Vertical offset [V]
	pub fn get_channel_offset(&mut self, n:u8) -> Result<f64> {
		chan_ok(n)?;
		self.ask_num("channel offset", &format!(":CHANnel{}:OFFSet?", n))
	}

	pub fn set_channel_offset(&mut self, n:u8, volts:f64) -> Result<()> {
		chan_ok(n)?;
		self.send(&format!(":CHANnel{}:OFFSet {:e}", n, volts))
	}

	pub fn get_channel_coupling(&mut self, n:u8) -> Result<Coupling> {
		chan_ok(n)?;
		self.ask_str(&format!(":CHANnel{}:COUPling?", n))?.parse()
	}

	pub fn set_channel_coupling(&mut self, n:u8, coupling:Coupling) -> Result<()> {
		chan_ok(n)?;
		self.send(&format!(":CHANnel{}:COUPling {}", n, coupling))
	}

}
