use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use super::DS1000Z;

pub const DEFAULT_POLL_INTERVAL_SEC:f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerStatus { Triggered, Wait, Run, Auto, Stop }

impl FromStr for TriggerStatus {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"TD"   => Ok(TriggerStatus::Triggered),
			"WAIT" => Ok(TriggerStatus::Wait),
			"RUN"  => Ok(TriggerStatus::Run),
			"AUTO" => Ok(TriggerStatus::Auto),
			"STOP" => Ok(TriggerStatus::Stop),
			_ => Err(Error::parse("trigger status", s)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerSweep { Auto, Normal, Single }

impl fmt::Display for TriggerSweep {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TriggerSweep::Auto   => "AUTO",
			TriggerSweep::Normal => "NORMal",
			TriggerSweep::Single => "SINGle",
		})
	}
}

impl FromStr for TriggerSweep {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"AUTO"            => Ok(TriggerSweep::Auto),
			"NORM" | "NORMAL" => Ok(TriggerSweep::Normal),
			"SING" | "SINGLE" => Ok(TriggerSweep::Single),
			_ => Err(Error::parse("trigger sweep", s)),
		}
	}
}

impl<L: InstrumentLink> DS1000Z<L> {

	pub fn get_trigger_status(&mut self) -> Result<TriggerStatus> {
		self.ask_str(":TRIGger:STATus?")?.parse()
	}

	pub fn get_trigger_sweep(&mut self) -> Result<TriggerSweep> {
		self.ask_str(":TRIGger:SWEep?")?.parse()
	}

	pub fn set_trigger_sweep(&mut self, sweep:TriggerSweep) -> Result<()> {
		self.send(&format!(":TRIGger:SWEep {}", sweep))
	}

	pub fn arm_single(&mut self) -> Result<()> {
		self.set_trigger_sweep(TriggerSweep::Single)?;
		self.single()
	}

	/// Blocks until the acquisition has stopped, e.g. after a single-shot trigger
	pub fn wait(&mut self) -> Result<()> {
		let t = Duration::from_secs_f32(DEFAULT_POLL_INTERVAL_SEC);
		while self.get_trigger_status()? != TriggerStatus::Stop {
			thread::sleep(t);
		}

		Ok(())
	}

}
