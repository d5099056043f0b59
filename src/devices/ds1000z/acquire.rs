use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use super::{DS1000Z, parse_num};

pub const MIN_AVERAGES:u32 = 2;
pub const MAX_AVERAGES:u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionType { Normal, Average, Peak, HighResolution }

impl AcquisitionType {

	/// Decodes the type field of the waveform preamble
	pub fn from_code(code:i64) -> Result<Self> {
		match code {
			0 => Ok(AcquisitionType::Normal),
			1 => Ok(AcquisitionType::Average),
			2 => Ok(AcquisitionType::Peak),
			3 => Ok(AcquisitionType::HighResolution),
			_ => Err(Error::parse("acquisition type", format!("unknown type code {}", code))),
		}
	}

}

impl fmt::Display for AcquisitionType {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			AcquisitionType::Normal         => "NORMal",
			AcquisitionType::Average        => "AVERages",
			AcquisitionType::Peak           => "PEAK",
			AcquisitionType::HighResolution => "HRESolution",
		})
	}
}

impl FromStr for AcquisitionType {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"NORM" | "NORMAL"      => Ok(AcquisitionType::Normal),
			"AVER" | "AVERAGES"    => Ok(AcquisitionType::Average),
			"PEAK"                 => Ok(AcquisitionType::Peak),
			"HRES" | "HRESOLUTION" => Ok(AcquisitionType::HighResolution),
			_ => Err(Error::parse("acquisition type", s)),
		}
	}
}

/// Points stored per trigger.  Which depths are legal depends on how many channels are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryDepth {
	Auto,
	Points(u64),
}

impl fmt::Display for MemoryDepth {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MemoryDepth::Auto      => f.write_str("AUTO"),
			MemoryDepth::Points(n) => write!(f, "{}", n),
		}
	}
}

impl FromStr for MemoryDepth {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		let s = s.trim();
		if s.eq_ignore_ascii_case("AUTO") {
			Ok(MemoryDepth::Auto)
		} else {
			// Queries may answer in scientific notation
			let n:f64 = parse_num("memory depth", s)?;
			if n < 0.0 || n.fract() != 0.0 {
				return Err(Error::parse("memory depth", s));
			}
			Ok(MemoryDepth::Points(n as u64))
		}
	}
}

/// Rounds an average count down to the power of two the instrument accepts
pub fn round_averages(count:u32) -> Result<u32> {
	if count < MIN_AVERAGES {
		return Err(Error::InvalidArgument(format!("average count must be at least {}, got {}", MIN_AVERAGES, count)));
	}
	let pow2 = 1u32 << (31 - count.leading_zeros());
	Ok(pow2.min(MAX_AVERAGES))
}

impl<L: InstrumentLink> DS1000Z<L> {

	pub fn get_acquisition_type(&mut self) -> Result<AcquisitionType> {
		self.ask_str(":ACQuire:TYPE?")?.parse()
	}

	pub fn set_acquisition_type(&mut self, t:AcquisitionType) -> Result<()> {
		self.send(&format!(":ACQuire:TYPE {}", t))
	}

	pub fn get_averages(&mut self) -> Result<u32> {
		self.ask_num("average count", ":ACQuire:AVERages?")
	}

	/// Sets the average count, rounded down to a power of two and capped at 1024.  Returns the
	/// count actually sent.
	pub fn set_averages(&mut self, count:u32) -> Result<u32> {
		let count = round_averages(count)?;
		self.send(&format!(":ACQuire:AVERages {}", count))?;
		Ok(count)
	}

	pub fn get_memory_depth(&mut self) -> Result<MemoryDepth> {
		self.ask_str(":ACQuire:MDEPth?")?.parse()
	}

	pub fn set_memory_depth(&mut self, depth:MemoryDepth) -> Result<()> {
		self.send(&format!(":ACQuire:MDEPth {}", depth))
	}

	/// Current sample rate [Sa/s]
	pub fn get_sample_rate(&mut self) -> Result<f64> {
		self.ask_num("sample rate", ":ACQuire:SRATe?")
	}

}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn averages_round_down_to_powers_of_two() {
		assert_eq!(round_averages(2).unwrap(), 2);
		assert_eq!(round_averages(3).unwrap(), 2);
		assert_eq!(round_averages(100).unwrap(), 64);
		assert_eq!(round_averages(1024).unwrap(), 1024);
		assert_eq!(round_averages(5000).unwrap(), 1024);
		assert!(round_averages(1).is_err());
		assert!(round_averages(0).is_err());
	}

	#[test]
	fn memory_depth_responses() {
		assert_eq!("AUTO".parse::<MemoryDepth>().unwrap(), MemoryDepth::Auto);
		assert_eq!("12000".parse::<MemoryDepth>().unwrap(), MemoryDepth::Points(12000));
		assert_eq!("1.2000e+07".parse::<MemoryDepth>().unwrap(), MemoryDepth::Points(12_000_000));
		assert!("12.5".parse::<MemoryDepth>().is_err());
		assert_eq!(MemoryDepth::Points(24_000_000).to_string(), "24000000");
	}

	#[test]
	fn acquisition_type_tokens() {
		assert_eq!("HRES".parse::<AcquisitionType>().unwrap(), AcquisitionType::HighResolution);
		assert_eq!(AcquisitionType::Average.to_string(), "AVERages");
		assert!(AcquisitionType::from_code(4).is_err());
	}
}
