use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use super::DS1000Z;
use super::waveform::Source;

/// What the instrument answers for a quantity it can't measure on the current trace
pub const NO_MEASUREMENT:f64 = 9.9e37;

fn measured(v:f64) -> Option<f64> {
	if v.abs() >= NO_MEASUREMENT { None } else { Some(v) }
}

/// Automatic measurement quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureItem {
	VMax, VMin, VPp, VTop, VBase, VAmp, VAvg, VRms,
	Overshoot, Preshoot, Area, PeriodArea,
	Period, Frequency, RiseTime, FallTime, PosWidth, NegWidth, PosDuty, NegDuty,
	RiseDelay, FallDelay, RisePhase, FallPhase,
	TimeAtVMax, TimeAtVMin, PosSlewRate, NegSlewRate,
	VUpper, VMid, VLower, Variance, PeriodVRms,
	PosPulses, NegPulses, PosEdges, NegEdges,
}

// Long form of each token.  Its capitals are the short form the instrument also accepts.
const ITEMS:[(MeasureItem, &str); 37] = [
	(MeasureItem::VMax, "VMAX"), (MeasureItem::VMin, "VMIN"), (MeasureItem::VPp, "VPP"),
	(MeasureItem::VTop, "VTOP"), (MeasureItem::VBase, "VBASe"), (MeasureItem::VAmp, "VAMP"),
	(MeasureItem::VAvg, "VAVG"), (MeasureItem::VRms, "VRMS"),
	(MeasureItem::Overshoot, "OVERshoot"), (MeasureItem::Preshoot, "PREShoot"),
	(MeasureItem::Area, "MARea"), (MeasureItem::PeriodArea, "MPARea"),
	(MeasureItem::Period, "PERiod"), (MeasureItem::Frequency, "FREQuency"),
	(MeasureItem::RiseTime, "RTIMe"), (MeasureItem::FallTime, "FTIMe"),
	(MeasureItem::PosWidth, "PWIDth"), (MeasureItem::NegWidth, "NWIDth"),
	(MeasureItem::PosDuty, "PDUTy"), (MeasureItem::NegDuty, "NDUTy"),
	(MeasureItem::RiseDelay, "RDELay"), (MeasureItem::FallDelay, "FDELay"),
	(MeasureItem::RisePhase, "RPHase"), (MeasureItem::FallPhase, "FPHase"),
	(MeasureItem::TimeAtVMax, "TVMAX"), (MeasureItem::TimeAtVMin, "TVMIN"),
	(MeasureItem::PosSlewRate, "PSLEWrate"), (MeasureItem::NegSlewRate, "NSLEWrate"),
	(MeasureItem::VUpper, "VUPper"), (MeasureItem::VMid, "VMID"), (MeasureItem::VLower, "VLOWer"),
	(MeasureItem::Variance, "VARIance"), (MeasureItem::PeriodVRms, "PVRMs"),
	(MeasureItem::PosPulses, "PPULses"), (MeasureItem::NegPulses, "NPULses"),
	(MeasureItem::PosEdges, "PEDGes"), (MeasureItem::NegEdges, "NEDGes"),
];

impl fmt::Display for MeasureItem {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		let token = ITEMS.iter().find(|(item, _)| item == self).map(|(_, tok)| *tok).unwrap_or("");
		f.write_str(token)
	}
}

impl FromStr for MeasureItem {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		let s = s.trim().to_ascii_uppercase();
		ITEMS.iter()
			.find(|(_, tok)| {
				let short:String = tok.chars().filter(|c| c.is_ascii_uppercase()).collect();
				s == tok.to_ascii_uppercase() || s == short
			})
			.map(|(item, _)| *item)
			.ok_or_else(|| Error::parse("measurement item", s))
	}
}

/// One of the five measurement slots shown on screen, or all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSlot { Item(u8), All }

impl fmt::Display for MeasureSlot {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MeasureSlot::Item(n) => write!(f, "ITEM{}", n),
			MeasureSlot::All     => f.write_str("ALL"),
		}
	}
}

fn slot_ok(slot:MeasureSlot) -> Result<()> {
	match slot {
		MeasureSlot::Item(n) if !(1..=5).contains(&n) => Err(Error::InvalidArgument(format!("measurement slots are ITEM1-ITEM5, got ITEM{}", n))),
		_ => Ok(()),
	}
}

// Analog, digital or math, or OFF
fn parse_optional_source(s:&str) -> Result<Option<Source>> {
	if s.trim().eq_ignore_ascii_case("OFF") { Ok(None) } else { s.parse().map(Some) }
}

fn source_token(source:Option<Source>) -> Result<String> {
	match source {
		Some(s) => { s.validate()?; Ok(s.to_string()) },
		None => Ok("OFF".to_owned()),
	}
}

impl<L: InstrumentLink> DS1000Z<L> {

	/// Measures `item` on `source`.  `None` means the trace doesn't allow the measurement,
	/// e.g. a frequency without a full period on screen.
	pub fn get_measurement(&mut self, item:MeasureItem, source:Source) -> Result<Option<f64>> {
		source.validate()?;
		let v:f64 = self.ask_num("measurement", &format!(":MEASure:ITEM? {},{}", item, source))?;
		Ok(measured(v))
	}

	/// Adds `item` on `source` to the measurements shown on screen
	pub fn show_measurement(&mut self, item:MeasureItem, source:Source) -> Result<()> {
		source.validate()?;
		self.send(&format!(":MEASure:ITEM {},{}", item, source))
	}

	pub fn clear_measurement(&mut self, slot:MeasureSlot) -> Result<()> {
		slot_ok(slot)?;
		self.send(&format!(":MEASure:CLEar {}", slot))
	}

	pub fn recover_measurement(&mut self, slot:MeasureSlot) -> Result<()> {
		slot_ok(slot)?;
		self.send(&format!(":MEASure:RECover {}", slot))
	}

	/// Default source for measurements added without one
	pub fn get_measure_source(&mut self) -> Result<Option<Source>> {
		let res:String = self.ask_str(":MEASure:SOURce?")?;
		parse_optional_source(&res)
	}

	pub fn set_measure_source(&mut self, source:Option<Source>) -> Result<()> {
		let token = source_token(source)?;
		self.send(&format!(":MEASure:SOURce {}", token))
	}

	pub fn get_counter_source(&mut self) -> Result<Option<Source>> {
		let res:String = self.ask_str(":MEASure:COUNter:SOURce?")?;
		parse_optional_source(&res)
	}

	pub fn set_counter_source(&mut self, source:Option<Source>) -> Result<()> {
		let token = source_token(source)?;
		self.send(&format!(":MEASure:COUNter:SOURce {}", token))
	}

	/// Frequency counter reading [Hz]
	pub fn get_counter_value(&mut self) -> Result<Option<f64>> {
		let v:f64 = self.ask_num("counter value", ":MEASure:COUNter:VALue?")?;
		Ok(measured(v))
	}

	pub fn reset_statistics(&mut self) -> Result<()> { self.send(":MEASure:STATistic:RESet") }

}
