use crate::error::Result;
use crate::link::InstrumentLink;
use super::DS1000Z;

impl<L: InstrumentLink> DS1000Z<L> {

	/// Main timebase scale [s/div]
	pub fn get_timebase_scale(&mut self) -> Result<f64> {
		self.ask_num("timebase scale", ":TIMebase:MAIN:SCALe?")
	}

	pub fn set_timebase_scale(&mut self, secs_per_div:f64) -> Result<()> {
		self.send(&format!(":TIMebase:MAIN:SCALe {:e}", secs_per_div))
	}

	/// Main timebase offset [s]
	pub fn get_timebase_offset(&mut self) -> Result<f64> {
		self.ask_num("timebase offset", ":TIMebase:MAIN:OFFSet?")
	}

	pub fn set_timebase_offset(&mut self, secs:f64) -> Result<()> {
		self.send(&format!(":TIMebase:MAIN:OFFSet {:e}", secs))
	}

}
