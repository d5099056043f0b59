use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::error::Result;

pub const DEFAULT_DEVICE_NAME:&str = "inst0";
pub const DEFAULT_IO_TIMEOUT_MS:u32 = 10000;
pub const DEFAULT_LOCK_TIMEOUT_MS:u32 = 10000;

/// Session settings for a VXI-11 link and the driver sitting on top of it.
///
/// Every field has a default, so a JSON file only needs to name what it changes:
///
/// ```
/// let config: ds1000z::Config = serde_json::from_str(r#"{ "io_timeout_ms": 30000 }"#).unwrap();
/// assert_eq!(config.io_timeout_ms, 30000);
/// assert_eq!(config.device_name, "inst0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub device_name: String,
	pub io_timeout_ms: u32,
	pub lock_timeout_ms: u32,
	pub lock_device: bool,
	pub tx_throttle_ms: u64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			device_name: DEFAULT_DEVICE_NAME.to_owned(),
			io_timeout_ms: DEFAULT_IO_TIMEOUT_MS,
			lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
			lock_device: false,
			tx_throttle_ms: 0,
		}
	}
}

impl Config {

	pub fn from_json_file<P: AsRef<Path>>(path:P) -> Result<Self> {
		let text:String = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&text)?)
	}

	pub fn tx_throttle(&self) -> Duration { Duration::from_millis(self.tx_throttle_ms) }

}
