use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::link::InstrumentLink;
use super::DS1000Z;
use super::block;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat { Jpeg, Png, Bmp8, Bmp24, Tiff }

impl fmt::Display for ImageFormat {
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ImageFormat::Jpeg  => "JPEG",
			ImageFormat::Png   => "PNG",
			ImageFormat::Bmp8  => "BMP8",
			ImageFormat::Bmp24 => "BMP24",
			ImageFormat::Tiff  => "TIFF",
		})
	}
}

impl FromStr for ImageFormat {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self> {
		match s.trim().to_ascii_uppercase().as_str() {
			"JPEG" | "JPG" => Ok(ImageFormat::Jpeg),
			"PNG"          => Ok(ImageFormat::Png),
			"BMP8"         => Ok(ImageFormat::Bmp8),
			"BMP24" | "BMP" => Ok(ImageFormat::Bmp24),
			"TIFF" | "TIF" => Ok(ImageFormat::Tiff),
			_ => Err(Error::parse("image format", s)),
		}
	}
}

impl<L: InstrumentLink> DS1000Z<L> {

	/// Downloads the screen as an image, with the menu shown and colors kept.  JPEG takes a
	/// few seconds on the instrument, the other formats well under one.
	pub fn screenshot(&mut self, format:ImageFormat) -> Result<Vec<u8>> {
		self.send(&format!(":DISPlay:DATA? ON,OFF,{}", format))?;

		let raw:Vec<u8> = self.link.read_raw(None)?;
		let data = block::parse_block(&raw)?;
		if !data.is_complete() {
			return Err(Error::IncompleteTransfer{ expected: data.declared_len, received: data.payload.len() });
		}

		log::debug!("screenshot: {} bytes of {}", data.payload.len(), format);
		Ok(data.payload.to_vec())
	}

}
