// IEEE 488.2 definite-length binary blocks: '#', one digit n, n digits of payload length, payload,
// then usually a '\n' that isn't part of the payload.  The DS1000Z always sends n=9.

use std::str;

use crate::error::{Error, Result};

/// Header width the DS1000Z uses for every block ("#9" and nine length digits)
pub const BLOCK_HEADER_LEN:usize = 11;

#[derive(Debug, PartialEq)]
pub struct Block<'a> {
	/// Payload length announced by the header
	pub declared_len: usize,
	/// Payload bytes that actually arrived, never longer than `declared_len`
	pub payload: &'a [u8],
}

impl<'a> Block<'a> {
	pub fn is_complete(&self) -> bool { self.payload.len() == self.declared_len }
}

pub fn parse_block(raw:&[u8]) -> Result<Block<'_>> {
	if raw.first() != Some(&b'#') {
		return Err(Error::parse("binary block header", "response doesn't start with '#'"));
	}

	let n_digits:usize = match raw.get(1) {
		Some(c @ b'1'..=b'9') => (c - b'0') as usize,
		Some(b'0') => return Err(Error::parse("binary block header", "indefinite-length blocks aren't supported")),
		_ => return Err(Error::parse("binary block header", "missing length digit count")),
	};

	let len_field:&[u8] = raw.get(2..2 + n_digits)
		.ok_or_else(|| Error::parse("binary block header", "header cut short"))?;
	let declared_len:usize = str::from_utf8(len_field).ok()
		.filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
		.and_then(|s| s.parse::<usize>().ok())
		.ok_or_else(|| Error::parse("binary block header", format!("bad length field {:?}", String::from_utf8_lossy(len_field))))?;

	let body:&[u8] = &raw[2 + n_digits..];
	let payload:&[u8] = &body[..body.len().min(declared_len)];

	Ok(Block{ declared_len, payload })
}

/// True when `raw` stops part way through an otherwise well-formed header, which is what a
/// transfer cut off after its first few bytes looks like
pub fn is_truncated_header(raw:&[u8]) -> bool {
	let n_digits:usize = match raw.get(1) {
		Some(c @ b'1'..=b'9') => (c - b'0') as usize,
		Some(_) => return false,
		None => return raw.len() < 2 && raw.iter().all(|&b| b == b'#'),
	};

	raw[0] == b'#' && raw.len() < 2 + n_digits && raw[2..].iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn block(payload:&[u8]) -> Vec<u8> {
		let mut raw = format!("#9{:09}", payload.len()).into_bytes();
		raw.extend_from_slice(payload);
		raw.push(b'\n');
		raw
	}

	#[test]
	fn eleven_byte_header_is_stripped_exactly() {
		let payload:Vec<u8> = (0..=255).collect();
		let raw = block(&payload);
		assert_eq!(raw.len(), BLOCK_HEADER_LEN + payload.len() + 1);

		let parsed = parse_block(&raw).unwrap();
		assert_eq!(parsed.declared_len, 256);
		assert_eq!(parsed.payload, &payload[..]);
		assert!(parsed.is_complete());
	}

	#[test]
	fn shorter_header_forms_are_accepted() {
		let parsed = parse_block(b"#15hello\n").unwrap();
		assert_eq!(parsed.payload, b"hello");
	}

	#[test]
	fn truncated_payload_is_reported_incomplete() {
		let mut raw = block(&[7; 100]);
		raw.truncate(BLOCK_HEADER_LEN + 90);

		let parsed = parse_block(&raw).unwrap();
		assert_eq!(parsed.declared_len, 100);
		assert_eq!(parsed.payload.len(), 90);
		assert!(!parsed.is_complete());
	}

	#[test]
	fn cut_off_headers_are_told_apart_from_garbage() {
		assert!(is_truncated_header(b""));
		assert!(is_truncated_header(b"#"));
		assert!(is_truncated_header(b"#9"));
		assert!(is_truncated_header(b"#9000"));
		assert!(is_truncated_header(b"#900000120"));

		assert!(!is_truncated_header(b"#9000001200"));
		assert!(!is_truncated_header(b"#0abc"));
		assert!(!is_truncated_header(b"#3x1"));
		assert!(!is_truncated_header(b"ERR"));
	}

	#[test]
	fn malformed_headers_are_parse_errors() {
		let cases:[&[u8]; 6] = [b"", b"9000000010", b"#", b"#0abc", b"#9000", b"#3x12abc"];
		for raw in cases.iter() {
			assert!(matches!(parse_block(raw), Err(Error::Parse{ .. })), "{:?}", raw);
		}
	}
}
