
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use byteorder::{BigEndian, WriteBytesExt, ReadBytesExt};

use crate::error::TransportError;
use crate::xdr;
use super::{xdr_pack, xdr_unpack, LAST_FRAGMENT};

/// Writes one RPC call as a single, final record marking fragment
pub fn write_record<W: Write>(w:&mut W, call:&[u8]) -> io::Result<()> {
	let mut send_bytes:Vec<u8> = Vec::with_capacity(call.len() + 4);
	send_bytes.write_u32::<BigEndian>(call.len() as u32 | LAST_FRAGMENT)?;
	send_bytes.extend_from_slice(call);
	w.write_all(&send_bytes)?;
	w.flush()
}

/// Reads fragments until the one flagged as last and returns the reassembled record
pub fn read_record<R: Read>(r:&mut R) -> io::Result<Vec<u8>> {
	let mut reply:Vec<u8> = vec![];

	let mut last:bool = false;
	while !last {
		let x:u32 = r.read_u32::<BigEndian>()?;

		last = (x & LAST_FRAGMENT) != 0;
		let n = (x & !LAST_FRAGMENT) as usize;
		log::trace!("rpc: fragment of {} bytes (last={})", n, last);

		let start = reply.len();
		reply.resize(start + n, 0);
		r.read_exact(&mut reply[start..])?;
	}

	Ok(reply)
}

pub struct TcpClient {
	pub stream: TcpStream,
	pub prog: u32,
	pub vers: u32,
	pub lastxid: u32,
	pub packer: xdr::Packer,
	pub unpacker: xdr::Unpacker,
}

impl TcpClient {

	pub fn connect<A: ToSocketAddrs>(addr: A, prog: u32, vers: u32) -> io::Result<Self> {
		let stream = TcpStream::connect(addr)?;
		stream.set_nodelay(true)?;
		Ok(Self{ stream, prog, vers, lastxid: 0, packer: xdr::Packer::new(), unpacker: xdr::Unpacker::new() })
	}

	pub fn set_timeout(&mut self, timeout:Option<Duration>) -> io::Result<()> {
		self.stream.set_read_timeout(timeout)?;
		self.stream.set_write_timeout(timeout)
	}

	/// Starts a new call: bumps the xid, clears the packer and packs the call header.  The
	/// procedure's arguments get packed after this and then `do_call` sends it.
	pub fn start_call(&mut self, prc:u32) -> io::Result<()> {
		self.lastxid = self.lastxid.wrapping_add(1);
		self.packer.reset();
		xdr_pack::pack_callheader_no_auth(&mut self.packer, self.lastxid, self.prog, self.vers, prc)
	}

	/// Sends the packed call and loads the matching reply into the unpacker, positioned at the results
	pub fn do_call(&mut self) -> Result<(), TransportError> {
		log::trace!("rpc: call xid={} ({} bytes)", self.lastxid, self.packer.get_buf().len());
		write_record(&mut self.stream, self.packer.get_buf())?;

		loop {
			let reply:Vec<u8> = read_record(&mut self.stream)?;

			// Load the response into the unpacker and make sure the xid matches
			self.unpacker.reset(&reply);

			let xid = xdr_unpack::unpack_replyheader(&mut self.unpacker)?;
			if xid == self.lastxid {
				return Ok(());
			} else if xid < self.lastxid {
				// Reply to a call we already gave up on
				log::trace!("rpc: discarding stale reply xid={}", xid);
				continue;
			} else {
				return Err(TransportError::Rpc("got a reply to a call that hasn't been made"));
			}
		}
	}

}
