
pub const PMAP_PROG:u32 = 100000;
pub const PMAP_VERS:u32 = 2;
pub const PMAP_PORT:u16 = 111;

pub const PMAPPROC_GETPORT:u32 = 3;     // (mapping) -> unsigned int

use crate::error::TransportError;

use super::IPPROTO_TCP;
use super::xdr_pack;
use super::tcp_clients::TcpClient;

#[derive(Debug)]
pub struct Mapping {
	pub program: u32,
	pub version: u32,
	pub port: u32,				// XDR encodes it as a u32 even though only 16 bits are used
}

pub struct TcpPortMapperClient {
	pub host: String,
	pub tcp_client: TcpClient,
}

impl TcpPortMapperClient {

	pub fn new(host:&str) -> Result<Self, TransportError> {
		let tcp_client = TcpClient::connect((host, PMAP_PORT), PMAP_PROG, PMAP_VERS)?;
		Ok(Self{ host: host.to_owned(), tcp_client })
	}

	/// Asks the port mapper which TCP port the given program listens on.  A port of zero means
	/// the program isn't registered.
	pub fn get_port(&mut self, m:&Mapping) -> Result<u16, TransportError> {
		self.tcp_client.start_call(PMAPPROC_GETPORT)?;
		xdr_pack::pack_mapping(&mut self.tcp_client.packer, m.program, m.version, IPPROTO_TCP, m.port)?;
		self.tcp_client.do_call()?;

		let ans:u32 = self.tcp_client.unpacker.unpack_u32()?;

		if !self.tcp_client.unpacker.all_data_consumed() {
			return Err(TransportError::Xdr("data unexpectedly left over after unpacking port"));
		}
		if ans == 0 || ans > u16::MAX as u32 {
			return Err(TransportError::Rpc("program not registered with the port mapper"));
		}

		log::debug!("portmap: {}: program {:#x} v{} on port {}", self.host, m.program, m.version, ans);
		Ok(ans as u16)
	}

}
