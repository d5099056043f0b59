// Device core
pub const DEVICE_CORE_PROG:u32  = 0x0607af;
pub const DEVICE_CORE_VERS:u32  = 1;
pub const CREATE_LINK:u32       = 10;
pub const DEVICE_WRITE:u32      = 11;
pub const DEVICE_READ:u32       = 12;
pub const DESTROY_LINK:u32      = 23;

pub const CLIENT_ID:i32 = 3333;

pub const OPERATION_FLAGS_END_ONLY:i32 = 8;

// Reason bits returned by device_read
pub const REASON_REQCNT:i32 = 1;
pub const REASON_CHR:i32    = 2;
pub const REASON_END:i32    = 4;

use std::time::Duration;

use crate::config::Config;
use crate::error::TransportError;
use crate::rpc::port_mapping::{TcpPortMapperClient, Mapping};
use crate::rpc::tcp_clients::TcpClient;

pub mod xdr_pack;

type Result<T> = std::result::Result<T, TransportError>;

pub struct CoreClient {
    client: TcpClient,
    opt_link: Option<Link>,
    config: Config,
}

#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub link_id: i32,
    pub abort_port: u32,
    pub max_recv_size: u32,
}

fn check(procedure:&'static str, code:i32) -> Result<()> {
    match code {
        0 => Ok(()),
        _ => Err(TransportError::Device{ procedure, code }),
    }
}

/// What to do after a `device_read` reply, given its reason bits and how much has arrived
#[derive(Debug, PartialEq)]
enum ReadProgress { Done, More }

fn read_progress(reason:i32, received:usize, max_bytes:Option<usize>) -> Result<ReadProgress> {
    if reason & REASON_END != 0 {
        return Ok(ReadProgress::Done);
    }
    if reason & (REASON_REQCNT | REASON_CHR) == 0 {
        return Err(TransportError::Rpc("expected one of three reason bits to be set"));
    }
    match max_bytes {
        Some(max) if received >= max => Ok(ReadProgress::Done),
        _ => Ok(ReadProgress::More),
    }
}

impl CoreClient {

    fn get_link(&self) -> Result<Link> {
        self.opt_link.ok_or(TransportError::NoLink)
    }

    pub fn new(host:&str, config:&Config) -> Result<Self> {

        // Find the port to use for the core program
        let mut pmap_client = TcpPortMapperClient::new(host)?;

        let mapping = Mapping {
            program: DEVICE_CORE_PROG,
            version: DEVICE_CORE_VERS,
            port: 0,
        };

        let port = pmap_client.get_port(&mapping)?;

        let mut client = TcpClient::connect((host, port), DEVICE_CORE_PROG, DEVICE_CORE_VERS)?;

        // Leave the device's own I/O timeout room to expire first so it gets reported as a VXI-11 error
        let socket_timeout = Duration::from_millis(config.io_timeout_ms as u64) * 2 + Duration::from_secs(1);
        client.set_timeout(Some(socket_timeout))?;

        Ok(CoreClient{ client, opt_link: None, config: config.clone() })
    }

    /// Opens a client and creates a link to the configured device in one go
    pub fn open(host:&str, config:&Config) -> Result<Self> {
        let mut core = Self::new(host, config)?;
        core.create_link()?;
        Ok(core)
    }

    pub fn link(&self) -> Option<Link> { self.opt_link }

    pub fn create_link(&mut self) -> Result<()> {
        if self.opt_link.is_some() {
            return Err(TransportError::AlreadyLinked);
        }

        self.client.start_call(CREATE_LINK)?;
        xdr_pack::pack_create_link_parms(&mut self.client.packer, CLIENT_ID, self.config.lock_device,
            self.config.lock_timeout_ms, &self.config.device_name)?;

        self.client.do_call()?;

        let error:i32         = self.client.unpacker.unpack_i32()?;
        let link_id:i32       = self.client.unpacker.unpack_i32()?;
        let abort_port:u32    = self.client.unpacker.unpack_u32()?;
        let max_recv_size:u32 = self.client.unpacker.unpack_u32()?;

        check("create_link", error)?;

        log::debug!("vxi11: created link {} to {} (max_recv_size={})", link_id, self.config.device_name, max_recv_size);
        self.opt_link = Some(Link{ link_id, abort_port, max_recv_size });
        Ok(())
    }

    pub fn ask(&mut self, data:&[u8]) -> Result<Vec<u8>> {
        self.write(data)?;
        self.read(None)
    }

    /// Writes `data` to the device, split into pieces no larger than the link accepts.  Only
    /// the last piece carries the END flag.
    pub fn write(&mut self, data:&[u8]) -> Result<()> {
        let link = self.get_link()?;
        let chunk_size = (link.max_recv_size as usize).max(1);

        let mut chunks = data.chunks(chunk_size).peekable();
        while let Some(chunk) = chunks.next() {
            let flags = if chunks.peek().is_none() { OPERATION_FLAGS_END_ONLY } else { 0 };

            self.client.start_call(DEVICE_WRITE)?;
            xdr_pack::pack_device_write_parms(&mut self.client.packer, link.link_id, self.config.io_timeout_ms,
                self.config.lock_timeout_ms, flags, chunk)?;
            self.client.do_call()?;

            let error:i32 = self.client.unpacker.unpack_i32()?;
            let size:u32  = self.client.unpacker.unpack_u32()?;

            check("device_write", error)?;
            if size as usize != chunk.len() {
                return Err(TransportError::ShortWrite{ sent: chunk.len(), confirmed: size as usize });
            }
        }

        Ok(())
    }

    /// Reads a complete response, issuing `device_read` calls until the device signals END.
    /// With `max_bytes` the read also stops once that many bytes have arrived.
    pub fn read(&mut self, max_bytes:Option<usize>) -> Result<Vec<u8>> {
        let link = self.get_link()?;
        let mut ans:Vec<u8> = vec![];

        loop {
            let request_size:u32 = match max_bytes {
                Some(max) => (max - ans.len()).min(u32::MAX as usize) as u32,
                None      => u32::MAX,
            };

            self.client.start_call(DEVICE_READ)?;
            xdr_pack::pack_device_read_parms(&mut self.client.packer, link.link_id, request_size,
                self.config.io_timeout_ms, self.config.lock_timeout_ms, 0, 0)?;
            self.client.do_call()?;

            let error:i32    = self.client.unpacker.unpack_i32()?;
            let reason:i32   = self.client.unpacker.unpack_i32()?;
            let data:Vec<u8> = self.client.unpacker.unpack_variable_len_opaque()?;

            check("device_read", error)?;
            ans.extend_from_slice(&data);

            if read_progress(reason, ans.len(), max_bytes)? == ReadProgress::Done {
                return Ok(ans);
            }
        }
    }

    pub fn destroy_link(&mut self) -> Result<()> {
        let link = self.get_link()?;

        self.client.start_call(DESTROY_LINK)?;
        xdr_pack::pack_device_link(&mut self.client.packer, link.link_id)?;
        self.client.do_call()?;

        self.opt_link = None;
        check("destroy_link", self.client.unpacker.unpack_i32()?)
    }

}

impl Drop for CoreClient {

    fn drop(&mut self) {
        if self.opt_link.is_some() {
            if let Err(e) = self.destroy_link() {
                log::warn!("vxi11: unable to destroy link: {}", e);
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_bit_finishes_a_read() {
        assert_eq!(read_progress(REASON_END, 10, None).unwrap(), ReadProgress::Done);
        assert_eq!(read_progress(REASON_END | REASON_REQCNT, 10, Some(100)).unwrap(), ReadProgress::Done);
    }

    #[test]
    fn request_count_continues_until_max() {
        assert_eq!(read_progress(REASON_REQCNT, 10, None).unwrap(), ReadProgress::More);
        assert_eq!(read_progress(REASON_REQCNT, 10, Some(100)).unwrap(), ReadProgress::More);
        assert_eq!(read_progress(REASON_REQCNT, 100, Some(100)).unwrap(), ReadProgress::Done);
    }

    #[test]
    fn missing_reason_is_an_error() {
        assert!(read_progress(0, 0, None).is_err());
    }
}
