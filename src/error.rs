use std::io;

/// Failures of the link to the instrument: sockets, RPC framing and VXI-11 error codes.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("RPC reply rejected: {0}")]
    Rpc(&'static str),

    #[error("VXI-11 {procedure} failed: {} (code {code})", describe(.code))]
    Device { procedure: &'static str, code: i32 },

    #[error("no VXI-11 link has been created")]
    NoLink,

    #[error("already connected to a link")]
    AlreadyLinked,

    #[error("device confirmed {confirmed} of {sent} bytes written")]
    ShortWrite { sent: usize, confirmed: usize },

    #[error("malformed XDR data: {0}")]
    Xdr(&'static str),

    #[error("response is not valid UTF-8")]
    Utf8,
}

/// Crate error. `Transport`, `Parse` and `DataIntegrity` are fatal to the fetch that raised them.
/// `DataIntegrity` always names a waveform point range; other block transfers that come up short
/// report `IncompleteTransfer` in bytes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("unable to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("block {start}..={stop} carried {received} samples, expected {expected}")]
    DataIntegrity { start: usize, stop: usize, expected: usize, received: usize },

    #[error("binary block carried {received} of {expected} bytes")]
    IncompleteTransfer { expected: usize, received: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("connected to a device that doesn't appear to be a DS1000Z: {0}")]
    UnexpectedModel(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::Transport(TransportError::Io(e)) }
}

impl Error {
    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        Error::Parse { what, detail: detail.into() }
    }
}

fn describe(code: &i32) -> &'static str { device_error_message(*code) }

/// Error codes shared by every VXI-11 core procedure
pub fn device_error_message(code: i32) -> &'static str {
    match code {
        1  => "syntax error",
        3  => "device not accessible",
        4  => "invalid link identifier",
        5  => "parameter error",
        6  => "channel not established",
        8  => "operation not supported",
        9  => "out of resources",
        11 => "device locked by another link",
        12 => "no lock held by this link",
        15 => "I/O timeout",
        17 => "I/O error",
        21 => "invalid address",
        23 => "abort",
        29 => "channel already established",
        _  => "unknown error",
    }
}
