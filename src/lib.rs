#[macro_use]
extern crate lazy_static;

// External data representation, a protocol for serializing data to be sent over the network
pub mod xdr;

// Remote procedure call, a protocol build on top of XDR to provide something like C-style function calls over the network
pub mod rpc;

// A protocol using RPC that's meant to communicate with instruments like oscilloscopes, power supplies, waveform generators, etc
pub mod vxi11;

// The write/read/query primitives device drivers are written against, and their VXI-11 implementation
pub mod link;

pub mod config;
pub mod error;

// Drivers for devices that speak SCPI over a link
pub mod devices;

pub use config::Config;
pub use error::{Error, Result, TransportError};
pub use link::InstrumentLink;
pub use devices::ds1000z::DS1000Z;
pub use devices::ds1000z::waveform::{Source, WaveMode, WaveformPreamble, WaveformSeries};
