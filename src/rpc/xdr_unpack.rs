
use crate::error::TransportError;
use crate::xdr::Unpacker;
use crate::rpc::{REPLY, MSG_DENIED, RPC_MISMATCH, AUTH_ERROR, MSG_ACCEPTED, PROG_UNAVAIL, PROG_MISMATCH, PROC_UNAVAIL, GARBAGE_ARGS, SUCCESS};

// Verifiers from a VXI-11 server are always AUTH_NONE, so flavor and body are read past
fn skip_auth(unpacker:&mut Unpacker) -> Result<(), TransportError> {
	unpacker.unpack_enum()?;
	unpacker.unpack_variable_len_opaque()?;
	Ok(())
}

/// Consumes an accepted, successful reply header and returns its xid.  The unpacker is left
/// positioned at the procedure's results.
pub fn unpack_replyheader(unpacker:&mut Unpacker) -> Result<u32, TransportError> {
	let xid:u32 = unpacker.unpack_u32()?;

	if unpacker.unpack_enum()? != REPLY { return Err(TransportError::Rpc("expected REPLY message type")); }

	match unpacker.unpack_enum()? {
		MSG_DENIED => {
			match unpacker.unpack_enum()? {
				RPC_MISMATCH => {
					unpacker.unpack_u32()?;	// This u32 gives the low value
					unpacker.unpack_u32()?;	// This u32 gives the high value
					return Err(TransportError::Rpc("message denied due to RPC_MISMATCH"))
				},
				AUTH_ERROR => {
					unpacker.unpack_u32()?;	// auth_stat detail
					return Err(TransportError::Rpc("message denied due to AUTH_ERROR"))
				}
				_ => return Err(TransportError::Rpc("message denied for an unknown reason")),
			}
		},
		MSG_ACCEPTED => { },
		_            => return Err(TransportError::Rpc("neither MSG_DENIED nor MSG_ACCEPTED")),
	}

	skip_auth(unpacker)?;

	match unpacker.unpack_enum()? {
		SUCCESS       => Ok(xid),
		PROG_UNAVAIL  => Err(TransportError::Rpc("program unavailable")),
		PROG_MISMATCH => {
			unpacker.unpack_u32()?;	// This u32 gives the low value
			unpacker.unpack_u32()?;	// This u32 gives the high value
			Err(TransportError::Rpc("program version mismatch"))
		},
		PROC_UNAVAIL  => Err(TransportError::Rpc("procedure unavailable")),
		GARBAGE_ARGS  => Err(TransportError::Rpc("garbage args")),
		_             => Err(TransportError::Rpc("call failed for unknown reason")),
	}
}
