//! Wire formats spoken by the prober: the game's status exchange and the DNS
//! SRV queries used for server discovery. Pure byte manipulation, no IO.

pub mod dns;
pub mod error;
pub mod packet;
pub mod status;
pub mod varint;

pub use error::ProtocolError;
