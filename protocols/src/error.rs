use mcstat_common::error::ProbeError;

/// Ways a status exchange can be malformed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("VarInt is too big")]
    VarIntTooBig,
    #[error("VarInt ended after {0} byte(s)")]
    VarIntIncomplete(usize),
    #[error("invalid frame length {0}")]
    InvalidFrameLength(i32),
    #[error("frame truncated: received {received} of {declared} bytes")]
    Truncated { declared: usize, received: usize },
    #[error("unexpected packet id {0:#04x}")]
    UnexpectedPacketId(i32),
    #[error("string length {length} does not fit in the {remaining} remaining bytes")]
    StringLength { length: i32, remaining: usize },
    #[error("status document is not valid UTF-8")]
    InvalidUtf8,
    #[error("status document is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("status document is missing '{0}'")]
    MissingField(&'static str),
    #[error("unsupported description type: {0}")]
    UnsupportedDescription(&'static str),
    #[error("malformed DNS response: {0}")]
    Dns(String),
}

impl From<ProtocolError> for ProbeError {
    fn from(err: ProtocolError) -> Self {
        ProbeError::Protocol(err.to_string())
    }
}
