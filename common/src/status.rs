use serde::Serialize;

use crate::error::ProbeError;

/// Population and MOTD reported by a server that answered the status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub max_players: i64,
    pub online_players: i64,
    /// Description flattened to plain text.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    #[serde(rename = "error")]
    pub reason: String,
}

/// Outcome of probing one target. Serializes as either the status fields or
/// `{"error": reason}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProbeResult {
    Status(Status),
    Failure(Failure),
}

impl ProbeResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(Failure {
            reason: reason.into(),
        })
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status(_))
    }

    pub fn status(&self) -> Option<&Status> {
        match self {
            Self::Status(status) => Some(status),
            Self::Failure(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Status(_) => None,
            Self::Failure(failure) => Some(&failure.reason),
        }
    }
}

impl From<Result<Status, ProbeError>> for ProbeResult {
    fn from(result: Result<Status, ProbeError>) -> Self {
        match result {
            Ok(status) => Self::Status(status),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
