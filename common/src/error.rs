use std::time::Duration;

/// Everything that can go wrong while probing a single target.
///
/// None of these escape a batch: the orchestrator turns each one into a
/// [`crate::status::ProbeResult::Failure`] whose reason is the `Display`
/// output, so the variant name leads every message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The raw address could not be turned into a host and port.
    #[error("InvalidAddress: {0}")]
    InvalidAddress(String),
    /// Refused, unreachable, or the hostname did not resolve.
    #[error("ConnectionError: {0}")]
    Connection(String),
    /// The probe budget ran out while `stage` was in progress.
    #[error("TimeoutError: {stage} did not complete within {}ms", budget.as_millis())]
    Timeout { stage: &'static str, budget: Duration },
    /// The server answered with something that is not a valid status frame.
    #[error("ProtocolError: {0}")]
    Protocol(String),
}

impl ProbeError {
    pub fn timeout(stage: &'static str, budget: Duration) -> Self {
        Self::Timeout { stage, budget }
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
