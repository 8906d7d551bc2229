use thiserror::Error;

/// Failures surfaced by the directory gateway, split the way the session
/// presents them: list fetches, report submissions, and the reachability
/// probe.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("atm lookup failed: {0}")]
    Fetch(String),
    #[error("report submission failed: {0}")]
    Submit(String),
    #[error("directory health probe failed: {0}")]
    Health(String),
}

impl DirectoryError {
    /// Static, non-specific text for the user-facing banner. The cause
    /// goes to the log, never to the banner.
    pub fn banner_message(&self) -> &'static str {
        match self {
            DirectoryError::Fetch(_) => {
                "Failed to fetch ATMs. Is the ATM directory service running?"
            }
            DirectoryError::Submit(_) => "Error submitting report. Please try again.",
            DirectoryError::Health(_) => "ATM directory service is unreachable.",
        }
    }
}
