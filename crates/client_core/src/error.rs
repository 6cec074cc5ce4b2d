use thiserror::Error;

/// Failures talking to the lookup service.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup service unreachable: {0}")]
    Unreachable(String),
    /// The service answered non-2xx and supplied its own error text.
    #[error("{0}")]
    Rejected(String),
    /// The service answered non-2xx without a usable error body.
    #[error("lookup service returned status {0}")]
    Status(u16),
    #[error("invalid lookup service payload: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Error text fit for the session status: the service's own words when it
    /// sent any, otherwise the transport-level description.
    pub fn status_message(&self) -> String {
        match self {
            LookupError::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Caller misuse of the selection cascade. A well-behaved presentation layer
/// never reaches these; the offending call leaves the session untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown brand: {0}")]
    UnknownBrand(String),
    #[error("unknown appliance: {0}")]
    UnknownAppliance(String),
    #[error("unknown issue: {0}")]
    UnknownIssue(String),
    #[error("no brand selected")]
    BrandNotSelected,
    #[error("no appliance selected")]
    ApplianceNotSelected,
}
