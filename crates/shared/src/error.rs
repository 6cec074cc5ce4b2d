use serde::{Deserialize, Serialize};

/// Body carried by non-2xx lookup responses. The error text is optional on
/// the wire; clients fall back to a generic message when it is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }

    pub fn into_message(self) -> Option<String> {
        self.error.filter(|message| !message.is_empty())
    }
}
