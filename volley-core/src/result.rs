//! The single result shape every dispatch path terminates in.

use serde_json::Value;

/// Response payload: parsed JSON, or the non-JSON sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    /// Sentinel for bodies that failed to parse as JSON. The original text
    /// is kept rather than discarded; display layers label it.
    Text(String),
}

/// Outcome of one dispatch.
///
/// An HTTP error status (4xx/5xx) is still `Success` carrying that status;
/// only transport-level errors produce `Failure`. How an error status is
/// flagged visually is the display layer's decision, not this crate's.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Success {
        status_code: u16,
        status_text: String,
        payload: Payload,
    },
    Failure {
        message: String,
    },
}
