use crate::descriptor::Method;

/// Raw output of one completed HTTP exchange, before normalization.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase ("OK", "Not Found"); empty when the
    /// transport knows none for the code.
    pub status_text: String,
    pub body: String,
}

/// A generic interface for transmitting one HTTP request.
/// Your application can implement this trait and pass it to
/// [`crate::dispatch::dispatch`] to decouple volley from any specific HTTP
/// library — the CLI plugs in `reqwest`, tests substitute mocks.
///
/// Transport-level failures (DNS, refused connection, timeout) are the
/// `Err` side; a received HTTP response is `Ok` whatever its status code.
pub trait Transport {
    fn execute(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: Option<&str>,
    ) -> Result<RawResponse, String>;
}
