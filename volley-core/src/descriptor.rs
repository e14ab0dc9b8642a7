//! Value types describing one HTTP request.

use std::collections::HashMap;

/// A single editable key/value row, exactly as the caller's form state
/// holds it.
///
/// Rows whose key is empty or whitespace-only count as unset and are
/// dropped from every downstream representation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyValueEntry {
    pub key: String,
    pub value: String,
}

impl KeyValueEntry {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// An entry is unset while its key is blank.
    pub fn is_unset(&self) -> bool {
        self.key.trim().is_empty()
    }
}

/// The HTTP verbs a descriptor can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }

    /// `GET` never carries a body, no matter what the user typed.
    pub fn allows_body(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            _ => Err(()),
        }
    }
}

/// Raw relay-persistence fields exactly as the user typed them.
///
/// Opaque by contract: volley forwards them to a relay and never parses or
/// validates them. Blank fields are mapped to absent by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayFields {
    pub mongo_uri: String,
    pub db: String,
    pub collection: String,
}

/// Canonical relay credentials: each field present only when the raw input
/// was non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayCredentials {
    pub mongo_uri: Option<String>,
    pub db: Option<String>,
    pub collection: Option<String>,
}

/// Canonical description of one HTTP request, immutable once built.
///
/// Built fresh per dispatch by [`crate::builder::build_descriptor`]. The
/// target URL is kept exactly as the user entered it; a malformed URL only
/// surfaces as a transport error at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub target_url: String,
    /// Surviving query pairs in insertion order, duplicates preserved, held
    /// raw — encoding happens when the query string is rendered.
    pub query: Vec<(String, String)>,
    /// Header names are unique; the later of two duplicate entries wins.
    pub headers: HashMap<String, String>,
    /// Present only when the method allows a body and the trimmed input was
    /// non-empty. The stored text is the raw, untrimmed input.
    pub body: Option<String>,
    pub relay_credentials: Option<RelayCredentials>,
}

impl RequestDescriptor {
    /// The percent-encoded query string; empty when no pairs survived.
    pub fn query_string(&self) -> String {
        crate::builder::render_query(&self.query)
    }

    /// Target URL with the query string appended, ready to transmit. No `?`
    /// is appended when the query is empty.
    pub fn full_url(&self) -> String {
        let qs = self.query_string();
        if qs.is_empty() {
            self.target_url.clone()
        } else {
            format!("{}?{}", self.target_url, qs)
        }
    }
}
