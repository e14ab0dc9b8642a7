//! Pure construction of a [`RequestDescriptor`] from raw form state.
//!
//! Everything here is deterministic and side-effect-free: entries are
//! filtered and folded, never mutated in place, and no function can fail.
//! Checking that the target URL is non-blank is the caller's precondition;
//! a malformed URL passes through untouched and fails at dispatch time.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::descriptor::{KeyValueEntry, Method, RelayCredentials, RelayFields, RequestDescriptor};

/// Characters escaped in query keys and values: controls, the characters
/// RFC 3986 keeps out of a query component, and the pair delimiters
/// themselves so user content can never split a pair.
const QUERY_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'?');

/// Render pairs as `key=value` joined by `&`, percent-encoding both sides.
pub(crate) fn render_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_ENCODE),
                utf8_percent_encode(value, QUERY_ENCODE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the percent-encoded query string for a list of entries.
///
/// Unset entries (blank key) are dropped; duplicate keys all survive, in
/// insertion order. Returns an empty string when nothing survives —
/// callers must not append a bare `?` in that case.
pub fn build_query_string(entries: &[KeyValueEntry]) -> String {
    render_query(&surviving_pairs(entries))
}

/// Fold entries into a header map. Unset entries are dropped; when a key
/// repeats, the later entry's value wins.
pub fn build_header_map(entries: &[KeyValueEntry]) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for entry in entries {
        if entry.is_unset() {
            continue;
        }
        headers.insert(entry.key.clone(), entry.value.clone());
    }
    headers
}

/// Compose a full descriptor from raw form state.
///
/// Applies the body rule — `GET` never carries one, and otherwise only a
/// non-blank body is kept, untrimmed — and attaches relay credentials only
/// when at least one field is non-blank.
pub fn build_descriptor(
    method: Method,
    target_url: &str,
    query_entries: &[KeyValueEntry],
    header_entries: &[KeyValueEntry],
    raw_body: &str,
    relay_fields: &RelayFields,
) -> RequestDescriptor {
    let body = if method.allows_body() && !raw_body.trim().is_empty() {
        Some(raw_body.to_string())
    } else {
        None
    };

    RequestDescriptor {
        method,
        target_url: target_url.to_string(),
        query: surviving_pairs(query_entries),
        headers: build_header_map(header_entries),
        body,
        relay_credentials: canonical_credentials(relay_fields),
    }
}

fn surviving_pairs(entries: &[KeyValueEntry]) -> Vec<(String, String)> {
    entries
        .iter()
        .filter(|entry| !entry.is_unset())
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect()
}

fn non_blank(field: &str) -> Option<String> {
    if field.trim().is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

fn canonical_credentials(fields: &RelayFields) -> Option<RelayCredentials> {
    let credentials = RelayCredentials {
        mongo_uri: non_blank(&fields.mongo_uri),
        db: non_blank(&fields.db),
        collection: non_blank(&fields.collection),
    };

    if credentials == RelayCredentials::default() {
        None
    } else {
        Some(credentials)
    }
}
