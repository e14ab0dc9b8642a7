//! Transmission of a descriptor and normalization of whatever comes back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::{Method, RequestDescriptor};
use crate::result::{DispatchResult, Payload};
use crate::transport::{RawResponse, Transport};

/// How a descriptor reaches its target. Selected by configuration, never
/// by descriptor content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchMode {
    /// Execute the described request directly against the target URL.
    Direct,
    /// POST the whole descriptor as one JSON document to a relay endpoint
    /// that executes it on the caller's behalf.
    Relay { endpoint: String },
}

/// Wire document sent to a relay endpoint.
///
/// Deliberately mirrors the relay's own request type instead of sharing
/// it; the end-to-end tests catch schema drift between the two.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayPayload {
    pub method: String,
    /// Target URL with the query string already appended.
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub user_mongo_uri: Option<String>,
    pub user_db: Option<String>,
    pub user_collection: Option<String>,
}

impl RelayPayload {
    pub fn from_descriptor(descriptor: &RequestDescriptor) -> Self {
        let credentials = descriptor.relay_credentials.clone().unwrap_or_default();

        Self {
            method: descriptor.method.as_str().to_string(),
            url: descriptor.full_url(),
            headers: descriptor.headers.clone(),
            body: descriptor.body.clone(),
            user_mongo_uri: credentials.mongo_uri,
            user_db: credentials.db,
            user_collection: credentials.collection,
        }
    }
}

/// Transmit one descriptor and produce exactly one result.
///
/// Stateless: calling twice with the same descriptor performs two
/// independent transmissions. Transport failures become
/// [`DispatchResult::Failure`]; every received response becomes
/// [`DispatchResult::Success`], whatever its status code.
pub fn dispatch<T: Transport>(
    transport: &T,
    descriptor: &RequestDescriptor,
    mode: &DispatchMode,
) -> DispatchResult {
    let outcome = match mode {
        DispatchMode::Direct => {
            let headers: Vec<(String, String)> = descriptor
                .headers
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();

            transport.execute(
                descriptor.method,
                &descriptor.full_url(),
                &headers,
                descriptor.body.as_deref(),
            )
        }
        DispatchMode::Relay { endpoint } => {
            let payload = RelayPayload::from_descriptor(descriptor);
            let document = match serde_json::to_string(&payload) {
                Ok(document) => document,
                Err(e) => {
                    return DispatchResult::Failure {
                        message: format!("Failed to encode relay payload: {}", e),
                    }
                }
            };
            let headers = vec![("Content-Type".to_string(), "application/json".to_string())];

            transport.execute(Method::Post, endpoint, &headers, Some(&document))
        }
    };

    match outcome {
        Ok(raw) => normalize(raw),
        Err(message) => DispatchResult::Failure { message },
    }
}

/// Map a raw response onto the result contract: status always carried
/// through, body parsed as JSON with the text sentinel as fallback.
fn normalize(raw: RawResponse) -> DispatchResult {
    let payload = match serde_json::from_str::<Value>(&raw.body) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Text(raw.body),
    };

    DispatchResult::Success {
        status_code: raw.status,
        status_text: raw.status_text,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::builder::build_descriptor;
    use crate::descriptor::{KeyValueEntry, RelayFields};

    #[derive(Debug)]
    struct CapturedRequest {
        method: Method,
        url: String,
        headers: Vec<(String, String)>,
        body: Option<String>,
    }

    struct MockTransport {
        last_request: Mutex<Option<CapturedRequest>>,
        response: Result<RawResponse, String>,
    }

    impl MockTransport {
        fn returning(response: Result<RawResponse, String>) -> Self {
            Self {
                last_request: Mutex::new(None),
                response,
            }
        }

        fn ok(status: u16, status_text: &str, body: &str) -> Self {
            Self::returning(Ok(RawResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }))
        }

        fn take_request(&self) -> CapturedRequest {
            self.last_request.lock().unwrap().take().unwrap()
        }
    }

    impl Transport for MockTransport {
        fn execute(
            &self,
            method: Method,
            url: &str,
            headers: &[(String, String)],
            body: Option<&str>,
        ) -> Result<RawResponse, String> {
            let mut last = self.last_request.lock().unwrap();
            *last = Some(CapturedRequest {
                method,
                url: url.to_string(),
                headers: headers.to_owned(),
                body: body.map(|b| b.to_string()),
            });

            self.response.clone()
        }
    }

    fn get_descriptor() -> RequestDescriptor {
        build_descriptor(
            Method::Get,
            "http://x/y",
            &[KeyValueEntry::new("q", "hi there")],
            &[],
            "typed but never sent",
            &RelayFields::default(),
        )
    }

    #[test]
    fn test_direct_dispatch_sends_full_url_and_no_get_body() {
        let transport = MockTransport::ok(200, "OK", "{\"ok\":true}");

        let result = dispatch(&transport, &get_descriptor(), &DispatchMode::Direct);

        let sent = transport.take_request();
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url, "http://x/y?q=hi%20there");
        assert!(sent.body.is_none());

        assert_eq!(
            result,
            DispatchResult::Success {
                status_code: 200,
                status_text: "OK".to_string(),
                payload: Payload::Json(json!({"ok": true})),
            }
        );
    }

    #[test]
    fn test_direct_dispatch_sends_headers_and_raw_body() {
        let transport = MockTransport::ok(201, "Created", "{}");
        let descriptor = build_descriptor(
            Method::Post,
            "http://api.example.com/things",
            &[],
            &[KeyValueEntry::new("X-Token", "s3cret")],
            "{\"n\": 1}",
            &RelayFields::default(),
        );

        dispatch(&transport, &descriptor, &DispatchMode::Direct);

        let sent = transport.take_request();
        assert_eq!(sent.method, Method::Post);
        assert!(sent
            .headers
            .iter()
            .any(|(k, v)| k == "X-Token" && v == "s3cret"));
        assert_eq!(sent.body.as_deref(), Some("{\"n\": 1}"));
    }

    #[test]
    fn test_non_json_body_becomes_text_sentinel_with_status_intact() {
        let transport = MockTransport::ok(200, "OK", "not json");

        let result = dispatch(&transport, &get_descriptor(), &DispatchMode::Direct);

        assert_eq!(
            result,
            DispatchResult::Success {
                status_code: 200,
                status_text: "OK".to_string(),
                payload: Payload::Text("not json".to_string()),
            }
        );
    }

    #[test]
    fn test_error_status_is_still_success() {
        let transport = MockTransport::ok(503, "Service Unavailable", "{\"err\":\"down\"}");

        let result = dispatch(&transport, &get_descriptor(), &DispatchMode::Direct);

        match result {
            DispatchResult::Success { status_code, .. } => assert_eq!(status_code, 503),
            DispatchResult::Failure { message } => panic!("unexpected failure: {}", message),
        }
    }

    #[test]
    fn test_transport_error_becomes_failure() {
        let transport =
            MockTransport::returning(Err("connection refused (os error 111)".to_string()));

        let result = dispatch(&transport, &get_descriptor(), &DispatchMode::Direct);

        assert_eq!(
            result,
            DispatchResult::Failure {
                message: "connection refused (os error 111)".to_string(),
            }
        );
    }

    #[test]
    fn test_relay_dispatch_posts_wire_document_to_endpoint() {
        let transport = MockTransport::ok(200, "OK", "{\"status\":200,\"size\":2,\"body\":\"{}\"}");
        let descriptor = build_descriptor(
            Method::Put,
            "http://api.example.com/things/7",
            &[KeyValueEntry::new("a", "1")],
            &[KeyValueEntry::new("X-Token", "s3cret")],
            "{\"n\": 1}",
            &RelayFields {
                mongo_uri: "mongodb+srv://u:p@cluster0.example.net".to_string(),
                db: String::new(),
                collection: String::new(),
            },
        );
        let mode = DispatchMode::Relay {
            endpoint: "http://relay.example.net/send".to_string(),
        };

        dispatch(&transport, &descriptor, &mode);

        let sent = transport.take_request();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, "http://relay.example.net/send");
        assert!(sent
            .headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json"));

        let document: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(document["method"], "PUT");
        assert_eq!(document["url"], "http://api.example.com/things/7?a=1");
        assert_eq!(document["headers"]["X-Token"], "s3cret");
        assert_eq!(document["body"], "{\"n\": 1}");
        assert_eq!(
            document["user_mongo_uri"],
            "mongodb+srv://u:p@cluster0.example.net"
        );
        assert_eq!(document["user_db"], Value::Null);
        assert_eq!(document["user_collection"], Value::Null);
    }

    #[test]
    fn test_relay_dispatch_serializes_absent_body_as_null() {
        let transport = MockTransport::ok(200, "OK", "{}");
        let mode = DispatchMode::Relay {
            endpoint: "http://relay.example.net/send".to_string(),
        };

        dispatch(&transport, &get_descriptor(), &mode);

        let sent = transport.take_request();
        let document: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(document["method"], "GET");
        assert_eq!(document["body"], Value::Null);
        assert_eq!(document["user_mongo_uri"], Value::Null);
    }

    #[test]
    fn test_relay_response_is_passed_through_verbatim() {
        // The relay already normalized the upstream outcome; a nested 404
        // must not be reinterpreted by this side.
        let transport = MockTransport::ok(
            200,
            "OK",
            "{\"status\":404,\"size\":0,\"body\":\"missing\"}",
        );
        let mode = DispatchMode::Relay {
            endpoint: "http://relay.example.net/send".to_string(),
        };

        let result = dispatch(&transport, &get_descriptor(), &mode);

        assert_eq!(
            result,
            DispatchResult::Success {
                status_code: 200,
                status_text: "OK".to_string(),
                payload: Payload::Json(json!({"status": 404, "size": 0, "body": "missing"})),
            }
        );
    }

    #[test]
    fn test_unreachable_relay_becomes_failure() {
        let transport = MockTransport::returning(Err("dns error: relay.nowhere".to_string()));
        let mode = DispatchMode::Relay {
            endpoint: "http://relay.nowhere/send".to_string(),
        };

        let result = dispatch(&transport, &get_descriptor(), &mode);

        assert!(matches!(result, DispatchResult::Failure { .. }));
    }
}
