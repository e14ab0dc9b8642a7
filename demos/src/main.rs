use volley_core::{
    build_descriptor, dispatch, DispatchMode, DispatchResult, KeyValueEntry, Method, Payload,
    RawResponse, RelayFields, Transport,
};

/// A simple mock transport for demonstration.
/// It doesn't actually make HTTP requests, but returns canned responses.
pub struct DemoMockTransport;

impl Transport for DemoMockTransport {
    fn execute(
        &self,
        method: Method,
        url: &str,
        _headers: &[(String, String)],
        _body: Option<&str>,
    ) -> Result<RawResponse, String> {
        println!(">>> [MOCK] Intercepted a {} request to '{}'", method, url);

        Ok(RawResponse {
            status: 200,
            status_text: "OK".to_string(),
            body: r#"{"message": "Hello from DemoMockTransport!"}"#.to_string(),
        })
    }
}

fn main() {
    // Raw form state as a UI would hand it over: one entry left unset
    let query_entries = [
        KeyValueEntry::new("q", "hi there"),
        KeyValueEntry::new("", "ignored because the key is blank"),
        KeyValueEntry::new("page", "2"),
    ];
    let header_entries = [KeyValueEntry::new("Accept", "application/json")];

    let descriptor = build_descriptor(
        Method::Get,
        "https://api.example.com/search",
        &query_entries,
        &header_entries,
        "a body that GET will never carry",
        &RelayFields::default(),
    );

    println!("Built descriptor for {}\n", descriptor.full_url());

    // We instantiate our custom mock transport instead of reqwest
    let transport = DemoMockTransport;
    let result = dispatch(&transport, &descriptor, &DispatchMode::Direct);

    match result {
        DispatchResult::Success {
            status_code,
            status_text,
            payload,
        } => {
            println!("\nGot {} {}", status_code, status_text);
            match payload {
                Payload::Json(value) => println!("JSON payload: {}", value),
                Payload::Text(text) => println!("Non-JSON payload: {}", text),
            }
        }
        DispatchResult::Failure { message } => {
            eprintln!("Dispatch failed: {}", message);
        }
    }
}
