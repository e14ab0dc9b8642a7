use volley_core::{Method, RawResponse, Transport};

/// A default transport using the `reqwest` blocking client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: Option<&str>,
    ) -> Result<RawResponse, String> {
        let mut builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };

        for (k, v) in headers {
            builder = builder.header(k.as_str(), v.as_str());
        }

        if let Some(b) = body {
            builder = builder.body(b.to_string());
        }

        let response = builder
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        let body_text = response
            .text()
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text,
            body: body_text,
        })
    }
}
