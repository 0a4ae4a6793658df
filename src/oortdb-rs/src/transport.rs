use oortdb_core::error::Result;
use oortdb_core::request::Method;
use oortdb_core::transport::{HttpCall, RawResponse, Transport, TransportError, TransportErrorKind};

use crate::{DRIVER_NAME, DRIVER_VERSION};

/// Reqwest-backed [`Transport`]. One instance per connection; reqwest
/// multiplexes over its internal pool.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{DRIVER_NAME}/{DRIVER_VERSION}"))
            .build()
            .map_err(|e| TransportError::other(e.to_string()))?;

        Ok(Self { client })
    }
}

fn method_of(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

fn translate(error: reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };

    TransportError::new(kind, error.to_string())
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, call: HttpCall) -> std::result::Result<RawResponse, TransportError> {
        let mut request = self.client.request(method_of(call.method), call.url);

        if let Some((username, password)) = call.basic_auth {
            request = request.basic_auth(username, Some(password));
        }
        if let Some(body) = call.body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(translate)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // reading the body can still fail mid-stream
        let body = response.text().await.map_err(translate)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
