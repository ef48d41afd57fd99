use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not found: {detail}")]
    NotFound { detail: String },
    #[error("bad request: {detail}")]
    BadRequest { detail: String },
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response decode failed: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    NotFound,
    BadRequest,
    Other,
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::NotFound { .. } => TransportErrorKind::NotFound,
            TransportError::BadRequest { .. } => TransportErrorKind::BadRequest,
            TransportError::Status { .. }
            | TransportError::Request(_)
            | TransportError::Decode(_)
            | TransportError::InvalidUrl(_) => TransportErrorKind::Other,
        }
    }

    /// Human readable detail the server attached to a 404/400.
    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::NotFound { detail } | TransportError::BadRequest { detail } => {
                Some(detail)
            }
            _ => None,
        }
    }
}

/// Shared HTTP client for all API calls.
pub fn default_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("kata/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(15))
        .build()
}

/// Pull the message out of an error body.
///
/// The API answers 4xx with `{"error": "..."}`; older deployments wrap it as
/// `{"errors": [{"detail": {"error": "..."}}]}`. Anything else is returned as text.
pub fn detail_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let found = value
            .get("error")
            .and_then(|e| e.as_str())
            .or_else(|| value.pointer("/errors/0/detail/error").and_then(|e| e.as_str()));
        if let Some(msg) = found {
            return msg.to_string();
        }
    }
    body.trim().to_string()
}

/// JSON-over-HTTP boundary. Attaches the API key to every request and maps
/// HTTP failures into [`TransportError`].
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    api_key: String,
}

impl ApiTransport {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// `base` joined with `segments`, each segment percent-encoded, plus `?key=`.
    ///
    /// `base` may carry its own path prefix, with or without a trailing slash.
    pub fn endpoint(&self, base: &str, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = Url::parse(base)
            .map_err(|e| TransportError::InvalidUrl(format!("{base}: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| TransportError::InvalidUrl(format!("{base}: cannot be a base")))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        self.send::<(), T>(Method::GET, url, None).await
    }

    pub async fn post_json<B, T>(&self, url: Url, body: Option<&B>) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, url, body).await
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url.path());
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(match status {
                StatusCode::NOT_FOUND => TransportError::NotFound {
                    detail: detail_message(&text),
                },
                StatusCode::BAD_REQUEST => TransportError::BadRequest {
                    detail: detail_message(&text),
                },
                other => TransportError::Status {
                    status: other.as_u16(),
                    body: text,
                },
            });
        }

        // Some endpoints (skip) answer with an empty body.
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(payload).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> ApiTransport {
        ApiTransport::new(Client::new(), "s3cr3t")
    }

    #[test]
    fn endpoint_appends_segments_and_key() {
        let url = transport()
            .endpoint("https://api.example.com", &["api", "v1", "tracks", "ruby", "status"])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/tracks/ruby/status?key=s3cr3t");
    }

    #[test]
    fn endpoint_keeps_base_prefix() {
        let with_slash = transport().endpoint("http://h/proxy/", &["v2", "exercises", "go"]).unwrap();
        let without = transport().endpoint("http://h/proxy", &["v2", "exercises", "go"]).unwrap();
        assert_eq!(with_slash.as_str(), "http://h/proxy/v2/exercises/go?key=s3cr3t");
        assert_eq!(with_slash, without);
    }

    #[test]
    fn endpoint_encodes_segments() {
        let url = transport().endpoint("http://h", &["v2", "exercises", "a b"]).unwrap();
        assert_eq!(url.path(), "/v2/exercises/a%20b");
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let err = transport().endpoint("not a url", &["x"]).unwrap_err();
        assert_eq!(err.kind(), TransportErrorKind::Other);
    }

    #[test]
    fn detail_message_shapes() {
        assert_eq!(detail_message(r#"{"error":"already skipped"}"#), "already skipped");
        assert_eq!(
            detail_message(r#"{"errors":[{"detail":{"error":"nope"}}]}"#),
            "nope"
        );
        assert_eq!(detail_message("  plain text \n"), "plain text");
    }
}
