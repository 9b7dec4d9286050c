use crate::error::RequestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Method and optional JSON body for one exchange.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
        }
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            body: None,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            body: None,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Successful response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No-content success (204 or an empty body).
    Empty,
    Json(Value),
    Text(String),
}

/// Normalizes one request/response exchange: no retries, no timeout.
#[derive(Debug, Clone)]
pub struct RequestClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
}

impl RequestClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, RequestError> {
        debug!(method = %options.method, path, "request");
        let mut req = self.http.request(options.method.clone(), self.url(path));
        if let Some(body) = options.body.as_ref() {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            warn!(path, error = %e, "transport failure");
            RequestError::from(e)
        })?;

        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        let text = resp.text().await?;

        if !status.is_success() {
            let err = failure_from_body(status, &text);
            warn!(path, status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }
        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Ok(ResponseBody::Empty);
        }
        if is_json {
            return serde_json::from_str(&text)
                .map(ResponseBody::Json)
                .map_err(|e| RequestError::Decode {
                    path: path.to_string(),
                    reason: e.to_string(),
                });
        }
        Ok(ResponseBody::Text(text))
    }

    /// Request and decode a JSON payload into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, RequestError> {
        match self.request(path, options).await? {
            ResponseBody::Json(v) => serde_json::from_value(v).map_err(|e| RequestError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            }),
            ResponseBody::Empty => Err(RequestError::Decode {
                path: path.to_string(),
                reason: "empty body".into(),
            }),
            ResponseBody::Text(_) => Err(RequestError::Decode {
                path: path.to_string(),
                reason: "expected a JSON payload".into(),
            }),
        }
    }
}

/// Build the error for a non-success response, preferring a structured `error` field.
fn failure_from_body(status: StatusCode, body: &str) -> RequestError {
    let structured = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        });
    let message = structured.unwrap_or_else(|| status_line(status));
    RequestError::Status {
        status: status.as_u16(),
        message,
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
