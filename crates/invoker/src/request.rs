use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::types::{natural_string, to_compact_json};

const APPLICATION_JSON: &str = "application/json";

/// A fully resolved HTTP request, ready to hand to an [`HttpClient`].
///
/// [`HttpClient`]: crate::client::HttpClient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    /// Target URL, including the encoded payload for `GET` requests.
    pub url: String,
    pub headers: HeaderMap,
    /// JSON-encoded payload. Always `None` for `GET`.
    pub body: Option<String>,
}

impl RequestSpec {
    /// Build the request for a validated configuration.
    ///
    /// `GET` requests carry the payload as a form-encoded query string; every
    /// other method sends it as a JSON body.
    pub fn build(config: &WebhookConfig) -> Result<Self, WebhookError> {
        let headers = build_headers(config.auth_header.as_deref())?;

        let (url, body) = if config.method == Method::GET {
            let query = encode_query(&config.payload)?;
            (append_query(&config.webhook_url, &query), None)
        } else {
            let body = to_compact_json(&Value::Object(config.payload.clone()))?;
            (config.webhook_url.clone(), Some(body))
        };

        info!(method = %config.method, url = %url, "sending webhook");

        Ok(Self {
            method: config.method.clone(),
            url,
            headers,
            body,
        })
    }
}

fn build_headers(auth_header: Option<&str>) -> Result<HeaderMap, WebhookError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

    if let Some(raw) = auth_header.filter(|v| !v.is_empty()) {
        let mut value = HeaderValue::from_str(raw).map_err(|_| {
            WebhookError::Configuration("'authHeader' is not a valid header value".into())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Encode the payload as `application/x-www-form-urlencoded`.
fn encode_query(payload: &Map<String, Value>) -> Result<String, WebhookError> {
    let pairs: Vec<(&str, String)> = payload
        .iter()
        .map(|(key, value)| (key.as_str(), natural_string(value)))
        .collect();
    serde_urlencoded::to_string(pairs)
        .map_err(|e| WebhookError::Serialization(format!("failed to encode query string: {e}")))
}

fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_owned();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}
