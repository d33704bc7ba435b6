use reqwest::{Method, Url};
use serde_json::{Map, Value};

use crate::error::WebhookError;
use crate::types::{is_falsy, natural_string};

/// Record key holding the target URL.
pub const WEBHOOK_URL_KEY: &str = "webhookUrl";
/// Record key holding the HTTP method.
pub const METHOD_KEY: &str = "method";
/// Record key holding the raw `Authorization` header value.
pub const AUTH_HEADER_KEY: &str = "authHeader";

/// Keys consumed by the invoker itself. Everything else is payload.
pub const RESERVED_KEYS: [&str; 3] = [WEBHOOK_URL_KEY, METHOD_KEY, AUTH_HEADER_KEY];

/// Validated parameters for a single webhook invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Target URL exactly as supplied by the caller.
    pub webhook_url: String,

    /// HTTP method, always uppercase (defaults to `POST`).
    pub method: Method,

    /// Raw `Authorization` header value, if any.
    pub auth_header: Option<String>,

    /// Every record entry not consumed by the fields above, in record order.
    pub payload: Map<String, Value>,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("webhook_url", &self.webhook_url)
            .field("method", &self.method)
            .field("auth_header", &self.auth_header.as_ref().map(|_| "[REDACTED]"))
            .field("payload", &self.payload)
            .finish()
    }
}

impl WebhookConfig {
    /// Create a configuration targeting the given URL with `POST`, no auth
    /// header and an empty payload.
    ///
    /// The URL is not checked here; use [`validate`](Self::validate) for
    /// untrusted input.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            method: Method::POST,
            auth_header: None,
            payload: Map::new(),
        }
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the raw `Authorization` header value.
    #[must_use]
    pub fn with_auth_header(mut self, value: impl Into<String>) -> Self {
        self.auth_header = Some(value.into());
        self
    }

    /// Append a payload entry.
    #[must_use]
    pub fn with_payload_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Validate an arbitrary JSON value as a configuration record.
    ///
    /// Anything other than a JSON object is rejected.
    pub fn from_value(record: Value) -> Result<Self, WebhookError> {
        match record {
            Value::Object(map) => Self::validate(map),
            other => Err(WebhookError::Configuration(format!(
                "configuration record must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Validate a configuration record and split it into connection-control
    /// fields and payload.
    pub fn validate(record: Map<String, Value>) -> Result<Self, WebhookError> {
        let mut webhook_url = None;
        let mut method = None;
        let mut auth_header = None;
        let mut payload = Map::new();

        for (key, value) in record {
            match key.as_str() {
                WEBHOOK_URL_KEY => webhook_url = Some(value),
                METHOD_KEY => method = Some(value),
                AUTH_HEADER_KEY => auth_header = Some(value),
                _ => {
                    payload.insert(key, value);
                }
            }
        }

        Ok(Self {
            webhook_url: parse_webhook_url(webhook_url)?,
            method: parse_method(method)?,
            auth_header: parse_auth_header(auth_header),
            payload,
        })
    }
}

fn parse_webhook_url(value: Option<Value>) -> Result<String, WebhookError> {
    let url = match value {
        None => None,
        Some(v) if is_falsy(&v) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            return Err(WebhookError::Configuration(format!(
                "'{WEBHOOK_URL_KEY}' must be a string, got {}",
                json_type_name(&other)
            )));
        }
    };

    let url = url.ok_or_else(|| {
        WebhookError::Configuration(format!("'{WEBHOOK_URL_KEY}' input is required"))
    })?;

    Url::parse(&url).map_err(|e| {
        WebhookError::Configuration(format!(
            "'{WEBHOOK_URL_KEY}' is not an absolute URL ({e}): {url}"
        ))
    })?;

    Ok(url)
}

fn parse_method(value: Option<Value>) -> Result<Method, WebhookError> {
    let raw = match value {
        None => return Ok(Method::POST),
        Some(v) if is_falsy(&v) => return Ok(Method::POST),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(WebhookError::Configuration(format!(
                "'{METHOD_KEY}' must be a string, got {}",
                json_type_name(&other)
            )));
        }
    };

    Method::from_bytes(raw.to_uppercase().as_bytes()).map_err(|_| {
        WebhookError::Configuration(format!("'{METHOD_KEY}' is not a valid HTTP method: {raw}"))
    })
}

fn parse_auth_header(value: Option<Value>) -> Option<String> {
    match value {
        Some(v) if !is_falsy(&v) => Some(natural_string(&v)),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn missing_webhook_url_is_rejected() {
        let err = WebhookConfig::validate(record(json!({"a": 1}))).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "'webhookUrl' input is required");
    }

    #[test]
    fn falsy_webhook_url_is_rejected() {
        for falsy in [json!(""), json!(null), json!(false), json!(0)] {
            let err = WebhookConfig::validate(record(json!({ "webhookUrl": falsy }))).unwrap_err();
            assert_eq!(err.to_string(), "'webhookUrl' input is required");
        }
    }

    #[test]
    fn non_string_webhook_url_is_rejected() {
        let err = WebhookConfig::validate(record(json!({"webhookUrl": ["https://x.test"]})))
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn relative_webhook_url_is_rejected() {
        let err = WebhookConfig::validate(record(json!({"webhookUrl": "/hook"}))).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("not an absolute URL"));
    }

    #[test]
    fn method_defaults_to_post() {
        let config = WebhookConfig::validate(record(json!({"webhookUrl": "https://x.test/hook"})))
            .unwrap();
        assert_eq!(config.method, Method::POST);

        let config = WebhookConfig::validate(record(
            json!({"webhookUrl": "https://x.test/hook", "method": ""}),
        ))
        .unwrap();
        assert_eq!(config.method, Method::POST);
    }

    #[test]
    fn method_is_uppercased() {
        let config = WebhookConfig::validate(record(
            json!({"webhookUrl": "https://x.test/hook", "method": "get"}),
        ))
        .unwrap();
        assert_eq!(config.method, Method::GET);

        let config = WebhookConfig::validate(record(
            json!({"webhookUrl": "https://x.test/hook", "method": "pAtCh"}),
        ))
        .unwrap();
        assert_eq!(config.method, Method::PATCH);
    }

    #[test]
    fn invalid_method_token_is_rejected() {
        let err = WebhookConfig::validate(record(
            json!({"webhookUrl": "https://x.test/hook", "method": "NOT A VERB"}),
        ))
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("not a valid HTTP method"));
    }

    #[test]
    fn reserved_keys_are_removed_from_payload() {
        let config = WebhookConfig::validate(record(json!({
            "first": 1,
            "webhookUrl": "https://x.test/hook",
            "second": "two",
            "method": "put",
            "authHeader": "Bearer tok",
            "third": [1, 2],
        })))
        .unwrap();

        for key in RESERVED_KEYS {
            assert!(!config.payload.contains_key(key));
        }
        let keys: Vec<&str> = config.payload.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
        assert_eq!(config.auth_header.as_deref(), Some("Bearer tok"));
    }

    #[test]
    fn empty_auth_header_is_ignored() {
        let config = WebhookConfig::validate(record(
            json!({"webhookUrl": "https://x.test/hook", "authHeader": ""}),
        ))
        .unwrap();
        assert!(config.auth_header.is_none());
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let err = WebhookConfig::from_value(json!(["https://x.test"])).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("got array"));
    }

    #[test]
    fn builder_methods() {
        let config = WebhookConfig::new("https://x.test/hook")
            .with_method(Method::DELETE)
            .with_auth_header("Basic abc")
            .with_payload_entry("id", 7);
        assert_eq!(config.method, Method::DELETE);
        assert_eq!(config.auth_header.as_deref(), Some("Basic abc"));
        assert_eq!(config.payload["id"], 7);
    }

    #[test]
    fn debug_redacts_auth_header() {
        let secret = "Bearer test-token-placeholder";
        let config = WebhookConfig::new("https://x.test/hook").with_auth_header(secret);
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(secret));
    }
}
