use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::WebhookError;

/// Normalized outcome of a successful (2xx) webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseResult {
    /// HTTP status code from the endpoint.
    pub status: u16,

    /// Raw text body, or the JSON re-serialization of an object/array body.
    pub response_body: String,
}

/// Response body after content-type driven decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// Body parsed from an `application/json` response.
    Json(Value),
    /// Body of any other content type, decoded as UTF-8 text.
    Text(String),
}

impl ResponseData {
    /// String reported as `responseBody` on success.
    ///
    /// Only composite JSON (objects and arrays) is re-serialized; text and
    /// JSON primitives use their natural string form.
    pub fn to_response_body(&self) -> Result<String, WebhookError> {
        match self {
            Self::Json(value @ (Value::Object(_) | Value::Array(_))) => to_compact_json(value),
            Self::Json(value) => Ok(natural_string(value)),
            Self::Text(text) => Ok(text.clone()),
        }
    }

    /// JSON serialization of the decoded body, used in failure messages.
    ///
    /// Text bodies serialize as quoted JSON strings.
    pub fn to_json_string(&self) -> Result<String, WebhookError> {
        match self {
            Self::Json(value) => to_compact_json(value),
            Self::Text(text) => {
                serde_json::to_string(text).map_err(|e| WebhookError::Serialization(e.to_string()))
            }
        }
    }
}

impl std::fmt::Display for ResponseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Returns `true` for values a loosely-typed host treats as "not provided":
/// `null`, `false`, the empty string and zero.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integer value of a float that has no fractional part and fits the
/// exactly-representable range, e.g. `1.0` -> `1`.
#[allow(clippy::cast_possible_truncation)]
fn integral_float(n: &Number) -> Option<i64> {
    let f = n.as_f64()?;
    (n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER).then(|| f as i64)
}

/// Copy of `value` with integral floats rewritten as integers.
fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) => integral_float(n).map_or_else(|| value.clone(), Value::from),
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize_numbers(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Compact JSON text of `value`, writing integral floats without a
/// trailing `.0` so `{"n": 1.0}` serializes as `{"n":1}`.
pub fn to_compact_json(value: &Value) -> Result<String, WebhookError> {
    serde_json::to_string(&normalize_numbers(value))
        .map_err(|e| WebhookError::Serialization(e.to_string()))
}

/// Plain-text rendering of a JSON value.
///
/// Strings are unquoted, other scalars use their JSON text (integral floats
/// drop the trailing `.0`), arrays join their elements with `,` (`null`
/// elements render empty) and objects render as compact JSON.
pub fn natural_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => integral_float(n).map_or_else(|| n.to_string(), |i| i.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => natural_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => normalize_numbers(value).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn response_result_serializes_camel_case() {
        let result = ResponseResult {
            status: 200,
            response_body: r#"{"ok":true}"#.into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["responseBody"], r#"{"ok":true}"#);
    }

    #[test]
    fn composite_json_is_reserialized() {
        let data = ResponseData::Json(json!({"ok": true}));
        assert_eq!(data.to_response_body().unwrap(), r#"{"ok":true}"#);

        let data = ResponseData::Json(json!([1, "two"]));
        assert_eq!(data.to_response_body().unwrap(), r#"[1,"two"]"#);
    }

    #[test]
    fn primitive_json_uses_natural_form() {
        assert_eq!(
            ResponseData::Json(json!("pong")).to_response_body().unwrap(),
            "pong"
        );
        assert_eq!(ResponseData::Json(json!(null)).to_response_body().unwrap(), "null");
        assert_eq!(ResponseData::Json(json!(true)).to_response_body().unwrap(), "true");
        assert_eq!(ResponseData::Json(json!(42)).to_response_body().unwrap(), "42");
    }

    #[test]
    fn text_is_used_as_is() {
        let data = ResponseData::Text("pong".into());
        assert_eq!(data.to_response_body().unwrap(), "pong");
        assert_eq!(data.to_json_string().unwrap(), r#""pong""#);
    }

    #[test]
    fn natural_string_of_scalars() {
        assert_eq!(natural_string(&json!("a b")), "a b");
        assert_eq!(natural_string(&json!(1.0)), "1");
        assert_eq!(natural_string(&json!(1.5)), "1.5");
        assert_eq!(natural_string(&json!(-3)), "-3");
        assert_eq!(natural_string(&json!(false)), "false");
    }

    #[test]
    fn natural_string_of_composites() {
        assert_eq!(natural_string(&json!([1, null, "x", [2, 3]])), "1,,x,2,3");
        assert_eq!(natural_string(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn compact_json_drops_trailing_zero_fraction() {
        let value = json!({"n": 1.0, "f": 1.5, "i": 7, "list": [2.0, {"deep": -3.0}]});
        assert_eq!(
            to_compact_json(&value).unwrap(),
            r#"{"n":1,"f":1.5,"i":7,"list":[2,{"deep":-3}]}"#
        );
    }

    #[test]
    fn reserialized_response_normalizes_integral_floats() {
        let data = ResponseData::Json(json!({"total": 10.0}));
        assert_eq!(data.to_response_body().unwrap(), r#"{"total":10}"#);
        assert_eq!(data.to_json_string().unwrap(), r#"{"total":10}"#);
    }

    #[test]
    fn falsy_values() {
        for v in [json!(null), json!(false), json!(""), json!(0), json!(0.0)] {
            assert!(is_falsy(&v), "{v} should be falsy");
        }
        for v in [json!(true), json!("x"), json!(1), json!([]), json!({})] {
            assert!(!is_falsy(&v), "{v} should be truthy");
        }
    }
}
