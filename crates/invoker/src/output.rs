use serde_json::{Map, Value};

use crate::types::ResponseResult;

/// Output name for the HTTP status code.
pub const STATUS_OUTPUT: &str = "status";
/// Output name for the normalized response body.
pub const RESPONSE_BODY_OUTPUT: &str = "responseBody";

/// Host-provided sink collecting named results of an invocation.
pub trait OutputSink {
    fn set(&mut self, name: &str, value: Value);
}

/// [`OutputSink`] that keeps outputs in memory, in the order they were set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryOutput {
    values: Map<String, Value>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the sink, returning the outputs as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl OutputSink for MemoryOutput {
    fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }
}

impl ResponseResult {
    /// Report `status` and `responseBody` to the host.
    pub fn report(&self, sink: &mut impl OutputSink) {
        sink.set(STATUS_OUTPUT, Value::from(self.status));
        sink.set(RESPONSE_BODY_OUTPUT, Value::from(self.response_body.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_sets_status_and_body() {
        let result = ResponseResult {
            status: 201,
            response_body: "created".into(),
        };
        let mut output = MemoryOutput::new();
        result.report(&mut output);

        assert_eq!(output.get(STATUS_OUTPUT), Some(&Value::from(201)));
        assert_eq!(output.get(RESPONSE_BODY_OUTPUT), Some(&Value::from("created")));
        assert_eq!(
            output.into_value(),
            serde_json::json!({"status": 201, "responseBody": "created"})
        );
    }

    #[test]
    fn new_output_is_empty() {
        let output = MemoryOutput::new();
        assert!(output.is_empty());
        assert_eq!(output.iter().count(), 0);
    }
}
