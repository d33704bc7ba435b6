//! Single-shot outbound webhook invoker.
//!
//! Turns a loosely-typed configuration record into one HTTP request, sends
//! it through an injected [`HttpClient`], and normalizes the response into a
//! [`ResponseResult`] or a [`WebhookError`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use hookcall_invoker::{MemoryOutput, WebhookInvoker};
//!
//! # async fn run() -> Result<(), hookcall_invoker::WebhookError> {
//! let record = serde_json::json!({
//!     "webhookUrl": "https://api.example.com/hook",
//!     "method": "post",
//!     "authHeader": "Bearer token-123",
//!     "event": "deployed",
//! });
//! let serde_json::Value::Object(record) = record else { unreachable!() };
//!
//! let invoker = WebhookInvoker::new()?;
//! let mut output = MemoryOutput::new();
//! invoker.invoke_and_report(record, &mut output).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod invoker;
pub mod output;
pub mod request;
pub mod types;

pub use client::{HttpClient, HttpResponse, ReqwestClient};
pub use config::{AUTH_HEADER_KEY, METHOD_KEY, RESERVED_KEYS, WEBHOOK_URL_KEY, WebhookConfig};
pub use error::WebhookError;
pub use invoker::WebhookInvoker;
pub use output::{MemoryOutput, OutputSink, RESPONSE_BODY_OUTPUT, STATUS_OUTPUT};
pub use request::RequestSpec;
pub use types::{ResponseData, ResponseResult, natural_string, to_compact_json};
