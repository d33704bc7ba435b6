use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::client::{HttpClient, HttpResponse, ReqwestClient};
use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::output::OutputSink;
use crate::request::RequestSpec;
use crate::types::{ResponseData, ResponseResult};

/// Runs one webhook invocation: validate the record, build the request,
/// send it through the injected [`HttpClient`] and normalize the response.
///
/// Holds no state between invocations beyond the client itself.
pub struct WebhookInvoker<C = ReqwestClient> {
    client: C,
}

impl WebhookInvoker<ReqwestClient> {
    /// Create an invoker backed by a default [`ReqwestClient`].
    pub fn new() -> Result<Self, WebhookError> {
        Ok(Self::with_client(ReqwestClient::new()?))
    }
}

impl<C: HttpClient> WebhookInvoker<C> {
    /// Create an invoker that sends requests through `client`.
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validate, build and execute a webhook call for a configuration record.
    ///
    /// Failures are logged once and returned unchanged.
    #[instrument(skip_all)]
    pub async fn invoke(&self, record: Map<String, Value>) -> Result<ResponseResult, WebhookError> {
        let result = self.run(record).await;
        log_failure(&result);
        result
    }

    /// Like [`invoke`](Self::invoke), but aborts the in-flight request when
    /// `token` is cancelled.
    #[instrument(skip_all)]
    pub async fn invoke_with_cancellation(
        &self,
        record: Map<String, Value>,
        token: &CancellationToken,
    ) -> Result<ResponseResult, WebhookError> {
        let result = tokio::select! {
            biased;
            () = token.cancelled() => Err(WebhookError::Cancelled),
            result = self.run(record) => result,
        };
        log_failure(&result);
        result
    }

    /// Invoke and, on success only, report `status` and `responseBody` to
    /// `sink`.
    pub async fn invoke_and_report(
        &self,
        record: Map<String, Value>,
        sink: &mut impl OutputSink,
    ) -> Result<ResponseResult, WebhookError> {
        let result = self.invoke(record).await?;
        result.report(sink);
        Ok(result)
    }

    async fn run(&self, record: Map<String, Value>) -> Result<ResponseResult, WebhookError> {
        let config = WebhookConfig::validate(record)?;
        let spec = RequestSpec::build(&config)?;
        self.execute(&spec).await
    }

    /// Send a built request and normalize the response.
    ///
    /// Any status outside 200-299 becomes [`WebhookError::Request`].
    pub async fn execute(&self, spec: &RequestSpec) -> Result<ResponseResult, WebhookError> {
        let response = self.client.send(spec).await?;
        let status = response.status.as_u16();
        info!(status, status_text = %response.status_text, "webhook responded");

        let data = decode_body(&response)?;
        info!(body = %data, "webhook response body");

        if !response.status.is_success() {
            return Err(WebhookError::Request {
                status,
                body: data.to_json_string()?,
            });
        }

        Ok(ResponseResult {
            status,
            response_body: data.to_response_body()?,
        })
    }
}

fn decode_body(response: &HttpResponse) -> Result<ResponseData, WebhookError> {
    let is_json = response
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        let value = serde_json::from_slice(&response.body)
            .map_err(|e| WebhookError::Decode(e.to_string()))?;
        Ok(ResponseData::Json(value))
    } else {
        Ok(ResponseData::Text(
            String::from_utf8_lossy(&response.body).into_owned(),
        ))
    }
}

fn log_failure(result: &Result<ResponseResult, WebhookError>) {
    if let Err(err) = result {
        error!(error = %err, "webhook error");
    }
}
