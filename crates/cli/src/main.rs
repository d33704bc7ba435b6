//! hookcall CLI
//!
//! Invokes a single outbound webhook described by a configuration record and
//! prints the reported `status` and `responseBody`.

mod record;
mod report;

use std::time::Duration;

use clap::Parser;
use hookcall_invoker::{MemoryOutput, ReqwestClient, WebhookInvoker};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::record::RecordArgs;
use crate::report::OutputFormat;

/// hookcall — send one webhook and report the response.
#[derive(Parser, Debug)]
#[command(name = "hookcall", version, about)]
struct Cli {
    #[command(flatten)]
    record: RecordArgs,

    /// Abort the request after this many seconds. No timeout by default.
    #[arg(long, env = "HOOKCALL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let record = record::assemble(&cli.record)?;

    let client = match cli.timeout_secs {
        Some(secs) => ReqwestClient::with_timeout(Duration::from_secs(secs))?,
        None => ReqwestClient::new()?,
    };
    let invoker = WebhookInvoker::with_client(client);

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        canceller.cancel();
    });

    let result = invoker.invoke_with_cancellation(record, &token).await?;

    let mut output = MemoryOutput::new();
    result.report(&mut output);
    println!("{}", report::render(&output, cli.format)?);
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
