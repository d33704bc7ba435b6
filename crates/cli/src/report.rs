use hookcall_invoker::{MemoryOutput, natural_string};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `name=value` line per output.
    Text,
    /// A single JSON object.
    Json,
}

/// Render the reported outputs for stdout.
pub fn render(output: &MemoryOutput, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&output.clone().into_value())?),
        OutputFormat::Text => Ok(output
            .iter()
            .map(|(name, value)| format!("{name}={}", natural_string(value)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
