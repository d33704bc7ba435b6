use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use clap::Args;
use hookcall_invoker::{AUTH_HEADER_KEY, METHOD_KEY, WEBHOOK_URL_KEY};
use serde_json::{Map, Value};

/// Where the configuration record comes from. Flags override file values.
#[derive(Args, Debug, Default)]
pub struct RecordArgs {
    /// Configuration record file (.json, .toml, .yaml/.yml), or `-` for JSON
    /// on stdin.
    #[arg(long, short)]
    pub config: Option<String>,
    /// Target webhook URL.
    #[arg(long, env = "HOOKCALL_URL")]
    pub url: Option<String>,
    /// HTTP method (case-insensitive, defaults to POST).
    #[arg(long, env = "HOOKCALL_METHOD")]
    pub method: Option<String>,
    /// Raw Authorization header value.
    #[arg(long, env = "HOOKCALL_AUTH_HEADER", hide_env_values = true)]
    pub auth_header: Option<String>,
    /// JSON object merged into the payload (string or @file path).
    #[arg(long)]
    pub payload: Option<String>,
    /// Payload entry (key=value), sent as a string.
    #[arg(long = "field", value_parser = parse_key_val)]
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordFormat {
    Json,
    Toml,
    Yaml,
}

impl RecordFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Merge the file, `--payload`, `--field` and reserved-key flags into one
/// configuration record, in that order.
pub fn assemble(args: &RecordArgs) -> anyhow::Result<Map<String, Value>> {
    let mut record = match args.config.as_deref() {
        Some("-") => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read configuration from stdin")?;
            parse_record(&content, RecordFormat::Json)?
        }
        Some(path) => {
            let path = Path::new(path);
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_record(&content, RecordFormat::from_path(path))
                .with_context(|| format!("invalid configuration file {}", path.display()))?
        }
        None => Map::new(),
    };

    if let Some(payload) = &args.payload {
        let content = match payload.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read payload file {path}"))?,
            None => payload.clone(),
        };
        let payload = parse_record(&content, RecordFormat::Json).context("invalid --payload")?;
        record.extend(payload);
    }

    for (key, value) in &args.fields {
        record.insert(key.clone(), Value::String(value.clone()));
    }

    let overrides = [
        (WEBHOOK_URL_KEY, &args.url),
        (METHOD_KEY, &args.method),
        (AUTH_HEADER_KEY, &args.auth_header),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            record.insert(key.to_owned(), Value::String(value.clone()));
        }
    }

    Ok(record)
}

fn parse_record(content: &str, format: RecordFormat) -> anyhow::Result<Map<String, Value>> {
    let value: Value = match format {
        RecordFormat::Json => serde_json::from_str(content)?,
        RecordFormat::Toml => toml::from_str(content)?,
        RecordFormat::Yaml => serde_yaml_ng::from_str(content)?,
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("configuration record must be an object"),
    }
}
