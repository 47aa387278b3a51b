use crate::interpreter::OutputMapping;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Unknown output format `{0}` (expected `yaml` or `json`)")]
    UnknownFormat(String),
    #[error("Failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

/// Renders the output mapping as a complete document ending in a newline.
pub fn render(output: &OutputMapping, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(output)?),
        OutputFormat::Json => {
            let mut document = serde_json::to_string_pretty(output)?;
            document.push('\n');
            Ok(document)
        }
    }
}
