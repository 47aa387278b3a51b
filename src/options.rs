use crate::output::{OutputError, OutputFormat};
use std::env;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Overrides the default output format when `--format` is not given.
pub const FORMAT_ENV: &str = "CONST_LANG_FORMAT";

pub const USAGE: &str = "Usage: const-lang [--format yaml|json] [FILE]";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Input {
    #[default]
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Name used for this input in diagnostics.
    pub fn origin(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".into(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub input: Input,
    pub format: OutputFormat,
    pub help: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("Failed to access {path}: {source}")]
    Io { path: String, source: io::Error },
}

impl Options {
    pub fn from_env() -> Result<Self, CliError> {
        Self::parse(env::args().skip(1), env::var(FORMAT_ENV).ok())
    }

    /// Parses arguments (without the program name). `env_format` is the value
    /// of [`FORMAT_ENV`], consulted only when no `--format` flag is present.
    pub fn parse<I>(args: I, env_format: Option<String>) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut input = None;
        let mut format: Option<OutputFormat> = None;
        let mut help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => help = true,
                "-f" | "--format" => {
                    let value = args.next().ok_or_else(|| {
                        CliError::Usage(format!("Missing value for `{arg}`"))
                    })?;
                    format = Some(value.parse()?);
                }
                flag if flag.starts_with("--format=") => {
                    let value = flag.trim_start_matches("--format=");
                    format = Some(value.parse()?);
                }
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(CliError::Usage(format!("Unknown option `{flag}`")));
                }
                path => {
                    if input.is_some() {
                        return Err(CliError::Usage(format!(
                            "Unexpected extra input `{path}`"
                        )));
                    }
                    input = Some(if path == "-" {
                        Input::Stdin
                    } else {
                        Input::File(PathBuf::from(path))
                    });
                }
            }
        }

        let format = match format {
            Some(format) => format,
            None => match env_format {
                Some(value) if !value.trim().is_empty() => value.trim().parse::<OutputFormat>()?,
                _ => OutputFormat::default(),
            },
        };

        Ok(Self {
            input: input.unwrap_or_default(),
            format,
            help,
        })
    }
}
