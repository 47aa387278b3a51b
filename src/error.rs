use miette::Diagnostic;
use thiserror::Error;

pub type LangResult<T> = Result<T, LangError>;

#[derive(Clone, Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum LangError {
    #[error("invalid value: {token}")]
    #[diagnostic(
        code(const_lang::invalid_value),
        help("Values are integers (`42`), arrays (`[1, [2, 3], NAME]`) or names starting with an uppercase letter or `_`")
    )]
    InvalidValue { token: String },
    #[error("syntax error: {line}")]
    #[diagnostic(
        code(const_lang::syntax),
        help("Syntax: <value> -> NAME   or   !NAME")
    )]
    SyntaxError { line: String },
    #[error("unknown constant: {name}")]
    #[diagnostic(
        code(const_lang::unknown_constant),
        help("Define it on an earlier line, e.g. `0 -> {name}`")
    )]
    UnknownConstant { name: String },
}

impl LangError {
    pub fn invalid_value(token: impl Into<String>) -> Self {
        LangError::InvalidValue {
            token: token.into(),
        }
    }

    pub fn syntax(line: impl Into<String>) -> Self {
        LangError::SyntaxError { line: line.into() }
    }

    pub fn unknown_constant(name: impl Into<String>) -> Self {
        LangError::UnknownConstant { name: name.into() }
    }

    /// The text the error is about, used to place the diagnostic label.
    pub fn subject(&self) -> &str {
        match self {
            LangError::InvalidValue { token } => token,
            LangError::SyntaxError { line } => line,
            LangError::UnknownConstant { name } => name,
        }
    }
}

/// A failure on one input line. The run reports it and moves on.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("line {line_number}: {error}")]
pub struct LineError {
    pub line_number: usize,
    pub text: String,
    #[source]
    pub error: LangError,
}
