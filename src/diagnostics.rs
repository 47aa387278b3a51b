use crate::error::{LangError, LineError};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

/// A failed line rendered against its own source text. Code and help come
/// from the underlying [`LangError`].
#[derive(Debug, Error, Diagnostic)]
#[error("{error}")]
#[diagnostic(forward(error))]
pub struct LineDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
    error: LangError,
}

impl LineDiagnostic {
    /// `origin` names the input (a path or `<stdin>`).
    pub fn from_error(origin: &str, err: &LineError) -> Self {
        let src = NamedSource::new(
            format!("{}:{}", origin, err.line_number),
            err.text.clone(),
        );
        Self {
            src,
            span: label_span(&err.text, err.error.subject()),
            label: label_text(err),
            error: err.error.clone(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

fn label_text(err: &LineError) -> String {
    match &err.error {
        LangError::InvalidValue { .. } => "not an integer, array or constant name".into(),
        LangError::SyntaxError { .. } => "neither a definition nor a dereference".into(),
        LangError::UnknownConstant { .. } => "not defined on any earlier line".into(),
    }
}

/// Points at `subject` inside `text`, or at the whole trimmed line when the
/// subject is empty or absent.
fn label_span(text: &str, subject: &str) -> SourceSpan {
    if !subject.is_empty() {
        if let Some(start) = text.find(subject) {
            return (start, subject.len()).into();
        }
    }
    let start = text.len() - text.trim_start().len();
    (start, text.trim().len()).into()
}

pub fn emit_line_error(origin: &str, err: &LineError) {
    let diagnostic = LineDiagnostic::from_error(origin, err);
    eprintln!("{:?}", Report::new(diagnostic));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line_error(text: &str, error: LangError) -> LineError {
        LineError {
            line_number: 7,
            text: text.to_string(),
            error,
        }
    }

    #[test]
    fn label_points_at_offending_token() {
        let err = line_error("[1, x] -> A", LangError::invalid_value("x"));
        let diagnostic = LineDiagnostic::from_error("input.cl", &err);
        assert_eq!(diagnostic.span(), SourceSpan::from((4, 1)));
        assert_eq!(diagnostic.to_string(), "invalid value: x");
        assert_eq!(
            diagnostic.code().map(|code| code.to_string()),
            Some("const_lang::invalid_value".to_string())
        );
    }

    #[test]
    fn empty_subject_covers_trimmed_line() {
        let err = line_error("  [1,,2] -> A ", LangError::invalid_value(""));
        let diagnostic = LineDiagnostic::from_error("<stdin>", &err);
        assert_eq!(diagnostic.span(), SourceSpan::from((2, 11)));
    }

    #[test]
    fn unknown_constant_help_names_the_constant() {
        let err = line_error("!MISSING", LangError::unknown_constant("MISSING"));
        let diagnostic = LineDiagnostic::from_error("<stdin>", &err);
        let help = diagnostic.help().map(|help| help.to_string()).unwrap();
        assert!(help.contains("-> MISSING"), "{help}");
        assert_eq!(diagnostic.span(), SourceSpan::from((1, 7)));
    }

    #[test]
    fn code_and_help_follow_the_error_kind() {
        let err = line_error("!a", LangError::syntax("!a"));
        let diagnostic = LineDiagnostic::from_error("<stdin>", &err);
        assert_eq!(
            diagnostic.code().map(|code| code.to_string()),
            Some("const_lang::syntax".to_string())
        );
        assert_eq!(
            diagnostic.help().map(|help| help.to_string()),
            Some("Syntax: <value> -> NAME   or   !NAME".to_string())
        );
        let labels: Vec<_> = diagnostic.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label(), Some("neither a definition nor a dereference"));
        assert!(diagnostic.source_code().is_some());
    }
}
