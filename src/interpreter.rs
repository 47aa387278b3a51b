use crate::error::{LangError, LangResult, LineError};
use crate::parser::{Line, classify, parse_value};
use crate::value::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead};
use tracing::{debug, trace};

/// Dereferenced line text (trimmed) to the value it produced.
pub type OutputMapping = BTreeMap<String, Value>;

/// Constants defined so far in one run. Redefinition overwrites.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    constants: HashMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning the value it replaced.
    pub fn define(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.constants.insert(name.into(), value)
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

/// Interprets one raw line against `table`.
///
/// Definitions update the table and yield `None`, as do blank and
/// comment-only lines. A dereference yields the stored value exactly as it
/// was defined; references nested in it stay unresolved.
pub fn interpret(raw_line: &str, table: &mut SymbolTable) -> LangResult<Option<Value>> {
    match classify(raw_line)? {
        Line::Blank => {
            trace!("blank line");
            Ok(None)
        }
        Line::Definition { value, name } => {
            let value = parse_value(value)?;
            debug!(constant = name, kind = value.type_name(), "defined constant");
            if table.define(name, value).is_some() {
                debug!(constant = name, "replaced earlier definition");
            }
            Ok(None)
        }
        Line::Dereference { name } => {
            let value = table
                .lookup(name)
                .cloned()
                .ok_or_else(|| LangError::unknown_constant(name))?;
            debug!(constant = name, references = ?value.references(), "dereferenced constant");
            Ok(Some(value))
        }
    }
}

/// Result of one run: the output mapping and every line that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub output: OutputMapping,
    pub errors: Vec<LineError>,
}

/// State of one run over an input, fed one line at a time in order.
#[derive(Debug, Default)]
pub struct Session {
    table: SymbolTable,
    output: OutputMapping,
    errors: Vec<LineError>,
    line_number: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interprets the next line. A failure is recorded and also handed back
    /// so the caller can report it right away.
    pub fn feed(&mut self, raw_line: &str) -> Result<Option<&Value>, &LineError> {
        self.line_number += 1;
        match interpret(raw_line, &mut self.table) {
            Ok(Some(value)) => {
                let key = raw_line.trim();
                self.output.insert(key.to_string(), value);
                Ok(self.output.get(key))
            }
            Ok(None) => Ok(None),
            Err(error) => {
                self.errors.push(LineError {
                    line_number: self.line_number,
                    text: raw_line.to_string(),
                    error,
                });
                Err(&self.errors[self.errors.len() - 1])
            }
        }
    }

    pub fn finish(self) -> Report {
        debug!(
            constants = self.table.len(),
            entries = self.output.len(),
            errors = self.errors.len(),
            "run finished"
        );
        Report {
            output: self.output,
            errors: self.errors,
        }
    }
}

pub fn run_lines<I, S>(lines: I) -> Report
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut session = Session::new();
    for line in lines {
        let _ = session.feed(line.as_ref());
    }
    session.finish()
}

/// Runs every line of `reader`, calling `on_error` for each failing line as
/// it happens. Only I/O failures end the run early; bytes that are not UTF-8
/// are replaced and the line is interpreted like any other.
pub fn run_reader<R: BufRead>(
    mut reader: R,
    mut on_error: impl FnMut(&LineError),
) -> io::Result<Report> {
    let mut session = Session::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let line = String::from_utf8_lossy(bytes);
        if matches!(line, Cow::Owned(_)) {
            debug!(line = session.line_number + 1, "replaced invalid UTF-8");
        }
        if let Err(err) = session.feed(&line) {
            on_error(err);
        }
    }
    Ok(session.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn definition_stores_and_yields_nothing() {
        let mut table = SymbolTable::new();
        assert_eq!(interpret("[1, 2] -> PAIR", &mut table), Ok(None));
        assert_eq!(
            table.lookup("PAIR"),
            Some(&Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
        );
    }

    #[test]
    fn dereference_reads_table() {
        let mut table = SymbolTable::new();
        table.define("A", Value::Integer(3));
        assert_eq!(interpret("!A", &mut table), Ok(Some(Value::Integer(3))));
        assert_eq!(
            interpret("!B", &mut table),
            Err(LangError::unknown_constant("B"))
        );
    }

    #[test]
    fn top_level_identifier_definition_is_a_reference() {
        let mut table = SymbolTable::new();
        interpret("5 -> A", &mut table).unwrap();
        interpret("A -> B", &mut table).unwrap();
        assert_eq!(
            interpret("!B", &mut table),
            Ok(Some(Value::reference("A")))
        );
    }

    #[test]
    fn invalid_definition_leaves_table_untouched() {
        let mut table = SymbolTable::new();
        assert_eq!(
            interpret("[1, x] -> A", &mut table),
            Err(LangError::invalid_value("x"))
        );
        assert!(table.is_empty());
    }

    #[test]
    fn session_records_errors_with_line_numbers() {
        let mut session = Session::new();
        assert!(session.feed("1 -> A").is_ok());
        assert_eq!(
            session.feed("!Z").unwrap_err().line_number,
            2
        );
        assert_eq!(session.feed("!A"), Ok(Some(&Value::Integer(1))));

        let report = session.finish();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].text, "!Z");
        assert_eq!(report.errors[0].error, LangError::unknown_constant("Z"));
        assert_eq!(report.output.len(), 1);
    }

    #[test]
    fn output_key_is_trimmed_raw_line() {
        let report = run_lines(["2 -> A", "   !A   -- two  "]);
        assert_eq!(
            report.output.get("!A   -- two"),
            Some(&Value::Integer(2))
        );
    }

    #[test]
    fn reader_reports_errors_as_they_happen() {
        let input = Cursor::new("!A\n3 -> A\n!A\nbad line\n");
        let mut seen = Vec::new();
        let report = run_reader(input, |err| seen.push(err.line_number)).unwrap();
        assert_eq!(seen, vec![1, 4]);
        assert_eq!(report.output.get("!A"), Some(&Value::Integer(3)));
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_run() {
        let input = Cursor::new(b"1 -> A\r\n!A\n\xff\xfe -> B\n2 -> C\n!C".to_vec());
        let mut seen = Vec::new();
        let report = run_reader(input, |err| seen.push(err.clone())).unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].line_number, 3);
        assert_eq!(
            seen[0].error,
            LangError::invalid_value("\u{FFFD}\u{FFFD}")
        );
        assert_eq!(report.errors, seen);
        assert_eq!(report.output.get("!A"), Some(&Value::Integer(1)));
        assert_eq!(report.output.get("!C"), Some(&Value::Integer(2)));
        assert_eq!(report.output.len(), 2);
    }
}
