use crate::error::{LangError, LangResult};
use crate::value::Value;
use nom::{
    IResult, Parser as NomParser,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{digit1, satisfy, space0},
    combinator::{all_consuming, map_res, recognize},
    sequence::{pair, preceded},
};

pub const COMMENT_MARKER: &str = "--";
pub const DEFINITION_ARROW: &str = "->";
pub const DEREFERENCE_MARKER: &str = "!";

/// A line after comment stripping, classified by grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// `<value> -> NAME`; `value` is the untouched left-hand token.
    Definition { value: &'a str, name: &'a str },
    /// `!NAME`
    Dereference { name: &'a str },
}

/// Drops everything from the first `--` on and trims what is left.
pub fn strip_comment(line: &str) -> &str {
    line.split_once(COMMENT_MARKER)
        .map_or(line, |(code, _)| code)
        .trim()
}

pub fn classify(raw_line: &str) -> LangResult<Line<'_>> {
    let code = strip_comment(raw_line);
    if code.is_empty() {
        return Ok(Line::Blank);
    }

    if let Ok((_, (value, name))) = all_consuming(parse_definition).parse(code) {
        if !value.is_empty() {
            return Ok(Line::Definition { value, name });
        }
    }

    if let Ok((_, name)) = all_consuming(parse_dereference).parse(code) {
        return Ok(Line::Dereference { name });
    }

    Err(LangError::syntax(code))
}

fn parse_definition(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, value) = take_until(DEFINITION_ARROW)(input)?;
    let (input, _) = tag(DEFINITION_ARROW)(input)?;
    let (input, _) = space0(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (value.trim(), name)))
}

fn parse_dereference(input: &str) -> IResult<&str, &str> {
    preceded(tag(DEREFERENCE_MARKER), parse_identifier).parse(input)
}

/// `[_A-Z][_A-Za-z0-9]*`
pub fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c == '_' || c.is_ascii_uppercase()),
        take_while(|c: char| c == '_' || c.is_ascii_alphanumeric()),
    ))
    .parse(input)
}

pub fn parse_integer(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |s: &str| s.parse::<i64>()).parse(input)
}

pub fn is_identifier(token: &str) -> bool {
    all_consuming(parse_identifier).parse(token).is_ok()
}

/// Recognizes a single value token: array, then integer, then identifier.
///
/// Identifiers come back as [`Value::Reference`] and are not looked up.
/// Array elements are trimmed before they recurse, and an element that fails
/// is reported on its own rather than as the whole array.
pub fn parse_value(token: &str) -> LangResult<Value> {
    if let Some(body) = array_body(token) {
        return split_elements(body)
            .into_iter()
            .map(|element| parse_value(element.trim()))
            .collect::<LangResult<Vec<_>>>()
            .map(Value::Array);
    }

    if let Ok((_, value)) = all_consuming(parse_integer).parse(token) {
        return Ok(Value::Integer(value));
    }

    if is_identifier(token) {
        return Ok(Value::Reference(token.to_string()));
    }

    Err(LangError::invalid_value(token))
}

/// Contents of `token` when its opening `[` is closed by its final `]`.
fn array_body(token: &str) -> Option<&str> {
    let body = token.strip_prefix('[')?.strip_suffix(']')?;
    let mut depth = 0usize;
    for c in body.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(body)
}

/// Splits on commas at bracket depth zero.
fn split_elements(body: &str) -> Vec<&str> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in body.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                elements.push(&body[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    elements.push(&body[start..]);
    elements
}
