//! Filter query parser for task filtering.
//!
//! Parses user-provided queries into a [`FilterState`]. Supports field-based filters with quoted
//! values, followed by free-text search.
//!
//! # Syntax
//!
//! ```text
//! query        := [filter_expr "|"] search_text
//! filter_expr  := field_filter*
//! field_filter := field_name:value | field_name:"quoted value"
//! field_name   := status | assignee | month | date (case-insensitive)
//! ```
//!
//! # Supported Fields
//!
//! - `status:name` - Section/column bucket; repeat to select several (OR'd together)
//! - `assignee:name` - Exact assignee
//! - `month:"March 2024"` - Completion month label
//! - `date:2024-03` - Literal prefix of the completion timestamp (`YYYY-MM-DD` shape)
//!
//! # Examples
//!
//! ```rust
//! # use task_export_explorer::filters::parser::parse_query;
//! // Plain search
//! let state = parse_query("login bug").unwrap();
//! assert_eq!(state.search_query(), "login bug");
//!
//! // Filters and search
//! let state = parse_query("status:Done status:\"In Progress\" assignee:Ann | bug").unwrap();
//! assert_eq!(state.selected_statuses().len(), 2);
//! assert_eq!(state.search_query(), "bug");
//! ```

use anyhow::{Context, Result, anyhow, bail};

use super::state::FilterState;

/// Token produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    field: String,
    value: String,
}

/// Filterable fields in the query syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryField {
    Status,
    Assignee,
    Month,
    Date,
}

impl QueryField {
    fn name(self) -> &'static str {
        match self {
            QueryField::Status => "status",
            QueryField::Assignee => "assignee",
            QueryField::Month => "month",
            QueryField::Date => "date",
        }
    }
}

/// Tokenize filter input into field:value tokens
fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let word = read_word(&mut chars);

        let Some(colon_pos) = word.find(':') else {
            return Err(anyhow!(
                "Invalid token: '{}' (expected field:value; put search text after '|')",
                word
            ));
        };

        let field = word[..colon_pos].to_string();
        let mut value = word[colon_pos + 1..].to_string();

        if value.starts_with('"') {
            value = read_quoted_value(&mut chars, &value)?;
        }

        if field.is_empty() || value.is_empty() {
            return Err(anyhow!("Invalid field:value format: {}", word));
        }

        tokens.push(Token { field, value });
    }

    Ok(tokens)
}

/// Read a word (until whitespace or end)
fn read_word(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut word = String::new();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            break;
        }
        word.push(ch);
        chars.next();
    }

    word
}

/// Read a quoted value; `initial` holds the part already read, starting at the opening quote
///
/// The closing quote must end the word: `"Do"ne` is rejected rather than read as `Do`.
fn read_quoted_value(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    initial: &str,
) -> Result<String> {
    let mut value = initial[1..].to_string();

    if let Some(quote_pos) = value.find('"') {
        ensure_quote_ends_word(&value[quote_pos + 1..])?;
        value.truncate(quote_pos);
        return Ok(value);
    }

    while let Some(ch) = chars.next() {
        if ch == '"' {
            let trailing = read_word(chars);
            ensure_quote_ends_word(&trailing)?;
            return Ok(value);
        }
        value.push(ch);
    }

    Err(anyhow!("Unterminated quoted string"))
}

fn ensure_quote_ends_word(trailing: &str) -> Result<()> {
    if !trailing.is_empty() {
        bail!("Unexpected text after closing quote: '{}'", trailing);
    }
    Ok(())
}

fn parse_field(field: &str) -> Result<QueryField> {
    match field.to_lowercase().as_str() {
        "status" => Ok(QueryField::Status),
        "assignee" => Ok(QueryField::Assignee),
        "month" => Ok(QueryField::Month),
        "date" => Ok(QueryField::Date),
        _ => Err(anyhow!(
            "Unknown field: '{}' (valid fields: status, assignee, month, date)",
            field
        )),
    }
}

/// Check that a value is a prefix of the `YYYY-MM-DD` shape, e.g. `2024`, `2024-03`, `2024-03-01`
fn is_date_prefix(value: &str) -> bool {
    const SHAPE: &[u8] = b"dddd-dd-dd";

    value.len() <= SHAPE.len()
        && value.bytes().zip(SHAPE.iter().copied()).all(|(byte, expected)| match expected {
            b'd' => byte.is_ascii_digit(),
            _ => byte == expected,
        })
}

/// Reject completion-date prefixes that can never match a `YYYY-MM-DD` timestamp
pub fn validate_date_prefix(value: &str) -> Result<()> {
    if !is_date_prefix(value) {
        bail!("Invalid date prefix: '{}' (expected part of YYYY-MM-DD)", value);
    }
    Ok(())
}

/// Parse field filters into a fresh [`FilterState`] (search text left empty)
///
/// Examples:
/// - "status:Done" → one selected status
/// - "status:Done status:Blocked" → two statuses, OR'd
/// - "assignee:\"Ann Lee\" date:2024-03" → assignee and date prefix
pub fn parse_filter(input: &str) -> Result<FilterState> {
    let mut state = FilterState::new();
    if input.trim().is_empty() {
        return Ok(state);
    }

    let tokens = tokenize(input).context("Failed to tokenize filter")?;

    for Token { field, value } in tokens {
        let field = parse_field(&field)?;
        match field {
            QueryField::Status => {
                if !state.selected_statuses().contains(value.as_str()) {
                    state.toggle_status(&value);
                }
            }
            QueryField::Assignee => {
                ensure_unset(field, state.selected_assignee())?;
                state.set_selected_assignee(value);
            }
            QueryField::Month => {
                ensure_unset(field, state.completion_month())?;
                state.set_completion_month(value);
            }
            QueryField::Date => {
                ensure_unset(field, state.completion_date_prefix())?;
                validate_date_prefix(&value)?;
                state.set_completion_date_prefix(value);
            }
        }
    }

    Ok(state)
}

fn ensure_unset(field: QueryField, current: &str) -> Result<()> {
    if !current.is_empty() {
        bail!("'{}' accepts a single value", field.name());
    }
    Ok(())
}

/// Split a query into its filter portion (left of `|`) and search portion
///
/// Without `|` the entire input is search text.
pub fn split_query(input: &str) -> (Option<&str>, &str) {
    if let Some(pipe_pos) = input.find('|') {
        let filter_part = input[..pipe_pos].trim();
        let search_part = input[pipe_pos + 1..].trim();
        let filter = if filter_part.is_empty() { None } else { Some(filter_part) };
        (filter, search_part)
    } else {
        (None, input)
    }
}

/// Parse a full query (filters and search text) into a [`FilterState`]
pub fn parse_query(input: &str) -> Result<FilterState> {
    let (filter_part, search_part) = split_query(input);
    let mut state = match filter_part {
        Some(filter) => parse_filter(filter)?,
        None => FilterState::new(),
    };
    state.set_search_query(search_part);
    Ok(state)
}
