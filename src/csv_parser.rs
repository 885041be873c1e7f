use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Index;

lazy_static! {
    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"\r?\n").unwrap();
}

/// One parsed CSV record, keyed by header name
///
/// Keys keep the header order of the source file. Lookups of a key that is
/// not present yield the empty string, the same value a short row gets for
/// its missing trailing columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Row(IndexMap::new())
    }

    /// Value stored under `name`, or `""` when the row has no such column
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Insert or overwrite a column value. New columns are appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<&str> for Row {
    type Output = str;

    fn index(&self, name: &str) -> &str {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row(iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    // A quote was seen inside a quoted field: either an escape or the closing quote.
    QuoteInQuoted,
}

/// Split a single CSV line into its fields
///
/// With `quoted` set, fields may be wrapped in double quotes; a quoted field
/// may contain commas and uses `""` for a literal quote. Without it the line
/// is split on every comma. With `trimmed` set every field, quoted or not,
/// loses its surrounding whitespace.
///
/// # Arguments
/// * `line` - A single line, without its line terminator
/// * `quoted` - Honour double-quoted fields
/// * `trimmed` - Trim whitespace from every field
///
/// # Returns
/// * `Vec<String>` - The decoded fields, in order. An empty line has no fields.
///
/// # Examples
/// ```
/// use event_listing::csv_parser::parse_line;
///
/// let fields = parse_line(r#"Concert,"Hall A, ""North"" wing",,"#, true, true);
/// assert_eq!(fields, vec!["Concert", r#"Hall A, "North" wing"#, "", ""]);
/// ```
pub fn parse_line(line: &str, quoted: bool, trimmed: bool) -> Vec<String> {
    let fields = if quoted {
        scan_quoted_line(line)
    } else {
        line.split(',').map(str::to_string).collect()
    };

    if trimmed {
        fields.into_iter().map(|f| f.trim().to_string()).collect()
    } else {
        fields
    }
}

fn scan_quoted_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    if line.is_empty() {
        return result;
    }

    let mut current_field = String::new();
    let mut state = ScanState::FieldStart;

    for c in line.chars() {
        state = match (state, c) {
            // Whitespace ahead of an opening quote is dropped with it
            (ScanState::FieldStart, '"') => {
                current_field.clear();
                ScanState::Quoted
            }
            (ScanState::FieldStart, ',') | (ScanState::Unquoted, ',') => {
                result.push(std::mem::take(&mut current_field));
                ScanState::FieldStart
            }
            (ScanState::FieldStart, c) if c.is_whitespace() => {
                current_field.push(c);
                ScanState::FieldStart
            }
            (ScanState::FieldStart, _) | (ScanState::Unquoted, _) => {
                current_field.push(c);
                ScanState::Unquoted
            }
            (ScanState::Quoted, '"') => ScanState::QuoteInQuoted,
            (ScanState::Quoted, _) => {
                current_field.push(c);
                ScanState::Quoted
            }
            (ScanState::QuoteInQuoted, '"') => {
                current_field.push('"');
                ScanState::Quoted
            }
            (ScanState::QuoteInQuoted, ',') => {
                result.push(std::mem::take(&mut current_field));
                ScanState::FieldStart
            }
            // Stray text after a closing quote stays with the field
            (ScanState::QuoteInQuoted, _) => {
                current_field.push(c);
                ScanState::Unquoted
            }
        };
    }

    // The last field, which is empty after a trailing comma
    result.push(current_field);

    result
}

/// Convert CSV text into rows keyed by the header line
///
/// Blank and whitespace-only lines are skipped wherever they appear. The
/// first remaining line is the header; it is parsed with the given `quoted`
/// flag. Data lines are always parsed quote-aware and trimmed. Short rows are
/// padded with empty strings and surplus fields are dropped.
///
/// # Arguments
/// * `text` - Whole CSV document, `\n` or `\r\n` separated
/// * `quoted` - Honour double-quoted fields in the header line
///
/// # Returns
/// * `Vec<Row>` - One row per data line, in input order
///
/// # Examples
/// ```
/// use event_listing::csv_parser::parse_text;
///
/// let rows = parse_text("title,isoDate\r\n\r\nOpen house,2024-03-15\nGala", true);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].get("isoDate"), "2024-03-15");
/// assert_eq!(rows[1].get("isoDate"), "");
/// ```
pub fn parse_text(text: &str, quoted: bool) -> Vec<Row> {
    let mut lines = LINE_BREAK_REGEX
        .split(text)
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = parse_line(header_line, quoted, true);

    lines
        .map(|line| -> Row {
            let fields = parse_line(line, true, true);
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), fields.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// Header names of a CSV document, in column order
pub fn parse_headers(text: &str, quoted: bool) -> Vec<String> {
    LINE_BREAK_REGEX
        .split(text)
        .find(|line| !line.trim().is_empty())
        .map(|line| parse_line(line, quoted, true))
        .unwrap_or_default()
}
