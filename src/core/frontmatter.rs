//! Header-block parser for content files.
//!
//! A content file starts with a `---` line, holds one `key: value` pair per
//! line, and closes the block with another `---` line. Everything after the
//! closing line is the body. Values are typed by convention only:
//!
//! - keys listed as boolean fields become `true` when the value is `true` in
//!   any letter casing, `false` otherwise;
//! - `[a, "b", c]` becomes a list of strings with empty items dropped;
//! - everything else stays text.
//!
//! There is no escaping, nesting or multi-line value support.

use crate::domain::model::{ContentEntry, FieldValue, Metadata};
use crate::utils::error::{Result, SiteError};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub const MARKER: &str = "---";
const SEPARATOR: &str = ": ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    MissingOpeningMarker,
    MissingClosingMarker,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::MissingOpeningMarker => {
                write!(f, "file does not start with a '{}' header block", MARKER)
            }
            HeaderError::MissingClosingMarker => {
                write!(f, "header block is never closed by a '{}' line", MARKER)
            }
        }
    }
}

impl std::error::Error for HeaderError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub metadata: Metadata,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct FrontMatterParser {
    boolean_fields: HashSet<String>,
}

impl FrontMatterParser {
    pub fn new<I, S>(boolean_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            boolean_fields: boolean_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_boolean_field(&self, key: &str) -> bool {
        self.boolean_fields.contains(key)
    }

    pub fn parse(&self, source: &str) -> std::result::Result<ParsedDocument, HeaderError> {
        let (header, body) = split_header(source)?;

        let metadata = header
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_line(line))
            .collect();

        Ok(ParsedDocument {
            metadata,
            content: body.trim().to_string(),
        })
    }

    /// Parses a whole file; the slug comes from the file name.
    pub fn parse_entry(&self, path: &Path, source: &str) -> Result<ContentEntry> {
        let slug = slug_from_path(path).ok_or_else(|| SiteError::ParseError {
            path: path.display().to_string(),
            message: "file name has no usable stem".to_string(),
        })?;

        let document = self.parse(source).map_err(|e| SiteError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(ContentEntry {
            slug,
            metadata: document.metadata,
            content: document.content,
        })
    }

    fn parse_line(&self, line: &str) -> (String, FieldValue) {
        // 只切第一個 ": "，值裡的其他冒號原樣保留
        let (raw_key, raw_value) = match line.split_once(SEPARATOR) {
            Some((key, value)) => (key, value),
            None => (line.trim().trim_end_matches(':'), ""),
        };

        let key = raw_key.trim().to_string();
        let value = strip_quotes(raw_value.trim());

        if self.is_boolean_field(&key) {
            return (key, FieldValue::Flag(value.eq_ignore_ascii_case("true")));
        }

        if let Some(inner) = value
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let items = inner
                .split(',')
                .map(|item| strip_quotes(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect();
            return (key, FieldValue::List(items));
        }

        (key, FieldValue::Text(value.to_string()))
    }
}

/// Splits `source` into the header block text and the remaining body.
///
/// The opening marker must be the first non-blank line.
pub fn split_header(source: &str) -> std::result::Result<(&str, &str), HeaderError> {
    let trimmed = source.trim_start();
    let mut lines = trimmed.split_inclusive('\n');

    let first = lines.next().ok_or(HeaderError::MissingOpeningMarker)?;
    if first.trim() != MARKER {
        return Err(HeaderError::MissingOpeningMarker);
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim() == MARKER {
            let header = &trimmed[header_start..offset];
            let body = &trimmed[offset + line.len()..];
            return Ok((header, body));
        }
        offset += line.len();
    }

    Err(HeaderError::MissingClosingMarker)
}

/// `hello-world.mdx` -> `hello-world`, whatever the extension.
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Removes one layer of `'` or `"` when the value starts and ends with one.
fn strip_quotes(value: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => &value[1..value.len() - 1],
        _ => value,
    }
}
