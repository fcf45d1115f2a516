//! Output rows and their CSV encoding.

use std::borrow::Cow;

use crate::extract::Extracted;

/// Column names, in output order.
pub const HEADER: [&str; 4] = ["SourceAddress", "ChannelAddress", "ChannelTitle", "Error"];

/// Prefix that makes spreadsheet applications treat a cell as literal text.
pub const FORMULA_ESCAPE: char = '\'';

/// Leading characters that spreadsheet applications evaluate as formulas.
const FORMULA_TRIGGERS: &[char] = &['=', '+', '-'];

/// One result line: exactly one per input item, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    /// The input address.
    pub source: String,
    /// Channel address, empty if not found or on failure.
    pub channel_url: String,
    /// Channel title, empty if not found or on failure.
    pub title: String,
    /// Failure text, empty on success.
    pub error: String,
}

impl OutputRow {
    /// Row for a fetched page. Missing fields stay empty and are not errors.
    #[must_use]
    pub fn success(source: impl Into<String>, fields: Extracted) -> Self {
        Self {
            source: source.into(),
            channel_url: fields.channel_url,
            title: fields.title,
            error: String::new(),
        }
    }

    /// Row for an item that was rejected or failed to fetch.
    #[must_use]
    pub fn failure(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error: error.into(),
            ..Self::default()
        }
    }

    /// Returns true if the row records a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Field values in [`HEADER`] order.
    #[must_use]
    pub fn fields(&self) -> [&str; 4] {
        [&self.source, &self.channel_url, &self.title, &self.error]
    }
}

/// Prefixes values that would otherwise be evaluated as spreadsheet formulas.
#[must_use]
pub fn escape_formula(value: &str) -> Cow<'_, str> {
    if value.starts_with(FORMULA_TRIGGERS) {
        Cow::Owned(format!("{FORMULA_ESCAPE}{value}"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Appends one CSV record (formula-escaped, quoted where needed, `\n`-terminated).
pub(crate) fn encode_record<'a>(fields: impl IntoIterator<Item = &'a str>, out: &mut String) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        let field = escape_formula(field);
        if needs_quotes(&field) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push('\n');
}

fn needs_quotes(field: &str) -> bool {
    field.starts_with([' ', '\t']) || field.contains([',', '"', '\r', '\n'])
}
