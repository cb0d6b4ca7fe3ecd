use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Formats a UTC instant as RFC 3339 without dropping sub-second precision
pub fn format_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses an RFC 3339 string back into UTC, returning None when it is malformed
pub fn parse_rfc3339(timestamp_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Escapes the characters that are significant inside HTML text and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders fields as a single HTML paragraph of `key: value` entries
pub fn render_fields_html(fields: &Map<String, Value>) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|(key, value)| {
            // Strings render bare, everything else as compact JSON
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}: {}", escape_html(key), escape_html(&value))
        })
        .collect();

    format!("<p>{}</p>", entries.join("<br>"))
}
