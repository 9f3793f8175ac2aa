//! Writes an export document to disk
//!
//! The text format is read back by `show` and other tooling, so the shape of
//! each line here is a contract with parser::document.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{event, instrument, Level};

use crate::error::ExportError;
use crate::models::{ConfigurationUnit, ExportDocument, Value};
use crate::parser::{is_label, is_property_key, is_type_name, parse_value, DEPENDENCIES_KEY};

pub const DOCUMENT_HEADER: &str = "# cfgx configuration export";

/// Renders the document and atomically replaces `path` with it.  Nothing is
/// left at `path` if any step fails.
#[instrument(skip(doc))]
pub fn write_document(doc: &ExportDocument, path: &Path) -> Result<(), ExportError> {
    let text = render(doc)?;

    let io_err = |source: std::io::Error| ExportError::Io { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;

    event!(Level::DEBUG, "Wrote {} bytes to {}", text.len(), path.display());

    Ok(())
}

pub fn render(doc: &ExportDocument) -> Result<String, ExportError> {
    let mut out = String::new();
    out.push_str(DOCUMENT_HEADER);
    out.push('\n');

    for (i, unit) in doc.units.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for line in unit_lines(unit)? {
            out.push_str(&line);
            out.push('\n');
        }
    }

    Ok(out)
}

/// The lines of one unit block: its header, then properties, then dependencies
pub fn unit_lines(unit: &ConfigurationUnit) -> Result<Vec<String>, ExportError> {
    let unwritable = |reason: String| ExportError::Unwritable { unit: unit.instance_id.clone(), reason };

    if !is_type_name(&unit.type_name) {
        return Err(unwritable(format!("invalid type name '{}'", unit.type_name)));
    }
    if !is_label(&unit.instance_id) {
        return Err(unwritable("invalid instance id".to_string()));
    }

    let mut lines = vec![header_line(unit)];

    for (key, value) in unit.properties.iter() {
        if !is_property_key(key) {
            return Err(unwritable(format!("invalid property name '{}'", key)));
        }
        lines.push(property_line(key, value));
    }

    if let Some(deps) = dependencies_line(&unit.depends_on) {
        lines.push(deps);
    }

    Ok(lines)
}

fn header_line(unit: &ConfigurationUnit) -> String {
    format!("{} [{}]", unit.type_name, unit.instance_id)
}

fn property_line(key: &str, value: &Value) -> String {
    format!("  {}: {}", key, encode_value(value))
}

fn dependencies_line(depends_on: &[String]) -> Option<String> {
    if depends_on.is_empty() {
        None
    } else {
        Some(format!("  {}: {}", DEPENDENCIES_KEY, depends_on.join(", ")))
    }
}

/// Strings are written bare whenever they would read back as the same string,
/// and quoted otherwise
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => {
            if reads_back_plain(s) {
                s.clone()
            } else {
                quote(s)
            }
        },
        other => other.to_string(),
    }
}

fn reads_back_plain(s: &str) -> bool {
    if s.is_empty() || s.trim() != s || s.chars().any(char::is_control) {
        return false;
    }

    match parse_value(s) {
        Ok(Value::String(parsed)) => parsed == s,
        _ => false,
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
