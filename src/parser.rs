//! Configuration documents are read back a line at a time.  This module holds
//! the parsers for those lines and assembles them into units.

mod common;
mod value;
mod document;

use nom::error::convert_error;
use nom::combinator::all_consuming;

use tracing::{instrument, event, Level};

use self::document::{line, Line};
pub use self::document::DEPENDENCIES_KEY;

use crate::models::{ConfigurationUnit, UnitKind, Value};

use anyhow::{Result, anyhow, Context};
use common::ws;

/// Receives a parser which it will run with the given input, and returns the parsed result.
/// Errors are unwrapped into a string with some additional context on where parsing errors
/// occured for the user.
fn parse_with_better_errors<'a, T>(input: &'a str, parser: impl Fn(&'a str) -> common::VResult<'a, T>) -> Result<T> {
    match all_consuming(ws(parser))(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(e) => {
            match e {
                nom::Err::Error(inner_e) | nom::Err::Failure(inner_e) => {
                    let fancy_error = convert_error(input, inner_e);
                    Err(anyhow!("Failed to parse: {}", fancy_error))
                },
                _ => {
                    Err(anyhow!("Failed to parse: {}", e))
                },
            }
        }
    }
}

pub fn parse_value(input: &str) -> Result<Value> {
    // values keep their surrounding whitespace, so skip the ws wrapper
    match all_consuming(value::value)(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(e) => Err(anyhow!("Failed to parse value '{}': {}", input, e)),
    }
}

pub fn is_label(input: &str) -> bool {
    !input.is_empty() && input.chars().all(common::is_label_char)
}

/// Whether a name can be written as a property key.  `Dependencies` is
/// reserved for the dependencies line.
pub fn is_property_key(input: &str) -> bool {
    !input.is_empty() && input != DEPENDENCIES_KEY && input.chars().all(common::is_key_char)
}

pub fn is_type_name(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| common::is_label_char(c) || c == '/')
}

/// Parses a configuration document into its units, in the order they appear
#[instrument(skip(input))]
pub fn parse_document(input: &str) -> Result<Vec<ConfigurationUnit>> {
    let mut units = Vec::new();
    let mut current: Option<ConfigurationUnit> = None;

    for (n, text) in input.lines().enumerate() {
        let line_no = n + 1;

        if text.trim().is_empty() {
            continue;
        }

        let parsed = parse_with_better_errors(text, line)
            .with_context(|| format!("Invalid document line {}", line_no))?;

        match parsed {
            Line::Comment => (),
            Line::Header { type_name, instance_id } => {
                if let Some(unit) = current.take() {
                    units.push(unit);
                }
                let kind = UnitKind::from_type_name(type_name);
                current = Some(ConfigurationUnit::new(kind, type_name, instance_id));
            },
            Line::Property(key, value) => {
                let unit = current.as_mut()
                    .ok_or_else(|| anyhow!("Line {}: property '{}' is outside of any unit", line_no, key))?;
                if unit.properties.contains(key) {
                    return Err(anyhow!("Line {}: property '{}' repeated in {}", line_no, key, unit.instance_id));
                }
                unit.properties.add_value(key, value);
            },
            Line::Dependencies(ids) => {
                let unit = current.as_mut()
                    .ok_or_else(|| anyhow!("Line {}: dependencies are outside of any unit", line_no))?;
                if !unit.depends_on.is_empty() {
                    return Err(anyhow!("Line {}: {} has more than one dependencies line", line_no, unit.instance_id));
                }
                for id in ids {
                    unit.add_dependency(id);
                }
            },
        }
    }

    if let Some(unit) = current {
        units.push(unit);
    }

    event!(Level::DEBUG, "Parsed {} units", units.len());

    Ok(units)
}
