/// Reports on events emitted from the engine to the CLI
///
/// Export stages are rendered as nested sections.  Below verbose output the
/// stage events are only buffered, and replayed if the export fails so the
/// error can be shown with the context of where it happened.
use anyhow::Result;
use colored::*;

use crate::events::{Event, Observer};
use crate::models::ExportDocument;
use crate::engine::unit_lines;

mod ctx;

use ctx::RootContext;

pub struct EngineLogger {
    context: RootContext,
}

/// Sets the noise level for a reporter
#[derive(Clone, Debug, PartialOrd, PartialEq)]
pub enum Verbosity {
    Quiet,
    Default,
    Verbose,
    Debug,
}

impl EngineLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { context: RootContext::new(verbosity) }
    }
}

impl Observer for EngineLogger {
    fn handle(&mut self, event: Event) -> Result<()> {
        self.context.handle(event);
        Ok(())
    }
}

/// Prints a document as a dependency ordered listing, colouring type names
pub fn print_document(doc: &ExportDocument) -> Result<()> {
    if doc.is_empty() {
        println!("{}", "No units".yellow());
        return Ok(());
    }

    for line in document_lines(doc, true)? {
        println!("{}", line);
    }

    Ok(())
}

/// The listing for `show`.  Each unit is rendered with the same lines the
/// serializer writes, so without colour the listing is the document body.
pub fn document_lines(doc: &ExportDocument, color: bool) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    for (i, unit) in doc.units.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }

        let mut block = unit_lines(unit)?.into_iter();

        if let Some(header) = block.next() {
            if color {
                let (type_name, rest) = header.split_at(unit.type_name.len());
                lines.push(format!("{}{}", type_name.cyan().bold(), rest));
            } else {
                lines.push(header);
            }
        }

        lines.extend(block);
    }

    Ok(lines)
}
