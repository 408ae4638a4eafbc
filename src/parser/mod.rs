//! Turns a raw flow document into a `FlowDefinition`.
//!
//! Flow documents are plain text with zero or more fenced blocks of JSON
//! embedded in them. The last block is canonical: editors prepend partial
//! preview exports when re-saving, so earlier blocks must be ignored.
//! Documents from before the visual editor carry no block at all and fall
//! back to a heading-based reading.

mod legacy;
mod raw;

use tracing::debug;

use crate::error::{FlowConversionError, ParseError};
use crate::flow::{FlowDefinition, IntoFlow};
use raw::RawFlow;

/// Parses a flow document.
///
/// Never panics on malformed input; the result is always either a complete
/// definition or a structured error, and no partial definition is ever
/// returned.
pub fn parse(document: &str) -> Result<FlowDefinition, ParseError> {
    let blocks = fenced_blocks(document);
    match blocks.last() {
        Some(block) => {
            debug!(blocks = blocks.len(), "using last fenced block as canonical");
            parse_block(block)
        }
        None => legacy::parse_headings(document),
    }
}

/// Extracts the bodies of all fenced blocks, in document order. A fence is
/// a line starting with three backticks, optionally carrying an info
/// string; the block runs to the next fence line. An unclosed trailing
/// fence is discarded rather than guessed at.
fn fenced_blocks(document: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    for line in document.lines() {
        if line.trim_start().starts_with("```") {
            match current.take() {
                Some(body) => blocks.push(body),
                None => current = Some(String::new()),
            }
        } else if let Some(body) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    blocks
}

fn parse_block(block: &str) -> Result<FlowDefinition, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(block).map_err(|e| ParseError::Syntax(e.to_string()))?;
    let flow: RawFlow =
        serde_json::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))?;
    flow.into_flow().map_err(|e| match e {
        FlowConversionError::Invalid(message) => ParseError::Schema(message),
    })
}
