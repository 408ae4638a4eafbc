//! Heading-based fallback for documents that predate the visual editor.

use itertools::Itertools;
use tracing::debug;

use super::raw::slugify;
use crate::error::ParseError;
use crate::flow::{Condition, Connection, FlowDefinition, Node, NodeKind};

/// Maps sequential Markdown headings onto a linear chain: a heading ending
/// in `?` becomes a yes-no step (both answers continue forward), any other
/// heading a free-text step. A synthetic start node heads the chain and a
/// synthetic end node closes it.
pub(super) fn parse_headings(document: &str) -> Result<FlowDefinition, ParseError> {
    let headings: Vec<&str> = document
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .strip_prefix('#')
                .map(|rest| rest.trim_start_matches('#').trim())
        })
        .filter(|text| !text.is_empty())
        .collect();

    if headings.is_empty() {
        return Err(ParseError::Schema(
            "document contains no flow block and no headings".to_string(),
        ));
    }

    debug!(steps = headings.len(), "falling back to heading chain");
    let name = headings[0].to_string();

    let mut nodes = vec![Node {
        id: "start".to_string(),
        question: String::new(),
        kind: NodeKind::Start,
    }];
    for (i, text) in headings.iter().enumerate() {
        let kind = if text.ends_with('?') {
            NodeKind::YesNo {
                yes_label: "Yes".to_string(),
                no_label: "No".to_string(),
            }
        } else {
            NodeKind::Text {
                placeholder: None,
                default_value: None,
                field_name: None,
                required: false,
            }
        };
        nodes.push(Node {
            id: format!("step-{}", i + 1),
            question: (*text).to_string(),
            kind,
        });
    }
    nodes.push(Node {
        id: "end".to_string(),
        question: String::new(),
        kind: NodeKind::End {
            thank_you_title: None,
            thank_you_message: None,
        },
    });

    let mut connections = Vec::new();
    let mut next_conn = 1;
    for (source, target) in nodes.iter().tuple_windows() {
        let conditions: &[Condition] = match source.kind {
            NodeKind::YesNo { .. } => &[Condition::Yes, Condition::No],
            _ => &[Condition::Any],
        };
        for condition in conditions {
            connections.push(Connection {
                id: format!("conn-{next_conn}"),
                source: source.id.clone(),
                target: target.id.clone(),
                condition: condition.clone(),
                label: None,
            });
            next_conn += 1;
        }
    }

    let id = slugify(&name);
    Ok(FlowDefinition::new(id, name, None, nodes, connections))
}
