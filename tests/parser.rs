//! Tests for document parsing: fenced block extraction, schema handling,
//! and the legacy heading fallback.
mod common;
use common::*;
use keiro::prelude::*;

#[test]
fn test_parse_selects_last_block() {
    let flow = parse(TWO_BLOCK_DOCUMENT).expect("Failed to parse document");

    // The first block is an empty preview; the second must win.
    assert_eq!(flow.name, "Tenancy intake");
    assert_eq!(flow.id, "tenancy-intake");
    assert_eq!(
        flow.description.as_deref(),
        Some("Initial screening for tenancy matters")
    );
    assert_eq!(flow.nodes().len(), 4);
    assert_eq!(flow.connections().len(), 4);
}

#[test]
fn test_parse_reads_node_kinds() {
    let flow = parse(TWO_BLOCK_DOCUMENT).expect("Failed to parse document");

    let q1 = flow.node("q1").expect("q1 missing");
    assert_eq!(q1.question, "Have you filed before?");
    match &q1.kind {
        NodeKind::YesNo {
            yes_label,
            no_label,
        } => {
            assert_eq!(yes_label, "Yes");
            assert_eq!(no_label, "No");
        }
        other => panic!("Expected yes-no kind, got {:?}", other),
    }

    let q2 = flow.node("q2").expect("q2 missing");
    match &q2.kind {
        NodeKind::Text { placeholder, .. } => {
            assert_eq!(placeholder.as_deref(), Some("A few sentences"));
        }
        other => panic!("Expected text kind, got {:?}", other),
    }

    let e1 = flow.node("e1").expect("e1 missing");
    assert!(e1.is_terminal());
    match &e1.kind {
        NodeKind::End {
            thank_you_title, ..
        } => assert_eq!(thank_you_title.as_deref(), Some("Thank you")),
        other => panic!("Expected end kind, got {:?}", other),
    }
}

#[test]
fn test_parse_reads_conditions() {
    let flow = parse(TWO_BLOCK_DOCUMENT).expect("Failed to parse document");

    let conditions: Vec<&Condition> = flow.connections().iter().map(|c| &c.condition).collect();
    assert_eq!(
        conditions,
        vec![
            &Condition::Any,
            &Condition::Yes,
            &Condition::No,
            &Condition::Any
        ]
    );
}

#[test]
fn test_parse_option_label_condition() {
    let document = r#"
```json
{
  "name": "Branching",
  "nodes": [
    {"id": "s", "type": "start"},
    {"id": "pick", "type": "multiple-choice", "question": "Pick one",
     "options": [{"id": "a", "label": "Employment"}]},
    {"id": "e", "type": "end"}
  ],
  "connections": [
    {"id": "c0", "sourceNodeId": "s", "targetNodeId": "pick", "condition": "any"},
    {"id": "c1", "sourceNodeId": "pick", "targetNodeId": "e", "condition": "Employment"}
  ]
}
```
"#;
    let flow = parse(document).expect("Failed to parse document");
    assert_eq!(
        flow.connections()[1].condition,
        Condition::Option("Employment".to_string())
    );
}

#[test]
fn test_parse_malformed_block_is_syntax_error() {
    let document = "Notes.\n```json\n{not valid json\n```\n";
    let result = parse(document);
    assert!(matches!(result, Err(ParseError::Syntax(_))));
}

#[test]
fn test_parse_missing_connections_is_schema_error() {
    let document = "```json\n{\"name\": \"Broken\", \"nodes\": []}\n```\n";
    let result = parse(document);
    assert!(matches!(result, Err(ParseError::Schema(_))));
}

#[test]
fn test_parse_duplicate_node_id_is_schema_error() {
    let document = r#"
```json
{
  "name": "Duplicates",
  "nodes": [
    {"id": "s", "type": "start"},
    {"id": "s", "type": "end"}
  ],
  "connections": []
}
```
"#;
    match parse(document) {
        Err(ParseError::Schema(message)) => assert!(message.contains("duplicate")),
        other => panic!("Expected schema error, got {:?}", other),
    }
}

#[test]
fn test_legacy_heading_fallback() {
    let document = "\
# Intake questions
Some prose that is not a heading.
# Have you filed before?
# Describe your situation
";
    let flow = parse(document).expect("Failed to parse legacy document");

    assert_eq!(flow.name, "Intake questions");
    // start + three headings + end
    assert_eq!(flow.nodes().len(), 5);
    assert!(flow.nodes()[0].is_start());
    assert!(flow.nodes()[4].is_terminal());

    let question = flow.node("step-2").expect("step-2 missing");
    assert_eq!(question.question, "Have you filed before?");
    assert!(matches!(question.kind, NodeKind::YesNo { .. }));

    // A yes-no step links forward on both answers.
    let outgoing: Vec<&Connection> = flow.connections_from("step-2").collect();
    assert_eq!(outgoing.len(), 2);
    assert!(outgoing.iter().all(|c| c.target == "step-3"));

    let free_text = flow.node("step-3").expect("step-3 missing");
    assert!(matches!(free_text.kind, NodeKind::Text { .. }));
    let outgoing: Vec<&Connection> = flow.connections_from("step-3").collect();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].condition, Condition::Any);
    assert_eq!(outgoing[0].target, "end");

    // The synthesized chain is a valid flow in its own right.
    assert!(!has_errors(&validate(&flow)));
}

#[test]
fn test_legacy_without_headings_is_schema_error() {
    let result = parse("Just prose, no headings, no blocks.\n");
    assert!(matches!(result, Err(ParseError::Schema(_))));
}

#[test]
fn test_parse_unknown_type_is_accepted() {
    let document = r#"
```json
{
  "name": "Unknown kind",
  "nodes": [
    {"id": "s", "type": "start"},
    {"id": "x", "type": "videocall"},
    {"id": "e", "type": "end"}
  ],
  "connections": [
    {"id": "c0", "sourceNodeId": "s", "targetNodeId": "x", "condition": "any"},
    {"id": "c1", "sourceNodeId": "x", "targetNodeId": "e", "condition": "any"}
  ]
}
```
"#;
    // Unsupported types parse fine; rejecting them is the validator's job.
    let flow = parse(document).expect("Failed to parse document");
    let node = flow.node("x").expect("x missing");
    assert_eq!(node.kind.type_name(), "videocall");
    assert!(matches!(node.kind, NodeKind::Unknown { .. }));
}
