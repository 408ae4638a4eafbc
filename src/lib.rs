//! # Keiro - Flow Definition & Execution Engine
//!
//! **Keiro** is the engine behind guided intake questionnaires: it parses a
//! flow document into a directed graph of steps, validates that graph's
//! structural soundness, computes deterministic editor layouts, and drives
//! stateful, resumable traversals of the graph as an end user answers
//! questions.
//!
//! ## Core Workflow
//!
//! 1.  **Parse**: `parser::parse` scans a document for embedded flow blocks
//!     (the last one is canonical) and yields an immutable `FlowDefinition`,
//!     a flat, id-indexed arena of nodes and connections.
//! 2.  **Validate**: `validator::validate` runs the structural check list
//!     (single start, terminal present, edge requirements, reachability)
//!     and returns a stable list of errors and warnings. Editors block
//!     saving on errors; sessions refuse to start on them.
//! 3.  **Lay out** (editors only): `layout::layout` assigns each node a
//!     deterministic 2D coordinate via BFS layering, with merge points
//!     sinking to later columns and barycenter ordering within a column.
//! 4.  **Traverse**: `session::Session` advances a user step by step,
//!     recording answers, supporting back navigation and restarts, saving
//!     resumable drafts, and sealing the response log on `finalize`.
//!
//! ## Quick Start
//!
//! ```rust
//! use keiro::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     // A two-question intake: start -> yes/no -> free text -> end.
//!     let flow = Arc::new(FlowDefinition::new(
//!         "demo-intake",
//!         "Demo intake",
//!         None,
//!         vec![
//!             Node {
//!                 id: "start".into(),
//!                 question: String::new(),
//!                 kind: NodeKind::Start,
//!             },
//!             Node {
//!                 id: "q1".into(),
//!                 question: "Have you filed before?".into(),
//!                 kind: NodeKind::YesNo {
//!                     yes_label: "Yes".into(),
//!                     no_label: "No".into(),
//!                 },
//!             },
//!             Node {
//!                 id: "q2".into(),
//!                 question: "Describe your situation".into(),
//!                 kind: NodeKind::Text {
//!                     placeholder: None,
//!                     default_value: None,
//!                     field_name: None,
//!                     required: false,
//!                 },
//!             },
//!             Node {
//!                 id: "done".into(),
//!                 question: String::new(),
//!                 kind: NodeKind::End {
//!                     thank_you_title: None,
//!                     thank_you_message: None,
//!                 },
//!             },
//!         ],
//!         vec![
//!             Connection {
//!                 id: "c1".into(),
//!                 source: "start".into(),
//!                 target: "q1".into(),
//!                 condition: Condition::Any,
//!                 label: None,
//!             },
//!             Connection {
//!                 id: "c2".into(),
//!                 source: "q1".into(),
//!                 target: "done".into(),
//!                 condition: Condition::Yes,
//!                 label: None,
//!             },
//!             Connection {
//!                 id: "c3".into(),
//!                 source: "q1".into(),
//!                 target: "q2".into(),
//!                 condition: Condition::No,
//!                 label: None,
//!             },
//!             Connection {
//!                 id: "c4".into(),
//!                 source: "q2".into(),
//!                 target: "done".into(),
//!                 condition: Condition::Any,
//!                 label: None,
//!             },
//!         ],
//!     ));
//!
//!     // Structural checks gate both saving and traversal.
//!     let issues = validate(&flow);
//!     assert!(!has_errors(&issues));
//!
//!     // Drive a user through the graph.
//!     let mut session = Session::begin(Arc::clone(&flow))?;
//!     session.advance(Answer::None)?; // leave the start node
//!     session.advance(Answer::Value("no".into()))?;
//!     session.advance(Answer::Value("My landlord kept the deposit.".into()))?;
//!     assert_eq!(session.responses().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flow;
pub mod layout;
pub mod parser;
pub mod prelude;
pub mod session;
pub mod validator;
