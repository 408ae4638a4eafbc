//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from
//! the keiro crate. Import this module to get access to the core
//! functionality without having to import each item individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! // Parse a flow document and check it before doing anything else.
//! let document = std::fs::read_to_string("path/to/flow.md")?;
//! let flow = Arc::new(parse(&document)?);
//!
//! let issues = validate(&flow);
//! if has_errors(&issues) {
//!     for issue in &issues {
//!         eprintln!("{}", issue.message);
//!     }
//!     return Ok(());
//! }
//!
//! // Drive a user through the graph.
//! let mut session = Session::begin(flow)?;
//! session.advance(Answer::None)?;
//! # Ok(())
//! # }
//! ```

// Parsing and validation
pub use crate::parser::parse;
pub use crate::validator::{Severity, ValidationIssue, has_errors, validate};

// Graph model
pub use crate::flow::{
    ChoiceOption, Condition, Connection, FlowDefinition, FormField, IntoFlow, Node, NodeKind,
};

// Layout
pub use crate::layout::{Point, layout};

// Traversal
pub use crate::session::{
    Answer, DraftHandle, DraftRecord, PersistenceAdapter, ResponseEntry, Session, SessionStatus,
    SubmissionId,
};

// Error types
pub use crate::error::{GraphError, ParseError, PersistError, SessionError};

// Result type alias for convenience; the error defaults to a boxed trait
// object so application code can `?` across keiro's error types freely.
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
