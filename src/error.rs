use thiserror::Error;

/// Errors that can occur while parsing a flow document.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    /// The canonical block is not well-formed structured data.
    #[error("Malformed flow block: {0}")]
    Syntax(String),

    /// The block is well-formed but does not describe a flow.
    #[error("Flow document schema error: {0}")]
    Schema(String),
}

/// Traversal failures caused by the graph itself.
///
/// Recoverable: the caller may retry with a different answer, go back, or
/// restart. The session state is unchanged when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Connection '{connection_id}' targets node '{target_id}', which does not exist in the flow")]
    BrokenLink {
        connection_id: String,
        target_id: String,
    },

    #[error("No connection out of node '{node_id}' matches the answer '{answer}'")]
    UnresolvedBranch { node_id: String, answer: String },
}

/// Errors returned by session operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Flow '{flow_id}' has {error_count} unresolved validation error(s); traversal is refused")]
    FlowInvalid { flow_id: String, error_count: usize },

    #[error("Node '{node_id}' is terminal; there is no forward step")]
    AtTerminal { node_id: String },

    #[error("finalize() requires a terminal node, but the session is at '{node_id}'")]
    NotTerminal { node_id: String },

    #[error("History is empty; there is no step to go back to")]
    NothingToUndo,

    #[error("A persistence call is in flight; the session is locked until it completes")]
    PersistBusy,

    #[error("The session is finalized and its responses are sealed")]
    Finalized,

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Errors raised by a persistence adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistError {
    #[error("Draft '{0}' not found")]
    DraftNotFound(String),

    #[error("Persistence backend failure: {0}")]
    Backend(String),
}

/// Errors that can occur when converting a custom format into a keiro
/// `FlowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error("Invalid flow data: {0}")]
    Invalid(String),
}
