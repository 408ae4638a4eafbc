use ahash::AHashMap;
use std::fmt;

use super::node::NodeKind;

/// A single step in a flow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// The question or content text shown for this step. Empty for steps
    /// that carry their text in the kind payload (start, end, info).
    pub question: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_start(&self) -> bool {
        self.kind.is_start()
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

/// The guard on a connection: which answer makes the edge eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Yes,
    No,
    /// Matches any answer; the single edge out of start, text, form and
    /// info steps.
    Any,
    /// Matches the label of one multiple-choice option.
    Option(String),
}

impl Condition {
    /// Whether the chosen answer label satisfies this condition. Matching
    /// is exact; labels come from the flow document itself.
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Condition::Yes => label == "yes",
            Condition::No => label == "no",
            Condition::Any => true,
            Condition::Option(l) => l == label,
        }
    }
}

impl From<&str> for Condition {
    fn from(raw: &str) -> Self {
        match raw {
            "yes" => Condition::Yes,
            "no" => Condition::No,
            "any" => Condition::Any,
            other => Condition::Option(other.to_string()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Yes => f.write_str("yes"),
            Condition::No => f.write_str("no"),
            Condition::Any => f.write_str("any"),
            Condition::Option(l) => f.write_str(l),
        }
    }
}

/// A directed, optionally condition-guarded edge between two steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: String,
    pub source: String,
    pub target: String,
    pub condition: Condition,
    pub label: Option<String>,
}

/// The complete, immutable definition of a flow graph.
///
/// Nodes and connections live in flat, document-ordered vectors; id lookups
/// go through indexes built once at construction. A `FlowDefinition` is
/// never mutated after parsing (an edit re-parses into a new value), so it
/// can be shared read-only across any number of concurrent sessions.
#[derive(Debug, Clone, Default)]
pub struct FlowDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    node_index: AHashMap<String, usize>,
    outgoing: AHashMap<String, Vec<usize>>,
}

impl FlowDefinition {
    /// Builds a definition and its lookup indexes. Node ids are expected to
    /// be unique; the parser enforces this before constructing.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        nodes: Vec<Node>,
        connections: Vec<Connection>,
    ) -> Self {
        let mut node_index = AHashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            node_index.entry(node.id.clone()).or_insert(slot);
        }
        let mut outgoing: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (slot, conn) in connections.iter().enumerate() {
            outgoing.entry(conn.source.clone()).or_default().push(slot);
        }
        Self {
            id: id.into(),
            name: name.into(),
            description,
            nodes,
            connections,
            node_index,
            outgoing,
        }
    }

    /// All steps, in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All connections, in document order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Looks up a step by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// All connections leaving `id`, in document order.
    pub fn connections_from(&self, id: &str) -> impl Iterator<Item = &Connection> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.connections[slot])
    }

    /// The first start-kind step, if any. Validation guarantees exactly one
    /// on any flow a session will traverse.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_start())
    }
}
