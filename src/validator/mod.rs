//! Structural validation of a parsed flow.
//!
//! Every check runs independently (no short-circuiting) and in a fixed
//! order, so issue lists are stable across runs and usable in snapshot
//! assertions. The one exception is an empty flow, which yields a single
//! fatal issue and skips the rest.
//!
//! Consumers apply policy, not this module: editors block saving on
//! error-severity issues and ask for confirmation on warnings; sessions
//! refuse to start or resume while any error exists.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;
use tracing::debug;

use crate::flow::{FlowDefinition, NodeKind};

/// How bad a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks saving and traversal until resolved.
    Error,
    /// Saveable with confirmation; traversal proceeds.
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    pub node_id: Option<String>,
}

impl ValidationIssue {
    fn error(message: impl Into<String>, node_id: Option<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            node_id,
        }
    }

    fn warning(message: impl Into<String>, node_id: Option<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            node_id,
        }
    }
}

/// True when any issue in the list is error-severity.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Runs all structural checks against a flow.
pub fn validate(flow: &FlowDefinition) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // An empty flow is a single fatal finding; nothing else is worth
    // reporting about it.
    if flow.nodes().is_empty() {
        issues.push(ValidationIssue::error("Flow contains no nodes", None));
        return issues;
    }

    check_single_start(flow, &mut issues);
    check_terminal_exists(flow, &mut issues);
    check_supported_types(flow, &mut issues);
    check_connection_endpoints(flow, &mut issues);
    check_incoming(flow, &mut issues);
    check_outgoing(flow, &mut issues);
    check_reachability(flow, &mut issues);
    check_soft_warnings(flow, &mut issues);

    debug!(
        flow = %flow.id,
        errors = issues.iter().filter(|i| i.severity == Severity::Error).count(),
        warnings = issues.iter().filter(|i| i.severity == Severity::Warning).count(),
        "validation finished"
    );
    issues
}

fn check_single_start(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    let starts = flow.nodes().iter().filter(|n| n.is_start()).count();
    if starts == 0 {
        issues.push(ValidationIssue::error("Flow has no start node", None));
    } else if starts > 1 {
        issues.push(ValidationIssue::error(
            format!("Flow has {starts} start nodes; exactly one is required"),
            None,
        ));
    }
}

fn check_terminal_exists(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    if !flow.nodes().iter().any(|n| n.is_terminal()) {
        issues.push(ValidationIssue::error(
            "Flow has no end or success node",
            None,
        ));
    }
}

fn check_supported_types(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    for node in flow.nodes() {
        if let NodeKind::Unknown { type_name } = &node.kind {
            issues.push(ValidationIssue::error(
                format!(
                    "Node '{}' has unsupported type '{}' and must be removed",
                    node.id, type_name
                ),
                Some(node.id.clone()),
            ));
        }
    }
}

fn check_connection_endpoints(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    for conn in flow.connections() {
        if !flow.contains_node(&conn.source) {
            issues.push(ValidationIssue::error(
                format!(
                    "Connection '{}' references missing source node '{}'",
                    conn.id, conn.source
                ),
                None,
            ));
        }
        if !flow.contains_node(&conn.target) {
            issues.push(ValidationIssue::error(
                format!(
                    "Connection '{}' references missing target node '{}'",
                    conn.id, conn.target
                ),
                None,
            ));
        }
    }
}

fn check_incoming(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    let mut incoming: AHashMap<&str, usize> = AHashMap::new();
    for conn in flow.connections() {
        *incoming.entry(conn.target.as_str()).or_default() += 1;
    }
    for node in flow.nodes() {
        if !node.is_start() && incoming.get(node.id.as_str()).copied().unwrap_or(0) == 0 {
            issues.push(ValidationIssue::error(
                format!("Node '{}' has no incoming connection", node.id),
                Some(node.id.clone()),
            ));
        }
    }
}

fn check_outgoing(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    for node in flow.nodes() {
        if !node.is_terminal() && flow.connections_from(&node.id).next().is_none() {
            issues.push(ValidationIssue::error(
                format!("Node '{}' has no outgoing connection", node.id),
                Some(node.id.clone()),
            ));
        }
    }
}

fn check_reachability(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    // Without a start node there is nothing to traverse from; the start
    // check already reported it.
    let Some(start) = flow.start_node() else {
        return;
    };
    let visited = reachable_from(flow, &start.id);
    for node in flow.nodes() {
        if !visited.contains(node.id.as_str()) {
            issues.push(ValidationIssue::error(
                format!("Node '{}' is unreachable from the start node", node.id),
                Some(node.id.clone()),
            ));
        }
    }
}

fn check_soft_warnings(flow: &FlowDefinition, issues: &mut Vec<ValidationIssue>) {
    for node in flow.nodes() {
        match &node.kind {
            NodeKind::Date { .. } => issues.push(ValidationIssue::warning(
                format!(
                    "Node '{}' is a date step, which is not supported at execution time",
                    node.id
                ),
                Some(node.id.clone()),
            )),
            NodeKind::Form { fields, .. } if fields.is_empty() => {
                issues.push(ValidationIssue::warning(
                    format!("Form node '{}' has no fields and will collect nothing", node.id),
                    Some(node.id.clone()),
                ));
            }
            _ => {}
        }
    }
}

/// Breadth-first visited set over connections, starting at `start_id`.
/// Connections with a missing target are not traversed; the endpoint check
/// reports those separately.
pub fn reachable_from(flow: &FlowDefinition, start_id: &str) -> AHashSet<String> {
    let mut visited = AHashSet::new();
    let mut queue = VecDeque::new();
    if flow.contains_node(start_id) {
        visited.insert(start_id.to_string());
        queue.push_back(start_id.to_string());
    }
    while let Some(id) = queue.pop_front() {
        for conn in flow.connections_from(&id) {
            if flow.contains_node(&conn.target) && visited.insert(conn.target.clone()) {
                queue.push_back(conn.target.clone());
            }
        }
    }
    visited
}
