//! Stateful traversal of a validated flow.
//!
//! A `Session` drives exactly one user through one flow. The flow itself
//! is shared read-only behind an `Arc`; all mutable traversal state lives
//! here. Operations are synchronous and never panic on bad input: every
//! transition failure comes back as a discriminated result, and a failed
//! `advance` leaves the session exactly as it was.

mod draft;

pub use draft::{DraftHandle, DraftRecord, PersistenceAdapter, ResponseEntry, SubmissionId};

use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{GraphError, SessionError};
use crate::flow::{Condition, Connection, FlowDefinition, Node, NodeKind};
use crate::validator::{self, Severity};

/// Lifecycle of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// The user's input for one `advance` step.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// No input; leaving the start node or acknowledging an info step.
    None,
    /// A yes/no token, an option label, or free text.
    Value(String),
    /// A positional multiple-choice pick, translated to the option label
    /// before branch matching.
    OptionIndex(usize),
}

/// One user's in-progress walk through a flow graph.
pub struct Session {
    flow: Arc<FlowDefinition>,
    status: SessionStatus,
    current: String,
    start_id: String,
    history: Vec<String>,
    answer_cache: AHashMap<String, String>,
    responses: Vec<ResponseEntry>,
    persist_in_flight: bool,
}

impl Session {
    /// Starts a fresh traversal. Refuses flows with unresolved validation
    /// errors.
    pub fn begin(flow: Arc<FlowDefinition>) -> Result<Self, SessionError> {
        let start_id = Self::gate(&flow)?;
        debug!(flow = %flow.id, "session started");
        Ok(Self {
            current: start_id.clone(),
            start_id,
            flow,
            status: SessionStatus::NotStarted,
            history: Vec::new(),
            answer_cache: AHashMap::new(),
            responses: Vec::new(),
            persist_in_flight: false,
        })
    }

    /// Resumes a traversal from a persisted draft.
    ///
    /// The answer cache is rebuilt by matching each persisted question
    /// against node question text. Two nodes sharing identical question
    /// text cannot be told apart here; the first match in document order
    /// wins.
    pub fn resume(flow: Arc<FlowDefinition>, record: &DraftRecord) -> Result<Self, SessionError> {
        let start_id = Self::gate(&flow)?;
        if !flow.contains_node(&record.current_node_id) {
            return Err(GraphError::BrokenLink {
                connection_id: "draft".to_string(),
                target_id: record.current_node_id.clone(),
            }
            .into());
        }

        let mut answer_cache = AHashMap::new();
        for entry in &record.responses {
            if let Some(node) = flow.nodes().iter().find(|n| n.question == entry.question) {
                answer_cache.insert(node.id.clone(), entry.answer.clone());
            }
        }
        debug!(
            flow = %flow.id,
            node = %record.current_node_id,
            recovered = answer_cache.len(),
            "session resumed from draft"
        );

        Ok(Self {
            current: record.current_node_id.clone(),
            start_id,
            flow,
            status: SessionStatus::InProgress,
            history: Vec::new(),
            answer_cache,
            responses: record.responses.clone(),
            persist_in_flight: false,
        })
    }

    /// The validation gate shared by `begin` and `resume`: a session over a
    /// flow with unresolved errors can never be constructed, so transitions
    /// need not re-check.
    fn gate(flow: &FlowDefinition) -> Result<String, SessionError> {
        let issues = validator::validate(flow);
        let error_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        if error_count > 0 {
            return Err(SessionError::FlowInvalid {
                flow_id: flow.id.clone(),
                error_count,
            });
        }
        flow.start_node()
            .map(|n| n.id.clone())
            .ok_or(SessionError::FlowInvalid {
                flow_id: flow.id.clone(),
                error_count: 1,
            })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn flow(&self) -> &FlowDefinition {
        &self.flow
    }

    pub fn current_node_id(&self) -> &str {
        &self.current
    }

    /// The step the user is currently on.
    pub fn current_node(&self) -> Option<&Node> {
        self.flow.node(&self.current)
    }

    /// The submission-in-progress log, in answer order.
    pub fn responses(&self) -> &[ResponseEntry] {
        &self.responses
    }

    /// Previously-visited node ids, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The last value chosen or entered at a node, if any.
    pub fn cached_answer(&self, node_id: &str) -> Option<&str> {
        self.answer_cache.get(node_id).map(String::as_str)
    }

    /// Takes one forward step.
    ///
    /// The branch is resolved before any mutation: when no connection
    /// matches or the target is missing, the session state is untouched.
    pub fn advance(&mut self, answer: Answer) -> Result<(), SessionError> {
        self.check_mutable()?;
        let node = self.require_current()?;
        if node.is_terminal() {
            return Err(SessionError::AtTerminal {
                node_id: node.id.clone(),
            });
        }

        let label = answer_label(node, &answer)?;
        let conn = resolve_connection(&self.flow, node, label.as_deref())?;
        if !self.flow.contains_node(&conn.target) {
            return Err(GraphError::BrokenLink {
                connection_id: conn.id.clone(),
                target_id: conn.target.clone(),
            }
            .into());
        }

        let leaving_start = node.is_start();
        let question = node.question.clone();
        let departed = node.id.clone();
        let target = conn.target.clone();

        // The transition is now guaranteed; mutate in one go. Start is an
        // entry gate, not a question, so it records no response.
        if !leaving_start {
            self.responses.push(ResponseEntry {
                question,
                answer: label.clone().unwrap_or_default(),
            });
        }
        if let Some(value) = label {
            self.answer_cache.insert(departed.clone(), value);
        }
        self.history.push(departed.clone());
        self.current = target;
        self.status = SessionStatus::InProgress;
        debug!(from = %departed, to = %self.current, "advanced");
        Ok(())
    }

    /// Steps back to the previously-visited node and returns the cached
    /// answer for it, so the caller can re-display the prior choice.
    ///
    /// The response log is not truncated; re-answering appends a fresh
    /// entry, and de-duplication is the submission layer's concern.
    pub fn back(&mut self) -> Result<Option<String>, SessionError> {
        self.check_mutable()?;
        let previous = self.history.pop().ok_or(SessionError::NothingToUndo)?;
        self.current = previous;
        Ok(self.answer_cache.get(&self.current).cloned())
    }

    /// Abandons all progress and returns to the start node.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.check_mutable()?;
        self.history.clear();
        self.answer_cache.clear();
        self.responses.clear();
        self.current = self.start_id.clone();
        self.status = SessionStatus::NotStarted;
        debug!(flow = %self.flow.id, "session restarted");
        Ok(())
    }

    /// Snapshots the traversal for persistence and locks the session until
    /// `complete_persist` is called. Intended for callers that drive the
    /// adapter asynchronously; `save_draft` wraps the pair for the
    /// synchronous case.
    pub fn begin_persist(&mut self) -> Result<DraftRecord, SessionError> {
        self.check_mutable()?;
        self.persist_in_flight = true;
        Ok(self.draft_record())
    }

    /// Unlocks the session after a persistence call has settled.
    pub fn complete_persist(&mut self) {
        self.persist_in_flight = false;
    }

    /// Saves the traversal as a resumable draft.
    pub fn save_draft(
        &mut self,
        adapter: &mut dyn PersistenceAdapter,
    ) -> Result<DraftHandle, SessionError> {
        let record = self.begin_persist()?;
        let result = adapter.save_draft(&record);
        self.complete_persist();
        Ok(result?)
    }

    /// Seals the responses and hands them to the adapter as a completed
    /// submission. Only callable at a terminal node; afterwards every
    /// mutating call returns `Finalized`.
    pub fn finalize(
        &mut self,
        adapter: &mut dyn PersistenceAdapter,
    ) -> Result<SubmissionId, SessionError> {
        self.check_mutable()?;
        let node = self.require_current()?;
        if !node.is_terminal() {
            return Err(SessionError::NotTerminal {
                node_id: node.id.clone(),
            });
        }

        self.persist_in_flight = true;
        let result = adapter.finalize_submission(&self.flow.id, &self.responses);
        self.persist_in_flight = false;

        let submission = result?;
        self.status = SessionStatus::Completed;
        debug!(
            flow = %self.flow.id,
            submission = %submission.0,
            responses = self.responses.len(),
            "session finalized"
        );
        Ok(submission)
    }

    /// Shared guard for every mutating operation.
    fn check_mutable(&self) -> Result<(), SessionError> {
        if self.persist_in_flight {
            return Err(SessionError::PersistBusy);
        }
        if self.status == SessionStatus::Completed {
            return Err(SessionError::Finalized);
        }
        Ok(())
    }

    fn require_current(&self) -> Result<&Node, SessionError> {
        self.flow.node(&self.current).ok_or_else(|| {
            GraphError::BrokenLink {
                connection_id: "current".to_string(),
                target_id: self.current.clone(),
            }
            .into()
        })
    }

    fn draft_record(&self) -> DraftRecord {
        DraftRecord {
            flow_id: self.flow.id.clone(),
            responses: self.responses.clone(),
            current_node_id: self.current.clone(),
        }
    }
}

/// Normalizes the caller's input into the label used for branch matching.
fn answer_label(node: &Node, answer: &Answer) -> Result<Option<String>, SessionError> {
    match (&node.kind, answer) {
        (NodeKind::MultipleChoice { options }, Answer::OptionIndex(index)) => {
            match options.get(*index) {
                Some(option) => Ok(Some(option.label.clone())),
                None => Err(GraphError::UnresolvedBranch {
                    node_id: node.id.clone(),
                    answer: format!("#{index}"),
                }
                .into()),
            }
        }
        (_, Answer::OptionIndex(index)) => Err(GraphError::UnresolvedBranch {
            node_id: node.id.clone(),
            answer: format!("#{index}"),
        }
        .into()),
        (_, Answer::Value(value)) => Ok(Some(value.clone())),
        (_, Answer::None) => Ok(None),
    }
}

/// Finds the first outgoing connection whose condition matches.
///
/// With no answer label only unconditional edges are eligible. More than
/// one matching edge is accepted; the first in document order wins.
fn resolve_connection<'a>(
    flow: &'a FlowDefinition,
    node: &Node,
    label: Option<&str>,
) -> Result<&'a Connection, SessionError> {
    flow.connections_from(&node.id)
        .find(|conn| match label {
            Some(value) => conn.condition.matches(value),
            None => conn.condition == Condition::Any,
        })
        .ok_or_else(|| {
            GraphError::UnresolvedBranch {
                node_id: node.id.clone(),
                answer: label.unwrap_or_default().to_string(),
            }
            .into()
        })
}
