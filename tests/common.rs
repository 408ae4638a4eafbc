//! Common test utilities for building flow definitions and adapters.
use ahash::AHashMap;
use keiro::prelude::*;

#[allow(dead_code)]
pub fn node_start(id: &str) -> Node {
    Node {
        id: id.to_string(),
        question: String::new(),
        kind: NodeKind::Start,
    }
}

#[allow(dead_code)]
pub fn node_end(id: &str) -> Node {
    Node {
        id: id.to_string(),
        question: String::new(),
        kind: NodeKind::End {
            thank_you_title: None,
            thank_you_message: None,
        },
    }
}

#[allow(dead_code)]
pub fn node_success(id: &str) -> Node {
    Node {
        id: id.to_string(),
        question: String::new(),
        kind: NodeKind::Success {
            thank_you_title: None,
            thank_you_message: None,
        },
    }
}

#[allow(dead_code)]
pub fn node_yes_no(id: &str, question: &str) -> Node {
    Node {
        id: id.to_string(),
        question: question.to_string(),
        kind: NodeKind::YesNo {
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
        },
    }
}

#[allow(dead_code)]
pub fn node_text(id: &str, question: &str) -> Node {
    Node {
        id: id.to_string(),
        question: question.to_string(),
        kind: NodeKind::Text {
            placeholder: None,
            default_value: None,
            field_name: None,
            required: false,
        },
    }
}

#[allow(dead_code)]
pub fn node_date(id: &str, question: &str) -> Node {
    Node {
        id: id.to_string(),
        question: question.to_string(),
        kind: NodeKind::Date {
            default_value: None,
            field_name: None,
            required: false,
        },
    }
}

#[allow(dead_code)]
pub fn node_form(id: &str, question: &str, fields: Vec<FormField>) -> Node {
    Node {
        id: id.to_string(),
        question: question.to_string(),
        kind: NodeKind::Form {
            form_title: None,
            form_description: None,
            fields,
        },
    }
}

#[allow(dead_code)]
pub fn node_choice(id: &str, question: &str, labels: &[&str]) -> Node {
    Node {
        id: id.to_string(),
        question: question.to_string(),
        kind: NodeKind::MultipleChoice {
            options: labels
                .iter()
                .enumerate()
                .map(|(i, label)| ChoiceOption {
                    id: format!("opt-{}", i),
                    label: label.to_string(),
                })
                .collect(),
        },
    }
}

#[allow(dead_code)]
pub fn conn(id: &str, source: &str, target: &str, condition: Condition) -> Connection {
    Connection {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        condition,
        label: None,
    }
}

/// Creates the canonical intake fixture:
///
/// start -> Q1 yes-no "Have you filed before?" (yes -> E1, no -> Q2)
///       -> Q2 text "Describe your situation" (any -> E1) -> end E1
#[allow(dead_code)]
pub fn create_intake_flow() -> FlowDefinition {
    FlowDefinition::new(
        "intake",
        "Intake",
        None,
        vec![
            node_start("s"),
            node_yes_no("q1", "Have you filed before?"),
            node_text("q2", "Describe your situation"),
            node_end("e1"),
        ],
        vec![
            conn("c0", "s", "q1", Condition::Any),
            conn("c1", "q1", "e1", Condition::Yes),
            conn("c2", "q1", "q2", Condition::No),
            conn("c3", "q2", "e1", Condition::Any),
        ],
    )
}

/// A flow whose multiple-choice node defines three options but connects
/// only the first two.
#[allow(dead_code)]
pub fn create_branching_flow() -> FlowDefinition {
    FlowDefinition::new(
        "matter-type",
        "Matter type",
        None,
        vec![
            node_start("s"),
            node_choice("pick", "What is this about?", &["Employment", "Housing", "Other"]),
            node_text("emp", "Who is your employer?"),
            node_text("hou", "What is the property address?"),
            node_end("e1"),
        ],
        vec![
            conn("c0", "s", "pick", Condition::Any),
            conn("c1", "pick", "emp", Condition::Option("Employment".to_string())),
            conn("c2", "pick", "hou", Condition::Option("Housing".to_string())),
            conn("c3", "emp", "e1", Condition::Any),
            conn("c4", "hou", "e1", Condition::Any),
        ],
    )
}

/// A document whose first block is a stale preview export; the second,
/// complete block must win.
#[allow(dead_code)]
pub const TWO_BLOCK_DOCUMENT: &str = r#"
Intake flow for tenancy disputes.

```json
{"name": "Preview", "nodes": [], "connections": []}
```

Some editor notes in between.

```json
{
  "name": "Tenancy intake",
  "description": "Initial screening for tenancy matters",
  "nodes": [
    {"id": "s", "type": "start"},
    {"id": "q1", "type": "yes-no", "question": "Have you filed before?", "yesLabel": "Yes", "noLabel": "No"},
    {"id": "q2", "type": "text", "question": "Describe your situation", "placeholder": "A few sentences"},
    {"id": "e1", "type": "end", "thankYouTitle": "Thank you"}
  ],
  "connections": [
    {"id": "c0", "sourceNodeId": "s", "targetNodeId": "q1", "condition": "any"},
    {"id": "c1", "sourceNodeId": "q1", "targetNodeId": "e1", "condition": "yes"},
    {"id": "c2", "sourceNodeId": "q1", "targetNodeId": "q2", "condition": "no"},
    {"id": "c3", "sourceNodeId": "q2", "targetNodeId": "e1", "condition": "any"}
  ]
}
```
"#;

/// In-memory persistence adapter recording every call.
#[allow(dead_code)]
pub struct MemoryAdapter {
    pub drafts: AHashMap<String, DraftRecord>,
    pub submissions: Vec<(String, Vec<ResponseEntry>)>,
    next_id: u32,
}

#[allow(dead_code)]
impl MemoryAdapter {
    pub fn new() -> Self {
        Self {
            drafts: AHashMap::new(),
            submissions: Vec::new(),
            next_id: 0,
        }
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn save_draft(&mut self, record: &DraftRecord) -> Result<DraftHandle, PersistError> {
        self.next_id += 1;
        let handle = format!("draft-{}", self.next_id);
        self.drafts.insert(handle.clone(), record.clone());
        Ok(DraftHandle(handle))
    }

    fn finalize_submission(
        &mut self,
        flow_id: &str,
        responses: &[ResponseEntry],
    ) -> Result<SubmissionId, PersistError> {
        self.submissions.push((flow_id.to_string(), responses.to_vec()));
        Ok(SubmissionId(format!("submission-{}", self.submissions.len())))
    }

    fn load_draft(&mut self, handle: &DraftHandle) -> Result<DraftRecord, PersistError> {
        self.drafts
            .get(&handle.0)
            .cloned()
            .ok_or_else(|| PersistError::DraftNotFound(handle.0.clone()))
    }
}
