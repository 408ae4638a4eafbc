/// A selectable option on a multiple-choice step.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
}

/// A single input inside a form step.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub id: String,
    pub field_type: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub options: Option<Vec<String>>,
    pub default_value: Option<String>,
}

/// The type-specific payload of a flow step.
///
/// Modeled as a sum type so the engine never probes optional fields: a node
/// either is a `YesNo` step carrying both labels, or it is not one at all.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Start,
    End {
        thank_you_title: Option<String>,
        thank_you_message: Option<String>,
    },
    Success {
        thank_you_title: Option<String>,
        thank_you_message: Option<String>,
    },
    YesNo {
        yes_label: String,
        no_label: String,
    },
    MultipleChoice {
        options: Vec<ChoiceOption>,
    },
    Text {
        placeholder: Option<String>,
        default_value: Option<String>,
        field_name: Option<String>,
        required: bool,
    },
    Date {
        default_value: Option<String>,
        field_name: Option<String>,
        required: bool,
    },
    Form {
        form_title: Option<String>,
        form_description: Option<String>,
        fields: Vec<FormField>,
    },
    Info {
        info_message: Option<String>,
    },
    Subflow {
        subflow_id: String,
    },
    /// A type string this engine does not recognize. Accepted by the parser
    /// so the validator can report it as a removable editing error.
    Unknown { type_name: String },
}

impl NodeKind {
    /// The document-level type string for this kind.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End { .. } => "end",
            NodeKind::Success { .. } => "success",
            NodeKind::YesNo { .. } => "yes-no",
            NodeKind::MultipleChoice { .. } => "multiple-choice",
            NodeKind::Text { .. } => "text",
            NodeKind::Date { .. } => "date",
            NodeKind::Form { .. } => "form",
            NodeKind::Info { .. } => "info",
            NodeKind::Subflow { .. } => "subflow",
            NodeKind::Unknown { type_name } => type_name,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, NodeKind::Start)
    }

    /// Terminal steps end traversal and carry no outgoing connections.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::End { .. } | NodeKind::Success { .. })
    }
}
