//! Wire-format structs for the embedded flow block.
//!
//! These mirror the JSON the visual editor exports. Field names accept both
//! the document's camelCase and snake_case spellings.

use ahash::AHashSet;
use serde::Deserialize;

use crate::error::FlowConversionError;
use crate::flow::{
    ChoiceOption, Condition, Connection, FlowDefinition, FormField, IntoFlow, Node, NodeKind,
};

#[derive(Debug, Deserialize)]
pub(crate) struct RawFlow {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub nodes: Vec<RawNode>,
    pub connections: Vec<RawConnection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, alias = "yesLabel")]
    pub yes_label: Option<String>,
    #[serde(default, alias = "noLabel")]
    pub no_label: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<RawOption>>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, alias = "defaultValue")]
    pub default_value: Option<String>,
    #[serde(default, alias = "fieldName")]
    pub field_name: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, alias = "formTitle")]
    pub form_title: Option<String>,
    #[serde(default, alias = "formDescription")]
    pub form_description: Option<String>,
    #[serde(default, alias = "formFields")]
    pub form_fields: Option<Vec<RawFormField>>,
    #[serde(default, alias = "thankYouTitle")]
    pub thank_you_title: Option<String>,
    #[serde(default, alias = "thankYouMessage")]
    pub thank_you_message: Option<String>,
    #[serde(default, alias = "infoMessage")]
    pub info_message: Option<String>,
    #[serde(default, alias = "subflowId")]
    pub subflow_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default, alias = "defaultValue")]
    pub default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawConnection {
    pub id: String,
    #[serde(alias = "sourceNodeId")]
    pub source_node_id: String,
    #[serde(alias = "targetNodeId")]
    pub target_node_id: String,
    pub condition: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl IntoFlow for RawFlow {
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
        let id = slugify(&self.name);

        let mut seen = AHashSet::with_capacity(self.nodes.len());
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for raw in self.nodes {
            if !seen.insert(raw.id.clone()) {
                return Err(FlowConversionError::Invalid(format!(
                    "duplicate node id '{}'",
                    raw.id
                )));
            }
            nodes.push(raw.into_node());
        }

        let connections = self
            .connections
            .into_iter()
            .map(RawConnection::into_connection)
            .collect();

        Ok(FlowDefinition::new(
            id,
            self.name,
            self.description,
            nodes,
            connections,
        ))
    }
}

impl RawNode {
    fn into_node(self) -> Node {
        let kind = match self.node_type.as_str() {
            "start" => NodeKind::Start,
            "end" => NodeKind::End {
                thank_you_title: self.thank_you_title,
                thank_you_message: self.thank_you_message,
            },
            "success" => NodeKind::Success {
                thank_you_title: self.thank_you_title,
                thank_you_message: self.thank_you_message,
            },
            "yes-no" => NodeKind::YesNo {
                yes_label: self.yes_label.unwrap_or_else(|| "Yes".to_string()),
                no_label: self.no_label.unwrap_or_else(|| "No".to_string()),
            },
            "multiple-choice" => NodeKind::MultipleChoice {
                options: self
                    .options
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| ChoiceOption {
                        id: o.id,
                        label: o.label,
                    })
                    .collect(),
            },
            "text" => NodeKind::Text {
                placeholder: self.placeholder,
                default_value: self.default_value,
                field_name: self.field_name,
                required: self.required.unwrap_or(false),
            },
            "date" => NodeKind::Date {
                default_value: self.default_value,
                field_name: self.field_name,
                required: self.required.unwrap_or(false),
            },
            "form" => NodeKind::Form {
                form_title: self.form_title,
                form_description: self.form_description,
                fields: self
                    .form_fields
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawFormField::into_field)
                    .collect(),
            },
            "info" => NodeKind::Info {
                info_message: self.info_message,
            },
            "subflow" => NodeKind::Subflow {
                subflow_id: self.subflow_id.unwrap_or_default(),
            },
            other => NodeKind::Unknown {
                type_name: other.to_string(),
            },
        };

        Node {
            id: self.id,
            question: self.question.unwrap_or_default(),
            kind,
        }
    }
}

impl RawFormField {
    fn into_field(self) -> FormField {
        FormField {
            id: self.id,
            field_type: self.field_type,
            label: self.label.unwrap_or_default(),
            placeholder: self.placeholder,
            required: self.required.unwrap_or(false),
            options: self.options,
            default_value: self.default_value,
        }
    }
}

impl RawConnection {
    fn into_connection(self) -> Connection {
        Connection {
            id: self.id,
            source: self.source_node_id,
            target: self.target_node_id,
            condition: Condition::from(self.condition.as_str()),
            label: self.label,
        }
    }
}

/// Derives a stable flow id from the flow name. The document format carries
/// no id of its own.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c == ' ' || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "flow".to_string()
    } else {
        slug
    }
}
