use super::definition::FlowDefinition;
use crate::error::FlowConversionError;

/// A trait for custom data models that can be converted into a keiro
/// `FlowDefinition`.
///
/// The parser covers the standard flow document format. Anything else (an
/// ORM row model, a builder API, a different wire schema) implements this
/// trait to hand the engine a canonical graph.
///
/// # Example
///
/// ```rust
/// use keiro::error::FlowConversionError;
/// use keiro::flow::{FlowDefinition, IntoFlow, Node, NodeKind};
///
/// struct MyStep {
///     id: String,
///     prompt: String,
/// }
///
/// struct MyQuestionnaire {
///     title: String,
///     steps: Vec<MyStep>,
/// }
///
/// impl IntoFlow for MyQuestionnaire {
///     fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|step| Node {
///                 id: step.id,
///                 question: step.prompt,
///                 kind: NodeKind::Text {
///                     placeholder: None,
///                     default_value: None,
///                     field_name: None,
///                     required: false,
///                 },
///             })
///             .collect();
///
///         // Connections for the chain would be built here as well.
///         Ok(FlowDefinition::new(
///             "my-questionnaire",
///             self.title,
///             None,
///             nodes,
///             vec![],
///         ))
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a flow definition.
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError>;
}
