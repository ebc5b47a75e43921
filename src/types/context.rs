//! Context payload carried by every node

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Author of a message in the agent's running conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    None,
    User,
    Assistant,
    System,
}

/// `null` on the wire means [`Role::None`]
fn deserialize_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
    Ok(Option::<Role>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single message in the context history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message")]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Role,
}

impl Message {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

/// Execution state of a node as reported by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    #[default]
    Normal,
    Running,
    Expanding,
    Evaluating,
    Rollout,
    Success,
    Reflecting,
}

/// The agent's decision at a node
///
/// Serialized as the agent's tagged object (`{"type": "AgentAction", ...}`)
/// or `null` for [`Transition::None`]. Deserialization never fails: an
/// unrecognized tag or missing member yields [`Transition::None`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Transition {
    Action { tool: String, tool_input: Value },
    Finish { return_values: Value },
    #[default]
    None,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum TaggedTransition {
    AgentAction {
        tool: String,
        #[serde(default)]
        tool_input: Value,
    },
    AgentFinish {
        #[serde(default)]
        return_values: Value,
    },
}

impl Transition {
    /// Narrow a loosely-typed transition value by its `type` tag
    pub fn from_value(value: &Value) -> Self {
        match TaggedTransition::deserialize(value) {
            Ok(TaggedTransition::AgentAction { tool, tool_input }) => {
                Transition::Action { tool, tool_input }
            }
            Ok(TaggedTransition::AgentFinish { return_values }) => {
                Transition::Finish { return_values }
            }
            Err(_) => Transition::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Transition::None)
    }
}

impl Serialize for Transition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Transition::Action { tool, tool_input } => Some(TaggedTransition::AgentAction {
                tool: tool.clone(),
                tool_input: tool_input.clone(),
            }),
            Transition::Finish { return_values } => Some(TaggedTransition::AgentFinish {
                return_values: return_values.clone(),
            }),
            Transition::None => None,
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Transition::from_value(&value))
    }
}

/// Data attached to a context node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextData {
    #[serde(rename = "cur_messages", default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub observation: Value,
    #[serde(default)]
    pub transition: Transition,
    #[serde(default)]
    pub auxiliary: Value,
    #[serde(default)]
    pub lats_data: Value,
    #[serde(default)]
    pub state: NodeState,
}

impl ContextData {
    /// Shallow-merge a patch; absent fields are left untouched
    pub fn apply(&mut self, patch: ContextPatch) {
        if let Some(messages) = patch.messages {
            self.messages = messages;
        }
        if let Some(observation) = patch.observation {
            self.observation = observation;
        }
        if let Some(transition) = patch.transition {
            self.transition = transition;
        }
        if let Some(auxiliary) = patch.auxiliary {
            self.auxiliary = auxiliary;
        }
        if let Some(lats_data) = patch.lats_data {
            self.lats_data = lats_data;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
    }
}

impl From<ContextPatch> for ContextData {
    fn from(patch: ContextPatch) -> Self {
        let mut data = ContextData::default();
        data.apply(patch);
        data
    }
}

/// Partial context update; `None` means "no change"
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextPatch {
    pub messages: Option<Vec<Message>>,
    pub observation: Option<Value>,
    pub transition: Option<Transition>,
    pub auxiliary: Option<Value>,
    pub lats_data: Option<Value>,
    pub state: Option<NodeState>,
}

impl ContextPatch {
    pub fn is_empty(&self) -> bool {
        self.messages.is_none()
            && self.observation.is_none()
            && self.transition.is_none()
            && self.auxiliary.is_none()
            && self.lats_data.is_none()
            && self.state.is_none()
    }

    pub fn with_observation(mut self, observation: Value) -> Self {
        self.observation = Some(observation);
        self
    }

    pub fn with_state(mut self, state: NodeState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transition_action_narrowing() {
        let t = Transition::from_value(&json!({
            "type": "AgentAction",
            "tool": "search",
            "tool_input": "eiffel tower",
            "log": "ignored"
        }));
        assert_eq!(
            t,
            Transition::Action {
                tool: "search".to_string(),
                tool_input: json!("eiffel tower"),
            }
        );
    }

    #[test]
    fn test_transition_unknown_tag_is_none() {
        assert!(Transition::from_value(&json!({"type": "AgentStep"})).is_none());
        assert!(Transition::from_value(&json!({"tool": "x"})).is_none());
        assert!(Transition::from_value(&json!({"type": "AgentAction"})).is_none());
        assert!(Transition::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_transition_serializes_tagged() {
        let t = Transition::Finish {
            return_values: json!({"output": "Paris"}),
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["type"], "AgentFinish");
        assert_eq!(v["return_values"]["output"], "Paris");
        assert_eq!(serde_json::to_value(Transition::None).unwrap(), Value::Null);
    }

    #[test]
    fn test_message_null_role() {
        let m: Message = serde_json::from_value(json!({"message": "hi", "role": null})).unwrap();
        assert_eq!(m.role, Role::None);
        let m: Message =
            serde_json::from_value(json!({"message": "hi", "role": "assistant"})).unwrap();
        assert_eq!(m.role, Role::Assistant);
    }

    #[test]
    fn test_apply_leaves_absent_fields() {
        let mut data = ContextData {
            observation: json!("old"),
            state: NodeState::Running,
            ..Default::default()
        };
        data.apply(ContextPatch::default().with_state(NodeState::Success));
        assert_eq!(data.observation, json!("old"));
        assert_eq!(data.state, NodeState::Success);
    }
}
