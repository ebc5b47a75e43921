//! Node type for the context tree

use serde::{Deserialize, Serialize};

use super::ContextData;

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Where nodes sit until the first layout pass places them
    pub const INITIAL: Position = Position { x: 100.0, y: 100.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One step of the agent's execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: ContextData,
}

impl Node {
    /// Create a detached node at the initial position
    pub fn new(id: impl Into<String>, data: ContextData) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            session_id: None,
            is_root: false,
            position: Position::INITIAL,
            data,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_serializes_camel_case() {
        let node = Node::new("r1", ContextData::default()).with_session("s1");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["isRoot"], false);
        assert_eq!(json["position"]["x"], 100.0);
        assert!(json["parentId"].is_null());
    }
}
