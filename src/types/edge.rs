//! Parent-child edge type

use serde::{Deserialize, Serialize};

/// Directed edge from a parent node to its child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Create the edge between `source` and `target` with its deterministic id
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Self::id_for(&source, &target),
            source,
            target,
        }
    }

    /// Deterministic edge id, so repeated creation attempts collide
    pub fn id_for(source: &str, target: &str) -> String {
        format!("e{}-{}", source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_is_deterministic() {
        let edge = Edge::between("r1", "c1");
        assert_eq!(edge.id, "er1-c1");
        assert_eq!(edge, Edge::between("r1".to_string(), "c1".to_string()));
    }
}
