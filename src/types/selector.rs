//! Active session selector

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GraphError, GraphResult};

/// Wire value of the "show every session" selector
pub const ALL_SESSIONS: &str = "all_sessions";

/// Which session the presentation layer is looking at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionSelector {
    #[default]
    Unset,
    AllSessions,
    Session(String),
}

impl SessionSelector {
    /// Decode the wire form: `null`, `"all_sessions"`, or a concrete id
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            None => SessionSelector::Unset,
            Some(ALL_SESSIONS) => SessionSelector::AllSessions,
            Some(id) => SessionSelector::Session(id.to_string()),
        }
    }

    pub fn as_wire(&self) -> Option<&str> {
        match self {
            SessionSelector::Unset => None,
            SessionSelector::AllSessions => Some(ALL_SESSIONS),
            SessionSelector::Session(id) => Some(id),
        }
    }

    /// True for `Unset` and `AllSessions`
    pub fn is_wide(&self) -> bool {
        !matches!(self, SessionSelector::Session(_))
    }
}

impl Serialize for SessionSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SessionSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(SessionSelector::from_wire(value.as_deref()))
    }
}

/// Reject real session ids that would collide with the selector sentinel
pub fn validate_session_id(session_id: &str) -> GraphResult<()> {
    if session_id == ALL_SESSIONS {
        return Err(GraphError::ReservedSessionId(session_id.to_string()));
    }
    Ok(())
}
