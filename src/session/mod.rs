//! Session Registry - per-session and global metadata
//!
//! Metadata arrives piecemeal from the agent. Every setter is a shallow
//! merge; records are only dropped wholesale by [`SessionRegistry::reset`].
//! Sessions are referenced by id only, so a node whose session has no record
//! simply has no metadata.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::GraphResult;
use crate::types::{validate_session_id, InfoRecord};

/// Key marking a session as finished; completed sessions are hidden from
/// the "all sessions" view
pub const COMPLETED_KEY: &str = "completed";

#[derive(Debug, Default)]
struct Registry {
    sessions: BTreeMap<String, InfoRecord>,
    global: InfoRecord,
}

/// Owner of session and global metadata records
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: RwLock<Registry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge `partial` into the session record, creating it if absent
    pub fn set_info(&self, session_id: &str, partial: InfoRecord) -> GraphResult<()> {
        validate_session_id(session_id)?;
        let mut inner = self.inner.write();
        let record = inner.sessions.entry(session_id.to_string()).or_default();
        for (key, value) in partial {
            record.insert(key, value);
        }
        Ok(())
    }

    /// Set a single key of the session record, creating the record if absent
    pub fn set_key(&self, session_id: &str, key: &str, value: Value) -> GraphResult<()> {
        validate_session_id(session_id)?;
        let mut inner = self.inner.write();
        inner
            .sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    pub fn get(&self, session_id: &str) -> Option<InfoRecord> {
        self.inner.read().sessions.get(session_id).cloned()
    }

    pub fn all(&self) -> BTreeMap<String, InfoRecord> {
        self.inner.read().sessions.clone()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.inner.read().sessions.keys().cloned().collect()
    }

    /// True when the session's record carries `completed: true`
    pub fn is_completed(&self, session_id: &str) -> bool {
        self.inner
            .read()
            .sessions
            .get(session_id)
            .and_then(|record| record.get(COMPLETED_KEY))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Replace the global record wholesale
    pub fn set_global_info(&self, info: InfoRecord) {
        self.inner.write().global = info;
    }

    /// Set a single key of the global record
    pub fn set_global_key(&self, key: &str, value: Value) {
        self.inner.write().global.insert(key.to_string(), value);
    }

    pub fn global_info(&self) -> InfoRecord {
        self.inner.read().global.clone()
    }

    /// Drop every session record; the global record is kept
    pub fn reset(&self) {
        self.inner.write().sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use serde_json::json;

    fn record(value: Value) -> InfoRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_set_info_merges() {
        let registry = SessionRegistry::new();
        registry
            .set_info("s1", record(json!({"image": "a.png", "step": 1})))
            .unwrap();
        registry.set_info("s1", record(json!({"step": 2}))).unwrap();

        let info = registry.get("s1").unwrap();
        assert_eq!(info["image"], "a.png");
        assert_eq!(info["step"], 2);
    }

    #[test]
    fn test_set_key_creates_record() {
        let registry = SessionRegistry::new();
        registry.set_key("s1", "completed", json!(true)).unwrap();
        assert!(registry.is_completed("s1"));
        assert!(!registry.is_completed("s2"));
        assert_eq!(registry.session_ids(), vec!["s1".to_string()]);
    }

    #[test]
    fn test_completed_requires_true() {
        let registry = SessionRegistry::new();
        registry.set_key("s1", "completed", json!("yes")).unwrap();
        assert!(!registry.is_completed("s1"));
    }

    #[test]
    fn test_reserved_session_rejected() {
        let registry = SessionRegistry::new();
        let err = registry
            .set_key("all_sessions", "k", json!(1))
            .unwrap_err();
        assert!(matches!(err, GraphError::ReservedSessionId(_)));

        let err = registry
            .set_info("all_sessions", record(json!({"completed": true})))
            .unwrap_err();
        assert!(matches!(err, GraphError::ReservedSessionId(ref id) if id == "all_sessions"));
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_global_info() {
        let registry = SessionRegistry::new();
        registry.set_global_key("task", json!("Evaluating"));
        registry.set_global_key("progress", json!("1/10"));
        assert_eq!(registry.global_info().len(), 2);

        registry.set_global_info(record(json!({"task": "Idle"})));
        let global = registry.global_info();
        assert_eq!(global.len(), 1);
        assert_eq!(global["task"], "Idle");
    }

    #[test]
    fn test_reset_keeps_global() {
        let registry = SessionRegistry::new();
        registry.set_key("s1", "k", json!(1)).unwrap();
        registry.set_global_key("task", json!("x"));
        registry.reset();
        assert!(registry.all().is_empty());
        assert_eq!(registry.global_info().len(), 1);
    }
}
