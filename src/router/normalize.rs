//! Normalization of incoming context payloads
//!
//! The agent sends loosely-typed objects. Each field is decoded on its own;
//! a field that is missing, `null`, or undecodable becomes "no change" so a
//! partial update can never clobber good data.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{ContextPatch, Message, NodeState, Transition};

fn present(map: &Map<String, Value>, key: &str) -> Option<Value> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    }
}

fn decoded<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let value = present(map, key)?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            debug!(field = key, error = %e, "dropping undecodable field");
            None
        }
    }
}

/// Turn a raw `data` payload into a [`ContextPatch`]
pub fn normalize_context(payload: &Value) -> ContextPatch {
    let map = match payload.as_object() {
        Some(map) => map,
        None => {
            if !payload.is_null() {
                debug!("context payload is not an object, ignoring");
            }
            return ContextPatch::default();
        }
    };

    ContextPatch {
        messages: decoded::<Vec<Message>>(map, "cur_messages"),
        observation: present(map, "observation"),
        transition: present(map, "transition").map(|t| Transition::from_value(&t)),
        auxiliary: present(map, "auxiliary"),
        lats_data: present(map, "lats_data"),
        state: decoded::<NodeState>(map, "state"),
    }
}
