//! Inbound event frames and positional argument access

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GraphError, GraphResult};
use crate::types::InfoRecord;

/// One inbound event: a name plus positional arguments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    pub event: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl EventFrame {
    pub fn new(event: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            event: event.into(),
            args,
        }
    }

    /// Parse a text frame
    ///
    /// Accepts `{"event": "...", "args": [...]}` and the positional array
    /// form `["event", arg0, arg1, ...]`.
    pub fn parse(text: &str) -> GraphResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Array(mut items) => {
                if items.is_empty() {
                    return Err(GraphError::InvalidFrame("empty array frame".to_string()));
                }
                let args = items.split_off(1);
                match items.pop() {
                    Some(Value::String(event)) => Ok(Self { event, args }),
                    _ => Err(GraphError::InvalidFrame(
                        "first element must be the event name".to_string(),
                    )),
                }
            }
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Err(GraphError::InvalidFrame(
                "frame must be an object or an array".to_string(),
            )),
        }
    }
}

/// Positional arguments of an event, decoded on demand
#[derive(Debug)]
pub struct EventArgs {
    event: &'static str,
    args: Vec<Value>,
}

impl EventArgs {
    pub fn new(event: &'static str, args: Vec<Value>) -> Self {
        Self { event, args }
    }

    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Fail unless at least `expected` arguments are present
    pub fn require(&self, expected: usize) -> GraphResult<()> {
        if self.args.len() < expected {
            return Err(GraphError::Arity {
                event: self.event,
                expected,
                got: self.args.len(),
            });
        }
        Ok(())
    }

    fn invalid(&self, index: usize, name: &'static str, expected: &'static str) -> GraphError {
        GraphError::InvalidArgument {
            event: self.event,
            index,
            name,
            expected,
        }
    }

    /// Raw argument, `Null` if missing
    pub fn value(&self, index: usize) -> &Value {
        self.args.get(index).unwrap_or(&Value::Null)
    }

    /// Take ownership of an argument, leaving `Null`
    pub fn take(&mut self, index: usize) -> Value {
        self.args
            .get_mut(index)
            .map(Value::take)
            .unwrap_or(Value::Null)
    }

    /// Identifier argument; numbers are accepted and stringified
    pub fn string(&self, index: usize, name: &'static str) -> GraphResult<String> {
        match self.value(index) {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(self.invalid(index, name, "a string")),
        }
    }

    /// Like [`EventArgs::string`] but `null` decodes to `None`
    pub fn optional_string(&self, index: usize, name: &'static str) -> GraphResult<Option<String>> {
        match self.value(index) {
            Value::Null => Ok(None),
            _ => self.string(index, name).map(Some),
        }
    }

    /// Object argument; `null` decodes to an empty record
    pub fn record(&mut self, index: usize, name: &'static str) -> GraphResult<InfoRecord> {
        match self.take(index) {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(InfoRecord::new()),
            other => {
                // put it back so the caller can still inspect it
                if let Some(slot) = self.args.get_mut(index) {
                    *slot = other;
                }
                Err(self.invalid(index, name, "an object"))
            }
        }
    }
}
