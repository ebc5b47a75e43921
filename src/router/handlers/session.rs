//! Session assignment, session metadata and selector handlers

use tracing::debug;

use crate::error::GraphResult;
use crate::router::events::EventArgs;
use crate::types::SessionSelector;

use super::{Effects, EventHandler, RouterContext};

/// `set_session_id(node_id, session_id)`
pub struct SetSessionIdHandler;

impl EventHandler for SetSessionIdHandler {
    fn event(&self) -> &'static str {
        "set_session_id"
    }

    fn handle(&self, ctx: &RouterContext, args: EventArgs) -> GraphResult<Effects> {
        args.require(2)?;
        let node_id = args.string(0, "node_id")?;
        let session_id = args.optional_string(1, "session_id")?;

        let outcome = ctx.store.set_session_id(&node_id, session_id)?;
        debug!(node_id = %node_id, ?outcome, "set_session_id");
        Ok(if outcome.is_applied() {
            Effects::changed()
        } else {
            Effects::none()
        })
    }
}

/// `set_session_info(session_id, info)` merges a whole record
pub struct SetSessionInfoHandler;

impl EventHandler for SetSessionInfoHandler {
    fn event(&self) -> &'static str {
        "set_session_info"
    }

    fn handle(&self, ctx: &RouterContext, mut args: EventArgs) -> GraphResult<Effects> {
        args.require(2)?;
        let session_id = args.string(0, "session_id")?;
        let info = args.record(1, "info")?;
        ctx.sessions.set_info(&session_id, info)?;
        Ok(Effects::changed())
    }
}

/// `set_session_info_key(session_id, key, value)`
pub struct SetSessionInfoKeyHandler;

impl EventHandler for SetSessionInfoKeyHandler {
    fn event(&self) -> &'static str {
        "set_session_info_key"
    }

    fn handle(&self, ctx: &RouterContext, mut args: EventArgs) -> GraphResult<Effects> {
        args.require(3)?;
        let session_id = args.string(0, "session_id")?;
        let key = args.string(1, "key")?;
        let value = args.take(2);
        ctx.sessions.set_key(&session_id, &key, value)?;
        Ok(Effects::changed())
    }
}

/// `set_current_session(session_id)`; `null` unsets, `"all_sessions"` widens
pub struct SetCurrentSessionHandler;

impl EventHandler for SetCurrentSessionHandler {
    fn event(&self) -> &'static str {
        "set_current_session"
    }

    fn handle(&self, ctx: &RouterContext, args: EventArgs) -> GraphResult<Effects> {
        args.require(1)?;
        let selector = args.optional_string(0, "session_id")?;
        ctx.store
            .set_current_session(SessionSelector::from_wire(selector.as_deref()));
        Ok(Effects::relayout_and_fit())
    }
}
