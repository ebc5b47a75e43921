//! Global metadata handlers

use crate::error::GraphResult;
use crate::router::events::EventArgs;

use super::{Effects, EventHandler, RouterContext};

/// `global_info(info)` replaces the global record wholesale
pub struct GlobalInfoHandler;

impl EventHandler for GlobalInfoHandler {
    fn event(&self) -> &'static str {
        "global_info"
    }

    fn handle(&self, ctx: &RouterContext, mut args: EventArgs) -> GraphResult<Effects> {
        args.require(1)?;
        let info = args.record(0, "info")?;
        ctx.sessions.set_global_info(info);
        Ok(Effects::changed())
    }
}

/// `global_info_set(key, value)`
pub struct GlobalInfoSetHandler;

impl EventHandler for GlobalInfoSetHandler {
    fn event(&self) -> &'static str {
        "global_info_set"
    }

    fn handle(&self, ctx: &RouterContext, mut args: EventArgs) -> GraphResult<Effects> {
        args.require(2)?;
        let key = args.string(0, "key")?;
        let value = args.take(1);
        ctx.sessions.set_global_key(&key, value);
        Ok(Effects::changed())
    }
}
