//! Notification-only events

use crate::error::GraphResult;
use crate::router::events::EventArgs;

use super::{Effects, EventHandler, RouterContext};

/// `url_processed(payload?)` acknowledges a `from_social` import
pub struct UrlProcessedHandler;

impl EventHandler for UrlProcessedHandler {
    fn event(&self) -> &'static str {
        "url_processed"
    }

    fn handle(&self, _ctx: &RouterContext, mut args: EventArgs) -> GraphResult<Effects> {
        Ok(Effects {
            url_processed: Some(args.take(0)),
            ..Effects::none()
        })
    }
}
