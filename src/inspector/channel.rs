//! Relay from an inspector session to a host callback.

use std::cell::Cell;

use tracing::trace;

use super::Channel;
use crate::context::{Callback, Context, WeakContext};
use crate::text::{ScriptText, StringBuffer, StringView};

/// Delivers every outbound protocol message to the host callback.
///
/// The context is held weakly because it owns the session that owns this
/// channel. Once closed it drops every message, including the rest of a
/// dispatch that was running when it closed.
pub(crate) struct Frontend {
    context: WeakContext,
    callback: Callback,
    closed: Cell<bool>,
}

impl Frontend {
    pub(crate) fn new(context: &Context, callback: Callback) -> Self {
        Self {
            context: context.downgrade(),
            callback,
            closed: Cell::new(false),
        }
    }

    /// Stop delivering messages.
    pub(crate) fn close(&self) {
        self.closed.set(true);
    }

    fn send(&self, message: StringView<'_>) {
        if self.closed.get() {
            trace!(context = %self.context.id(), "channel closed, dropping protocol message");
            return;
        }

        let Some(context) = self.context.upgrade() else {
            trace!(context = %self.context.id(), "context gone, dropping protocol message");
            return;
        };

        let _allow = context.allow_script_execution();
        let text = ScriptText::from_view(message);

        // Callback errors stay here; the engine never sees them.
        if let Err(err) = context.call(&self.callback, &text) {
            trace!(context = %context.id(), error = %err, "inspector callback failed");
        }
    }
}

impl Channel for Frontend {
    fn send_response(&self, _call_id: i32, message: StringBuffer) {
        self.send(message.string());
    }

    fn send_notification(&self, message: StringBuffer) {
        self.send(message.string());
    }

    fn flush_protocol_notifications(&self) {}
}
