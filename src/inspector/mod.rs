//! Inspector session management.
//!
//! The protocol engine itself is an external collaborator reached through
//! the [`Engine`], [`Inspector`] and [`InspectorSession`] traits. This module
//! owns the per-context session lifecycle ([`InspectorModule`]) and the relay
//! that carries engine output back to the host ([`Channel`]).
//!
//! Everything here is single-threaded. A dispatch may re-enter the host
//! callback, and the callback may dispatch again or stop the session; no
//! borrow is held across either call.

mod channel;
mod manager;
mod session;
mod state;

pub use manager::{Dispatcher, Export, InspectorModule, InspectorOptions, EXPORTS};
pub use state::SessionState;

pub(crate) use session::ContextSession;

use std::rc::Rc;

use crate::context::{Context, ContextId};
use crate::text::{StringBuffer, StringView};

/// Context group used when none is configured.
pub const DEFAULT_CONTEXT_GROUP_ID: i32 = 1;

/// A script engine that can create inspectors.
pub trait Engine {
    /// Create an inspector for `context`.
    fn create_inspector(&self, context: &Context) -> Box<dyn Inspector>;
}

/// An engine-side inspector that sessions connect to.
pub trait Inspector {
    /// Open a session in `context_group_id` that reports to `channel`.
    ///
    /// `state` is a previously saved session state, empty for a fresh one.
    fn connect(
        &self,
        context_group_id: i32,
        channel: Rc<dyn Channel>,
        state: StringView<'_>,
    ) -> Box<dyn InspectorSession>;

    /// Announce a context to the inspector.
    fn context_created(&self, info: ContextInfo<'_>);

    /// Announce that a context is going away.
    fn context_destroyed(&self, _context_id: ContextId) {}
}

/// One live debugging connection.
pub trait InspectorSession {
    /// Process one inbound protocol message.
    ///
    /// Takes `&self` since the engine may be re-entered while this runs.
    fn dispatch_protocol_message(&self, message: StringView<'_>);
}

/// Outbound leg of a session.
pub trait Channel {
    /// Reply to the request numbered `call_id`.
    fn send_response(&self, call_id: i32, message: StringBuffer);

    /// Unsolicited protocol event.
    fn send_notification(&self, message: StringBuffer);

    /// Deliver any notifications the channel has buffered.
    fn flush_protocol_notifications(&self);
}

/// Description of a context handed to [`Inspector::context_created`].
#[derive(Debug, Clone, Copy)]
pub struct ContextInfo<'a> {
    pub context: &'a Context,
    pub context_group_id: i32,
    pub human_readable_name: StringView<'a>,
}
