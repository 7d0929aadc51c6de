//! Per-context session lifecycle: `start`, `stop` and the dispatch function.

use std::rc::Rc;

use tracing::{debug, info};

use super::session::ContextSession;
use super::{Engine, SessionState, DEFAULT_CONTEXT_GROUP_ID};
use crate::context::{Callback, Context, ContextId, WeakContext};
use crate::error::BridgeError;
use crate::text::{ScriptText, StringView};
use crate::Result;

/// Names the module registers its entry points under.
pub const EXPORTS: [&str; 2] = ["start", "stop"];

/// The module's entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Export {
    /// Open a session for the calling context.
    Start,
    /// Close the calling context's session.
    Stop,
}

impl Export {
    /// Registered name of the entry point.
    pub fn name(&self) -> &'static str {
        match self {
            Export::Start => EXPORTS[0],
            Export::Stop => EXPORTS[1],
        }
    }

    /// Look up an entry point by its registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Export::Start),
            "stop" => Some(Export::Stop),
            _ => None,
        }
    }
}

/// Options applied to every session the module opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectorOptions {
    /// Context group sessions connect to.
    pub context_group_id: i32,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            context_group_id: DEFAULT_CONTEXT_GROUP_ID,
        }
    }
}

/// Opens and closes inspector sessions for contexts.
///
/// A context has at most one session at a time; the session lives in the
/// context itself, so the module keeps no per-context state.
pub struct InspectorModule {
    engine: Rc<dyn Engine>,
    options: InspectorOptions,
}

impl InspectorModule {
    /// Create a module backed by `engine`.
    pub fn new(engine: impl Engine + 'static) -> Self {
        Self::with_engine(Rc::new(engine))
    }

    /// Create a module backed by a shared engine.
    pub fn with_engine(engine: Rc<dyn Engine>) -> Self {
        Self {
            engine,
            options: InspectorOptions::default(),
        }
    }

    /// Replace the session options.
    pub fn with_options(mut self, options: InspectorOptions) -> Self {
        self.options = options;
        self
    }

    /// Session options in effect.
    pub fn options(&self) -> &InspectorOptions {
        &self.options
    }

    /// Entry points in registration order.
    pub fn exports() -> [(&'static str, Export); 2] {
        [
            (Export::Start.name(), Export::Start),
            (Export::Stop.name(), Export::Stop),
        ]
    }

    /// Open a session for `context` that reports to `callback`.
    ///
    /// Returns `None`, and leaves the existing session untouched, when the
    /// context already has one.
    pub fn start(&self, context: &Context, callback: Callback) -> Option<Dispatcher> {
        if context.session_state() == SessionState::Active {
            debug!(context = %context.id(), "inspector session already active");
            return None;
        }

        let session = ContextSession::connect(&*self.engine, context, callback, &self.options);

        // Connecting runs engine code, which may have started a session of
        // its own through the callback.
        if let Err(session) = context.install_inspector_session(Rc::new(session)) {
            debug!(context = %context.id(), "inspector session started during connect");
            drop(session);
            return None;
        }

        info!(context = %context.id(), "inspector session started");
        Some(Dispatcher::new(context))
    }

    /// Close the session of `context`.
    ///
    /// Returns `false` if there was none. The callback sees no message after
    /// this returns, even when the stop is issued from inside a dispatch.
    pub fn stop(&self, context: &Context) -> bool {
        match context.take_inspector_session() {
            Some(session) => {
                session.close();
                drop(session);
                info!(context = %context.id(), "inspector session stopped");
                true
            }
            None => {
                debug!(context = %context.id(), "no inspector session to stop");
                false
            }
        }
    }

    /// Whether `context` has a session.
    pub fn is_active(&self, context: &Context) -> bool {
        context.session_state().can_dispatch()
    }
}

/// Delivers inbound protocol messages to a context's session.
///
/// Bound to the context rather than to one session: after a stop and a new
/// start on the same context, an old dispatcher reaches the new session.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    context: WeakContext,
}

impl Dispatcher {
    fn new(context: &Context) -> Self {
        Self {
            context: context.downgrade(),
        }
    }

    /// Identifier of the context this dispatcher is bound to.
    pub fn context_id(&self) -> ContextId {
        self.context.id()
    }

    /// Feed one protocol message into the session.
    ///
    /// Outbound messages produced while processing reach the callback before
    /// this returns.
    pub fn dispatch(&self, message: &str) -> Result<()> {
        let units: Vec<u16> = message.encode_utf16().collect();
        self.dispatch_units(&units)
    }

    /// Feed one protocol message, given as host text, into the session.
    pub fn dispatch_text(&self, message: &ScriptText) -> Result<()> {
        self.dispatch_units(&message.to_utf16())
    }

    fn dispatch_units(&self, units: &[u16]) -> Result<()> {
        let context = self.context.upgrade().ok_or(BridgeError::ContextDropped)?;
        // Clone the session out of the slot so the callback may stop it.
        let session = context
            .inspector_session()
            .ok_or_else(|| BridgeError::NoSession(context.id()))?;

        session.dispatch(StringView::TwoByte(units));
        Ok(())
    }
}
