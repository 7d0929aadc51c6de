//! Execution contexts.
//!
//! A [`Context`] is the host-side scope that script runs in. It owns at most
//! one inspector session, held in a dedicated slot, and carries the script
//! execution policy that callbacks are checked against.

mod callback;
mod id;
mod scope;

pub use callback::Callback;
pub use id::ContextId;
pub use scope::ScriptScope;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::ScriptError;
use crate::inspector::{ContextSession, SessionState};
use crate::text::ScriptText;

struct ContextInner {
    id: ContextId,
    name: String,
    script_allowed: Cell<bool>,
    // Never borrowed across a call into the engine or the host.
    inspector: RefCell<Option<Rc<ContextSession>>>,
}

/// Handle to an execution context.
///
/// Clones refer to the same context. The context, and the inspector session
/// it owns, is dropped with its last handle.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

impl Context {
    /// Create a new unnamed context.
    pub fn new() -> Self {
        Self::with_name("")
    }

    /// Create a context with a human readable name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                id: ContextId::new(),
                name: name.into(),
                script_allowed: Cell::new(true),
                inspector: RefCell::new(None),
            }),
        }
    }

    /// The context's identifier.
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// The context's human readable name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// A handle that does not keep the context alive.
    pub fn downgrade(&self) -> WeakContext {
        WeakContext {
            inner: Rc::downgrade(&self.inner),
            id: self.inner.id,
        }
    }

    /// Whether host script may currently run in this context.
    pub fn is_script_allowed(&self) -> bool {
        self.inner.script_allowed.get()
    }

    /// Permit script execution until the returned scope is dropped.
    pub fn allow_script_execution(&self) -> ScriptScope<'_> {
        ScriptScope::enter(self, true)
    }

    /// Forbid script execution until the returned scope is dropped.
    pub fn disallow_script_execution(&self) -> ScriptScope<'_> {
        ScriptScope::enter(self, false)
    }

    fn replace_script_allowed(&self, allowed: bool) -> bool {
        self.inner.script_allowed.replace(allowed)
    }

    /// Invoke a host callback in this context with one text argument.
    pub fn call(&self, callback: &Callback, text: &ScriptText) -> Result<(), ScriptError> {
        if !self.is_script_allowed() {
            return Err(ScriptError::forbidden());
        }
        callback.invoke(self, text)
    }

    /// Inspector session lifecycle state.
    pub fn session_state(&self) -> SessionState {
        if self.inner.inspector.borrow().is_some() {
            SessionState::Active
        } else {
            SessionState::Inactive
        }
    }

    pub(crate) fn inspector_session(&self) -> Option<Rc<ContextSession>> {
        self.inner.inspector.borrow().clone()
    }

    /// Store `session` unless the slot is already taken, returning it back
    /// in that case.
    pub(crate) fn install_inspector_session(
        &self,
        session: Rc<ContextSession>,
    ) -> Result<(), Rc<ContextSession>> {
        let mut slot = self.inner.inspector.borrow_mut();
        if slot.is_some() {
            return Err(session);
        }
        *slot = Some(session);
        Ok(())
    }

    pub(crate) fn take_inspector_session(&self) -> Option<Rc<ContextSession>> {
        self.inner.inspector.borrow_mut().take()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("session_state", &self.session_state())
            .finish()
    }
}

/// Non-owning handle to a [`Context`].
#[derive(Clone)]
pub struct WeakContext {
    inner: Weak<ContextInner>,
    id: ContextId,
}

impl WeakContext {
    /// The context, if it is still alive.
    pub fn upgrade(&self) -> Option<Context> {
        self.inner.upgrade().map(|inner| Context { inner })
    }

    /// Identifier of the context this handle was taken from.
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl fmt::Debug for WeakContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContext").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let context = Context::new();
        assert_eq!(context.name(), "");
        assert!(context.is_script_allowed());
        assert_eq!(context.session_state(), SessionState::Inactive);
    }

    #[test]
    fn test_context_ids_differ() {
        let a = Context::new();
        let b = Context::with_name("main");
        assert_ne!(a.id(), b.id());
        assert_eq!(b.name(), "main");
    }

    #[test]
    fn test_clone_shares_context() {
        let context = Context::new();
        let clone = context.clone();
        assert_eq!(context.id(), clone.id());

        let _forbid = clone.disallow_script_execution();
        assert!(!context.is_script_allowed());
    }

    #[test]
    fn test_weak_context_upgrade() {
        let context = Context::new();
        let weak = context.downgrade();
        assert_eq!(weak.id(), context.id());
        assert!(weak.upgrade().is_some());

        drop(context);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_call_passes_argument() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let callback = Callback::new(move |_, text| {
            sink.borrow_mut().push(text.to_string());
            Ok(())
        });

        let context = Context::new();
        context
            .call(&callback, &ScriptText::from("hello"))
            .unwrap();
        assert_eq!(*seen.borrow(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_call_forbidden() {
        let callback = Callback::new(|_, _| Ok(()));
        let context = Context::new();
        let _forbid = context.disallow_script_execution();

        let err = context
            .call(&callback, &ScriptText::from("hello"))
            .unwrap_err();
        assert_eq!(err, ScriptError::forbidden());
    }

    #[test]
    fn test_call_propagates_script_error() {
        let callback = Callback::new(|_, _| Err(ScriptError::new("boom")));
        let context = Context::new();
        let err = context.call(&callback, &ScriptText::from("x")).unwrap_err();
        assert_eq!(err.message(), "boom");
    }
}
