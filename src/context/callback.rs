//! Host callback functions.

use std::fmt;
use std::rc::Rc;

use super::Context;
use crate::error::ScriptError;
use crate::text::ScriptText;

type CallbackFn = dyn Fn(&Context, &ScriptText) -> Result<(), ScriptError>;

/// A host function invoked with one text argument.
///
/// Cloning is cheap and shares the same function.
#[derive(Clone)]
pub struct Callback {
    function: Rc<CallbackFn>,
}

impl Callback {
    /// Wrap a host function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&Context, &ScriptText) -> Result<(), ScriptError> + 'static,
    {
        Self {
            function: Rc::new(function),
        }
    }

    pub(super) fn invoke(&self, context: &Context, text: &ScriptText) -> Result<(), ScriptError> {
        (self.function)(context, text)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("function", &Rc::as_ptr(&self.function))
            .finish()
    }
}
