//! Script execution policy scopes.

use super::Context;

/// Sets a context's script execution policy for as long as it is alive.
///
/// The previous policy is restored on drop, so scopes nest.
#[must_use = "the policy is reverted as soon as the scope is dropped"]
pub struct ScriptScope<'a> {
    context: &'a Context,
    previous: bool,
}

impl<'a> ScriptScope<'a> {
    pub(super) fn enter(context: &'a Context, allowed: bool) -> Self {
        let previous = context.replace_script_allowed(allowed);
        Self { context, previous }
    }
}

impl Drop for ScriptScope<'_> {
    fn drop(&mut self) {
        self.context.replace_script_allowed(self.previous);
    }
}
