//! Context identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one [`Context`](super::Context), shown as `ctx-XXXXXXXX`.
///
/// No two contexts created in the same process share an id, so engines can
/// use it as the unique id they report in protocol events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    pub fn new() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn test_each_context_gets_its_own_id() {
        let a = Context::new();
        let b = Context::new();
        assert_ne!(a.id(), b.id());
        // Clones are the same context
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_weak_handle_keeps_id() {
        let context = Context::new();
        let weak = context.downgrade();
        let id = context.id();
        drop(context);
        assert_eq!(weak.id(), id);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(ContextId::from_raw(255).to_string(), "ctx-000000ff");
        assert_eq!(ContextId::from_raw(0x12345678).to_string(), "ctx-12345678");
    }
}
