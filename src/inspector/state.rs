//! Session lifecycle states.

/// Whether a context currently has an inspector session.
///
/// `Inactive -> Active` on start, `Active -> Inactive` on stop. Starting an
/// active context leaves it `Active` with the original session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session is attached.
    #[default]
    Inactive,
    /// A session is attached and accepts messages.
    Active,
}

impl SessionState {
    /// Check if protocol messages can be dispatched.
    pub fn can_dispatch(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}
