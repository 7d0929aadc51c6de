//! Callback side of the protocol client.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use crate::context::Callback;
use crate::error::ScriptError;

/// Notifications kept by [`ResponseInbox::new`] before the oldest are dropped.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 1024;

struct InboxState {
    response: RefCell<Option<Value>>,
    notifications: RefCell<VecDeque<Value>>,
    capacity: usize,
}

/// Collects what the inspector sends back.
///
/// Messages with an `id` are responses and only the latest is kept;
/// everything else is queued as a notification. The queue holds at most
/// `capacity` notifications; when full, the oldest one is dropped to make
/// room. Clones share the inbox.
#[derive(Clone)]
pub struct ResponseInbox {
    state: Rc<InboxState>,
}

impl ResponseInbox {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NOTIFICATION_CAPACITY)
    }

    /// Inbox that queues at most `capacity` notifications.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Rc::new(InboxState {
                response: RefCell::new(None),
                notifications: RefCell::new(VecDeque::new()),
                capacity,
            }),
        }
    }

    /// Callback that files messages into this inbox.
    ///
    /// Messages that are not JSON raise a script error.
    pub fn callback(&self) -> Callback {
        let state = Rc::clone(&self.state);
        Callback::new(move |_, text| {
            let message: Value = serde_json::from_str(&text.to_string_lossy())
                .map_err(|e| ScriptError::new(format!("SyntaxError: {}", e)))?;

            if message.get("id").is_some() {
                *state.response.borrow_mut() = Some(message);
            } else {
                let mut queue = state.notifications.borrow_mut();
                if state.capacity == 0 {
                    return Ok(());
                }
                if queue.len() >= state.capacity {
                    queue.pop_front();
                    trace!(capacity = state.capacity, "notification queue full, dropped oldest");
                }
                queue.push_back(message);
            }
            Ok(())
        })
    }

    /// Take the latest response.
    pub fn take_response(&self) -> Option<Value> {
        self.state.response.borrow_mut().take()
    }

    /// Drain queued notifications in arrival order.
    pub fn take_notifications(&self) -> Vec<Value> {
        self.state.notifications.borrow_mut().drain(..).collect()
    }

    /// Number of queued notifications.
    pub fn pending_notifications(&self) -> usize {
        self.state.notifications.borrow().len()
    }
}

impl Default for ResponseInbox {
    fn default() -> Self {
        Self::new()
    }
}
