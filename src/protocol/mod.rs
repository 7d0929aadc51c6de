//! Synchronous request/response client on top of a [`Dispatcher`].
//!
//! The inspector answers most requests before `dispatch` returns, so a
//! client can number a request, dispatch it and read the reply straight out
//! of the callback's inbox.
//!
//! ```no_run
//! use inspector_bridge::{Context, InspectorModule, LoopbackEngine};
//! use inspector_bridge::protocol::{ProtocolClient, ResponseInbox};
//!
//! # fn main() -> inspector_bridge::Result<()> {
//! let module = InspectorModule::new(LoopbackEngine::new());
//! let context = Context::new();
//! let inbox = ResponseInbox::new();
//! let dispatcher = module.start(&context, inbox.callback()).unwrap();
//!
//! let client = ProtocolClient::new(dispatcher, inbox);
//! client.domain("Runtime").call("enable", None)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Dispatcher`]: crate::inspector::Dispatcher

mod client;
mod inbox;
mod schema;

pub use client::{Domain, ProtocolClient};
pub use inbox::{ResponseInbox, DEFAULT_NOTIFICATION_CAPACITY};
pub use schema::{CommandSchema, DomainSchema, ProtocolSchema};
