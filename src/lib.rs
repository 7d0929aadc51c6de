//! # inspector-bridge
//!
//! Relay between a script engine's inspector protocol and an embedding host.
//!
//! Each execution [`Context`] can hold one inspector session. [`start`] opens
//! it and wires the engine's outbound messages (responses and notifications)
//! to a host [`Callback`]; the returned [`Dispatcher`] feeds inbound messages
//! into the session; [`stop`] tears it down. Protocol messages are opaque
//! text in both directions.
//!
//! ## Quick Start
//!
//! ```no_run
//! use inspector_bridge::{Callback, Context, InspectorModule, LoopbackEngine};
//!
//! fn main() -> inspector_bridge::Result<()> {
//!     inspector_bridge::logging::try_init().ok();
//!
//!     let module = InspectorModule::new(LoopbackEngine::new());
//!     let context = Context::new();
//!
//!     let dispatcher = module
//!         .start(&context, Callback::new(|_, message| {
//!             println!("{}", message);
//!             Ok(())
//!         }))
//!         .expect("fresh context has no session");
//!
//!     dispatcher.dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)?;
//!     assert!(module.stop(&context));
//!     Ok(())
//! }
//! ```
//!
//! [`start`]: InspectorModule::start
//! [`stop`]: InspectorModule::stop

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod inspector;
pub mod logging;
pub mod loopback;
pub mod protocol;
pub mod text;

// Re-export commonly used types
pub use context::{Callback, Context, ContextId, WeakContext};
pub use error::{BridgeError, Result, ScriptError};
pub use inspector::{
    Channel, ContextInfo, Dispatcher, Engine, Inspector, InspectorModule, InspectorOptions,
    InspectorSession, SessionState,
};
pub use loopback::LoopbackEngine;
pub use text::{ScriptText, StringBuffer, StringView};
