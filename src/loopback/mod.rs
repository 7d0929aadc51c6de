//! In-process protocol engine.
//!
//! Speaks just enough of the inspector protocol to exercise the bridge end
//! to end: `Schema.getDomains`, `Runtime.enable`, `Runtime.disable` and a
//! `Runtime.evaluate` that hands the expression back as a string. Anything
//! else gets the protocol's "method not found" error.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::context::{Context, ContextId};
use crate::inspector::{Channel, ContextInfo, Engine, Inspector, InspectorSession};
use crate::text::{ScriptText, StringBuffer, StringView};

/// Protocol version reported for every domain.
pub const PROTOCOL_VERSION: &str = "1.3";

/// Domains this engine implements.
pub const DOMAINS: [&str; 2] = ["Runtime", "Schema"];

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Engine whose inspectors are [`LoopbackInspector`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopbackEngine;

impl LoopbackEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for LoopbackEngine {
    fn create_inspector(&self, _context: &Context) -> Box<dyn Inspector> {
        Box::new(LoopbackInspector::new())
    }
}

#[derive(Debug, Clone)]
struct ExecutionContext {
    id: u32,
    group: i32,
    name: String,
    unique_id: ContextId,
}

#[derive(Default)]
struct InspectorState {
    contexts: RefCell<Vec<ExecutionContext>>,
    next_context_id: Cell<u32>,
}

/// Inspector that answers requests in-process.
#[derive(Default)]
pub struct LoopbackInspector {
    state: Rc<InspectorState>,
}

impl LoopbackInspector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inspector for LoopbackInspector {
    fn connect(
        &self,
        context_group_id: i32,
        channel: Rc<dyn Channel>,
        _state: StringView<'_>,
    ) -> Box<dyn InspectorSession> {
        Box::new(LoopbackSession {
            state: Rc::clone(&self.state),
            channel,
            group: context_group_id,
            runtime_enabled: Cell::new(false),
        })
    }

    fn context_created(&self, info: ContextInfo<'_>) {
        let id = self.state.next_context_id.get() + 1;
        self.state.next_context_id.set(id);
        let context = ExecutionContext {
            id,
            group: info.context_group_id,
            name: ScriptText::from_view(info.human_readable_name).to_string(),
            unique_id: info.context.id(),
        };
        debug!(context = %context.unique_id, id, "execution context created");
        self.state.contexts.borrow_mut().push(context);
    }

    fn context_destroyed(&self, context_id: ContextId) {
        self.state
            .contexts
            .borrow_mut()
            .retain(|c| c.unique_id != context_id);
    }
}

#[derive(Debug, Deserialize)]
struct Request {
    id: i32,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Why a request could not be served.
struct Failure {
    code: i64,
    message: String,
    data: Option<String>,
}

impl Failure {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut error = json!({ "code": self.code, "message": self.message });
        if let Some(data) = &self.data {
            error["data"] = Value::String(data.clone());
        }
        error
    }
}

struct LoopbackSession {
    state: Rc<InspectorState>,
    channel: Rc<dyn Channel>,
    group: i32,
    runtime_enabled: Cell<bool>,
}

impl LoopbackSession {
    fn respond(&self, id: i32, outcome: Result<Value, Failure>) {
        let reply = match outcome {
            Ok(result) => json!({ "id": id, "result": result }),
            Err(failure) => json!({ "id": id, "error": failure.to_json() }),
        };
        self.channel
            .send_response(id, StringBuffer::from(reply.to_string().as_str()));
    }

    fn notify(&self, method: &str, params: Value) {
        let event = json!({ "method": method, "params": params });
        self.channel
            .send_notification(StringBuffer::from(event.to_string().as_str()));
    }

    fn handle(&self, method: &str, params: &Value) -> Result<Value, Failure> {
        match method {
            "Schema.getDomains" => Ok(json!({
                "domains": DOMAINS
                    .iter()
                    .map(|name| json!({ "name": name, "version": PROTOCOL_VERSION }))
                    .collect::<Vec<_>>()
            })),
            "Runtime.enable" => {
                if !self.runtime_enabled.replace(true) {
                    self.announce_contexts();
                }
                Ok(json!({}))
            }
            "Runtime.disable" => {
                self.runtime_enabled.set(false);
                Ok(json!({}))
            }
            "Runtime.evaluate" => {
                let expression = params
                    .get("expression")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Failure::new(INVALID_PARAMS, "Invalid parameters").with_data(
                            "Failed to deserialize params.expression - BINDINGS: mandatory field missing",
                        )
                    })?;
                Ok(json!({ "result": { "type": "string", "value": expression } }))
            }
            _ => Err(Failure::new(
                METHOD_NOT_FOUND,
                format!("'{}' wasn't found", method),
            )),
        }
    }

    fn announce_contexts(&self) {
        // Snapshot first: the channel may re-enter this inspector.
        let contexts: Vec<ExecutionContext> = self
            .state
            .contexts
            .borrow()
            .iter()
            .filter(|c| c.group == self.group)
            .cloned()
            .collect();

        for context in contexts {
            self.notify(
                "Runtime.executionContextCreated",
                json!({
                    "context": {
                        "id": context.id,
                        "origin": "",
                        "name": context.name,
                        "uniqueId": context.unique_id.to_string(),
                        "auxData": { "isDefault": true }
                    }
                }),
            );
        }
    }

    fn reject(&self, failure: Failure) {
        let reply = json!({ "error": failure.to_json() });
        self.channel
            .send_notification(StringBuffer::from(reply.to_string().as_str()));
    }
}

impl InspectorSession for LoopbackSession {
    fn dispatch_protocol_message(&self, message: StringView<'_>) {
        let text = ScriptText::from_view(message).to_string();

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => {
                return self.reject(Failure::new(PARSE_ERROR, "Message must be a valid JSON"))
            }
        };

        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return self.reject(
                    Failure::new(
                        INVALID_REQUEST,
                        "Message must have integer 'id' and string 'method' properties",
                    )
                    .with_data(e.to_string()),
                )
            }
        };

        trace!(id = request.id, method = %request.method, "loopback request");
        let outcome = self.handle(&request.method, &request.params);
        self.respond(request.id, outcome);
    }
}
