//! Numbered requests with synchronous replies.

use std::cell::Cell;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{ProtocolSchema, ResponseInbox};
use crate::error::BridgeError;
use crate::inspector::Dispatcher;
use crate::Result;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

/// Sends protocol commands and returns their results.
///
/// Notifications that arrive alongside replies stay in the inbox until
/// [`ResponseInbox::take_notifications`] drains them. A long-lived client
/// that never drains keeps only the newest
/// [`DEFAULT_NOTIFICATION_CAPACITY`](super::DEFAULT_NOTIFICATION_CAPACITY)
/// of them, unless its inbox was built with
/// [`ResponseInbox::with_capacity`].
pub struct ProtocolClient {
    dispatcher: Dispatcher,
    inbox: ResponseInbox,
    schema: Option<ProtocolSchema>,
    next_id: Cell<i64>,
}

impl ProtocolClient {
    /// Create a client over a dispatcher whose session reports to `inbox`.
    pub fn new(dispatcher: Dispatcher, inbox: ResponseInbox) -> Self {
        Self {
            dispatcher,
            inbox,
            schema: None,
            next_id: Cell::new(0),
        }
    }

    /// Only allow the stable commands `schema` lists.
    pub fn with_schema(mut self, schema: ProtocolSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// The inbox replies are read from.
    pub fn inbox(&self) -> &ResponseInbox {
        &self.inbox
    }

    /// Commands of one domain.
    pub fn domain<'a>(&'a self, name: &'a str) -> Domain<'a> {
        Domain { client: self, name }
    }

    /// Send `method` and return its `result`.
    ///
    /// Fails with [`BridgeError::Protocol`] when the inspector answers with an
    /// error, and [`BridgeError::NoResponse`] when it does not answer before
    /// the dispatch returns.
    pub fn call(&self, method: &str, params: Option<Value>) -> Result<Value> {
        if let Some(schema) = &self.schema {
            if !schema.is_callable(method) {
                return Err(BridgeError::UnknownCommand(method.to_string()));
            }
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let mut request = json!({ "id": id, "method": method });
        if let Some(params) = params {
            request["params"] = params;
        }

        // A stale reply must not be mistaken for this one.
        self.inbox.take_response();
        debug!(id, method, "protocol request");
        self.dispatcher.dispatch(&serde_json::to_string(&request)?)?;

        let response = self
            .inbox
            .take_response()
            .filter(|r| r.get("id").and_then(Value::as_i64) == Some(id))
            .ok_or_else(|| BridgeError::NoResponse(method.to_string()))?;

        if let Some(error) = response.get("error") {
            let body: ErrorBody = serde_json::from_value(error.clone())?;
            return Err(BridgeError::Protocol {
                code: body.code,
                message: body.message,
                data: body.data,
            });
        }

        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }
}

/// A protocol domain bound to a client.
pub struct Domain<'a> {
    client: &'a ProtocolClient,
    name: &'a str,
}

impl Domain<'_> {
    /// Send `Domain.command`.
    pub fn call(&self, command: &str, params: Option<Value>) -> Result<Value> {
        self.client
            .call(&format!("{}.{}", self.name, command), params)
    }
}
