//! End-to-end tests of the bridge against the loopback engine.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use inspector_bridge::loopback::PROTOCOL_VERSION;
use inspector_bridge::protocol::{ProtocolClient, ResponseInbox};
use inspector_bridge::{
    BridgeError, Callback, Context, Dispatcher, InspectorModule, LoopbackEngine, ScriptError,
    ScriptText, SessionState,
};

fn module() -> InspectorModule {
    InspectorModule::new(LoopbackEngine::new())
}

fn recording() -> (Callback, Rc<RefCell<Vec<ScriptText>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let callback = Callback::new(move |_, text| {
        sink.borrow_mut().push(text.clone());
        Ok(())
    });
    (callback, seen)
}

fn parse(text: &ScriptText) -> Value {
    serde_json::from_str(&text.to_string_lossy()).unwrap()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_start_then_stop() {
    let module = module();
    let context = Context::new();
    let (callback, _) = recording();

    assert!(module.start(&context, callback).is_some());
    assert_eq!(context.session_state(), SessionState::Active);
    assert!(module.stop(&context));
    assert_eq!(context.session_state(), SessionState::Inactive);
}

#[test]
fn test_stop_without_start() {
    let module = module();
    let context = Context::new();

    assert!(!module.stop(&context));
    assert!(!module.stop(&context));
}

#[test]
fn test_stop_on_untouched_context_invokes_nothing() {
    let module = module();
    let started = Context::new();
    let untouched = Context::new();
    let (callback, seen) = recording();

    let _dispatcher = module.start(&started, callback).unwrap();
    assert!(!module.stop(&untouched));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_double_start_keeps_single_session() {
    let module = module();
    let context = Context::new();
    let (first, seen_first) = recording();
    let (second, seen_second) = recording();

    let dispatcher = module.start(&context, first).unwrap();
    assert!(module.start(&context, second).is_none());

    dispatcher
        .dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)
        .unwrap();
    assert_eq!(seen_first.borrow().len(), 1);
    assert!(seen_second.borrow().is_empty());

    assert!(module.stop(&context));
    assert!(!module.stop(&context));
}

#[test]
fn test_sessions_are_per_context() {
    let module = module();
    let a = Context::new();
    let b = Context::new();
    let (callback_a, seen_a) = recording();
    let (callback_b, seen_b) = recording();

    let dispatch_a = module.start(&a, callback_a).unwrap();
    let _dispatch_b = module.start(&b, callback_b).unwrap();

    dispatch_a
        .dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)
        .unwrap();
    assert_eq!(seen_a.borrow().len(), 1);
    assert!(seen_b.borrow().is_empty());

    assert!(module.stop(&a));
    assert!(module.is_active(&b));
}

// ============================================================================
// Message relay
// ============================================================================

#[test]
fn test_handshake_scenario() {
    let module = module();
    let context = Context::new();
    let (callback, seen) = recording();

    let dispatcher = module.start(&context, callback).unwrap();
    dispatcher
        .dispatch(r#"{"id":0,"method":"Schema.getDomains"}"#)
        .unwrap();

    {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let reply = parse(&seen[0]);
        assert_eq!(reply["id"], 0);
        let domains = reply["result"]["domains"].as_array().unwrap();
        assert!(!domains.is_empty());
        assert!(domains.iter().all(|d| d["version"] == PROTOCOL_VERSION));
    }

    assert!(module.stop(&context));
}

#[test]
fn test_content_and_width_preserved() {
    let module = module();
    let context = Context::new();
    let (callback, seen) = recording();
    let dispatcher = module.start(&context, callback).unwrap();

    dispatcher
        .dispatch(r#"{"id":1,"method":"Runtime.evaluate","params":{"expression":"'café'"}}"#)
        .unwrap();
    dispatcher
        .dispatch("{\"id\":2,\"method\":\"Runtime.evaluate\",\"params\":{\"expression\":\"\u{3c0} \u{1f600}\"}}")
        .unwrap();

    let seen = seen.borrow();
    assert!(seen[0].is_one_byte());
    assert_eq!(parse(&seen[0])["result"]["result"]["value"], "'caf\u{e9}'");

    assert!(!seen[1].is_one_byte());
    assert_eq!(
        parse(&seen[1])["result"]["result"]["value"],
        "\u{3c0} \u{1f600}"
    );
}

#[test]
fn test_notifications_delivered_before_dispatch_returns() {
    let module = module();
    let context = Context::with_name("main");
    let (callback, seen) = recording();
    let dispatcher = module.start(&context, callback).unwrap();

    dispatcher
        .dispatch(r#"{"id":1,"method":"Runtime.enable"}"#)
        .unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    let event = parse(&seen[0]);
    assert_eq!(event["method"], "Runtime.executionContextCreated");
    assert_eq!(event["params"]["context"]["name"], "main");
    assert_eq!(parse(&seen[1])["id"], 1);
}

#[test]
fn test_callback_runs_when_script_forbidden() {
    let module = module();
    let context = Context::new();
    let (callback, seen) = recording();
    let dispatcher = module.start(&context, callback).unwrap();

    let _forbid = context.disallow_script_execution();
    dispatcher
        .dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)
        .unwrap();

    assert_eq!(seen.borrow().len(), 1);
    assert!(!context.is_script_allowed());
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_failing_callback_does_not_break_dispatch() {
    let module = module();
    let context = Context::new();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let callback = Callback::new(move |_, _| {
        *counter.borrow_mut() += 1;
        Err(ScriptError::new("callback threw"))
    });

    let dispatcher = module.start(&context, callback).unwrap();
    dispatcher
        .dispatch(r#"{"id":1,"method":"Runtime.enable"}"#)
        .unwrap();
    dispatcher
        .dispatch(r#"{"id":2,"method":"Schema.getDomains"}"#)
        .unwrap();

    // Notification + response, then one more response
    assert_eq!(*calls.borrow(), 3);
    assert!(module.stop(&context));
}

#[test]
fn test_dispatch_before_start_and_after_stop() {
    let module = module();
    let context = Context::new();
    let (callback, seen) = recording();

    let dispatcher = module.start(&context, callback).unwrap();
    assert!(module.stop(&context));

    let err = dispatcher
        .dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)
        .unwrap_err();
    assert!(matches!(err, BridgeError::NoSession(id) if id == context.id()));
    assert!(seen.borrow().is_empty());
}

// ============================================================================
// Reentrancy
// ============================================================================

#[test]
fn test_callback_may_dispatch_again() {
    let module = module();
    let context = Context::new();
    let slot: Rc<RefCell<Option<Dispatcher>>> = Rc::new(RefCell::new(None));
    let seen = Rc::new(RefCell::new(Vec::new()));

    let inner_slot = Rc::clone(&slot);
    let sink = Rc::clone(&seen);
    let callback = Callback::new(move |_, text| {
        let reply = parse(text);
        sink.borrow_mut().push(reply.clone());
        if reply["id"] == 1 {
            let dispatcher = inner_slot.borrow().clone();
            if let Some(dispatcher) = dispatcher {
                dispatcher
                    .dispatch(r#"{"id":2,"method":"Schema.getDomains"}"#)
                    .map_err(|e| ScriptError::new(e.to_string()))?;
            }
        }
        Ok(())
    });

    let dispatcher = module.start(&context, callback).unwrap();
    *slot.borrow_mut() = Some(dispatcher.clone());

    dispatcher
        .dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)
        .unwrap();

    let ids: Vec<Value> = seen.borrow().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![Value::from(1), Value::from(2)]);
}

#[test]
fn test_callback_may_stop_session() {
    let module = Rc::new(module());
    let context = Context::new();
    let stopped = Rc::new(RefCell::new(None));

    let inner_module = Rc::clone(&module);
    let result = Rc::clone(&stopped);
    let callback = Callback::new(move |context, _| {
        *result.borrow_mut() = Some(inner_module.stop(context));
        Ok(())
    });

    let dispatcher = module.start(&context, callback).unwrap();
    dispatcher
        .dispatch(r#"{"id":1,"method":"Schema.getDomains"}"#)
        .unwrap();

    assert_eq!(*stopped.borrow(), Some(true));
    assert_eq!(context.session_state(), SessionState::Inactive);
    assert!(matches!(
        dispatcher.dispatch(r#"{"id":2,"method":"Schema.getDomains"}"#),
        Err(BridgeError::NoSession(_))
    ));
}

#[test]
fn test_stopped_session_delivers_nothing_more() {
    let module = Rc::new(module());
    let context = Context::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let inner_module = Rc::clone(&module);
    let sink = Rc::clone(&seen);
    let callback = Callback::new(move |context, text| {
        let message = parse(text);
        sink.borrow_mut().push(message.clone());
        if message["method"] == "Runtime.executionContextCreated" {
            assert!(inner_module.stop(context));
        }
        Ok(())
    });

    let dispatcher = module.start(&context, callback).unwrap();
    dispatcher
        .dispatch(r#"{"id":1,"method":"Runtime.enable"}"#)
        .unwrap();

    // The Runtime.enable response comes after the stop and is dropped
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["method"], "Runtime.executionContextCreated");
    assert_eq!(context.session_state(), SessionState::Inactive);
}

#[test]
fn test_restart_inside_callback_isolates_old_session() {
    let module = Rc::new(module());
    let context = Context::new();
    let (fresh, seen_fresh) = recording();
    let seen_old = Rc::new(RefCell::new(Vec::new()));

    let inner_module = Rc::clone(&module);
    let sink = Rc::clone(&seen_old);
    let fresh = RefCell::new(Some(fresh));
    let callback = Callback::new(move |context, text| {
        sink.borrow_mut().push(text.clone());
        if let Some(next) = fresh.borrow_mut().take() {
            inner_module.stop(context);
            assert!(inner_module.start(context, next).is_some());
        }
        Ok(())
    });

    let dispatcher = module.start(&context, callback).unwrap();
    dispatcher
        .dispatch(r#"{"id":1,"method":"Runtime.enable"}"#)
        .unwrap();

    // Only the notification that triggered the restart reached the old callback
    assert_eq!(seen_old.borrow().len(), 1);
    assert!(seen_fresh.borrow().is_empty());

    dispatcher
        .dispatch(r#"{"id":2,"method":"Schema.getDomains"}"#)
        .unwrap();
    assert_eq!(seen_old.borrow().len(), 1);
    assert_eq!(seen_fresh.borrow().len(), 1);
    assert_eq!(parse(&seen_fresh.borrow()[0])["id"], 2);
}

// ============================================================================
// Protocol client
// ============================================================================

#[test]
fn test_client_round_trip() {
    let module = module();
    let context = Context::new();
    let inbox = ResponseInbox::new();
    let dispatcher = module.start(&context, inbox.callback()).unwrap();
    let client = ProtocolClient::new(dispatcher, inbox);

    client.domain("Runtime").call("enable", None).unwrap();
    let domains = client.domain("Schema").call("getDomains", None).unwrap();
    assert!(domains["domains"].is_array());

    let err = client.domain("Debugger").call("enable", None).unwrap_err();
    match err {
        BridgeError::Protocol { code, message, .. } => {
            assert_eq!(code, -32601);
            assert!(message.contains("Debugger.enable"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(module.stop(&context));
}
