//! A context's inspector session and the objects it keeps alive.

use std::rc::Rc;

use tracing::debug;

use super::channel::Frontend;
use super::{Channel, ContextInfo, Engine, Inspector, InspectorOptions, InspectorSession};
use crate::context::{Callback, Context, ContextId};
use crate::text::{ScriptText, StringView};

/// Everything `start` creates for one context.
///
/// Fields drop in declaration order: the session goes before the inspector
/// it was opened on, and the channel goes last.
pub(crate) struct ContextSession {
    session: Box<dyn InspectorSession>,
    inspector: Box<dyn Inspector>,
    channel: Rc<Frontend>,
    context_id: ContextId,
    context_group_id: i32,
}

impl ContextSession {
    pub(crate) fn connect(
        engine: &dyn Engine,
        context: &Context,
        callback: Callback,
        options: &InspectorOptions,
    ) -> Self {
        let channel = Rc::new(Frontend::new(context, callback));
        let inspector = engine.create_inspector(context);
        let session = inspector.connect(
            options.context_group_id,
            Rc::clone(&channel) as Rc<dyn Channel>,
            StringView::empty(),
        );

        let name = ScriptText::from(context.name());
        inspector.context_created(ContextInfo {
            context,
            context_group_id: options.context_group_id,
            human_readable_name: name.as_view(),
        });

        debug!(
            context = %context.id(),
            group = options.context_group_id,
            "inspector session connected"
        );

        Self {
            session,
            inspector,
            channel,
            context_id: context.id(),
            context_group_id: options.context_group_id,
        }
    }

    pub(crate) fn dispatch(&self, message: StringView<'_>) {
        self.session.dispatch_protocol_message(message);
    }

    /// Cut the channel off from the callback.
    ///
    /// A dispatch in progress keeps its own handle on the session, so the
    /// session itself may outlive `stop` until that dispatch unwinds.
    pub(crate) fn close(&self) {
        self.channel.close();
    }
}

impl Drop for ContextSession {
    fn drop(&mut self) {
        self.channel.close();
        self.inspector.context_destroyed(self.context_id);
        debug!(
            context = %self.context_id,
            group = self.context_group_id,
            "inspector session closed"
        );
    }
}
