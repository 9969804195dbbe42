use serde_json::Value;

use crate::builder::tree_builder::TreeBuilder;
use crate::demo::compose;
use crate::element::element_model::{ActionBinding, Layout};
use crate::element::tree::UiTree;
use crate::error::ProtocolError;
use crate::router::diff::diff_trees;
use crate::service::service_model::{
    MethodOutcome, ScreenService, ServiceContext, ServiceError,
};
use crate::wire::serialize::to_wire;
use crate::wire::wire_model::{ChangeSet, EventParams};

pub const CONTEXT: &str = "inbox";

#[derive(Debug, Clone)]
pub struct Message {
    pub from: String,
    pub subject: String,
}

impl Message {
    fn new(from: &str, subject: &str) -> Self {
        Message {
            from: from.to_string(),
            subject: subject.to_string(),
        }
    }
}

/// Demo inbox screen: a message table plus a toolbar. The compose button
/// opens a modal built by the compose service, with events routed back
/// here through the caller reference.
#[derive(Debug)]
pub struct InboxService {
    messages: Vec<Message>,
}

impl InboxService {
    pub fn new() -> Self {
        InboxService {
            messages: vec![
                Message::new("ana", "Quarterly numbers"),
                Message::new("sam", "Lunch on Friday?"),
                Message::new("ops", "Deploy window moved"),
            ],
        }
    }

    fn ui_tree(&self, ctx: &ServiceContext) -> Result<UiTree, ProtocolError> {
        let mut ui = TreeBuilder::new(ctx.registry, CONTEXT, ctx.scope)?;

        let root = ui
            .container()
            .named("inbox")
            .layout(Layout::Column)
            .attach_root()?;

        ui.label(format!("Inbox ({} messages)", self.messages.len()))
            .named("title")
            .attach(root)?;

        let mut table = ui.table(["From", "Subject"]).named("messages");
        for message in &self.messages {
            table = table.row([message.from.clone(), message.subject.clone()]);
        }
        table.attach(root)?;

        let toolbar = ui
            .container()
            .named("toolbar")
            .layout(Layout::Row)
            .attach(root)?;

        ui.button("Refresh")
            .action(ActionBinding::new("refresh"))
            .attach(toolbar)?;
        ui.button("Compose")
            .action(ActionBinding::new("compose"))
            .attach(toolbar)?;

        ui.build()
    }

    /// The compose dialog opens one scope deeper, so its IDs never
    /// collide with a dialog already on screen.
    fn dialog_scope(ctx: &ServiceContext) -> u8 {
        ctx.scope.wrapping_add(1)
    }
}

impl Default for InboxService {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenService for InboxService {
    fn context_name(&self) -> &'static str {
        CONTEXT
    }

    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError> {
        self.ui_tree(ctx).map_err(Into::into)
    }

    fn handle(
        &mut self,
        ctx: &ServiceContext,
        method: &str,
        params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError> {
        match method {
            "onRefresh" => {
                self.messages.push(Message::new("system", "Welcome back"));
                Ok(MethodOutcome::Done)
            }

            "onCompose" => {
                let caller = ctx.reference(CONTEXT)?;
                let dialog =
                    compose::build_dialog(ctx.registry, Self::dialog_scope(ctx), Some(caller))?;
                let wire = to_wire(&dialog)?;
                Ok(MethodOutcome::Changes(ChangeSet::from_tree(&wire)))
            }

            "onSendCompose" => {
                let before = to_wire(&self.ui_tree(ctx)?)?;

                let recipient = params
                    .get("to")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                let body = params.get("body").and_then(Value::as_str).unwrap_or("");
                self.messages
                    .push(Message::new(recipient, &format!("Sent: {}", body)));

                let after = to_wire(&self.ui_tree(ctx)?)?;
                let mut changes = diff_trees(&before, &after).changes;

                // The dialog closes along with the update; its IDs rebuild
                // deterministically from the same scope.
                let dialog = compose::build_dialog(ctx.registry, Self::dialog_scope(ctx), None)?;
                for id in to_wire(&dialog)?.keys() {
                    changes.insert_removed(*id);
                }

                Ok(MethodOutcome::Changes(changes))
            }

            "onCloseCompose" => {
                let dialog = compose::build_dialog(ctx.registry, Self::dialog_scope(ctx), None)?;
                let wire = to_wire(&dialog)?;
                Ok(MethodOutcome::Changes(ChangeSet::removals(
                    wire.keys().copied(),
                )))
            }

            "onDelete" => {
                let index = params
                    .get("index")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| ServiceError::new("missing 'index' parameter"))?
                    as usize;

                if index >= self.messages.len() {
                    return Err(ServiceError::new(format!("no message at index {}", index)));
                }
                self.messages.remove(index);
                Ok(MethodOutcome::Done)
            }

            _ => Ok(MethodOutcome::NotFound),
        }
    }
}
