use crate::builder::tree_builder::TreeBuilder;
use crate::element::element_model::{ActionBinding, ElementId, Layout, MODAL_ANCHOR};
use crate::element::tree::UiTree;
use crate::error::ProtocolError;
use crate::ident::registry::ServiceRegistry;
use crate::service::service_model::{
    MethodOutcome, ScreenService, ServiceContext, ServiceError,
};
use crate::wire::wire_model::EventParams;

pub const CONTEXT: &str = "compose";

/// Builds the compose dialog under the modal anchor. The dialog's buttons
/// carry `caller` so their events route to the service that opened it,
/// not to this builder.
pub fn build_dialog(
    registry: &ServiceRegistry,
    scope: u8,
    caller: Option<ElementId>,
) -> Result<UiTree, ProtocolError> {
    let mut ui = TreeBuilder::new(registry, CONTEXT, scope)?;

    let panel = ui
        .container()
        .named("compose")
        .layout(Layout::Column)
        .attach_anchor(MODAL_ANCHOR)?;

    ui.label("New message").named("title").attach(panel)?;
    ui.input()
        .named("to")
        .placeholder("Recipient")
        .attach(panel)?;
    ui.input()
        .named("body")
        .placeholder("Write something")
        .attach(panel)?;

    let buttons = ui
        .container()
        .named("buttons")
        .layout(Layout::Row)
        .attach(panel)?;

    let mut send = ActionBinding::new("send_compose");
    let mut cancel = ActionBinding::new("close_compose");
    if let Some(caller_id) = caller {
        send = send.caller(caller_id);
        cancel = cancel.caller(caller_id);
    }

    ui.button("Send").action(send).attach(buttons)?;
    ui.button("Cancel").action(cancel).attach(buttons)?;

    ui.build()
}

/// Dialog-builder service. It owns no button logic: every interaction
/// inside the dialog routes back to the opener via the caller reference.
#[derive(Debug)]
pub struct ComposeDialog;

impl ScreenService for ComposeDialog {
    fn context_name(&self) -> &'static str {
        CONTEXT
    }

    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError> {
        build_dialog(ctx.registry, ctx.scope, None).map_err(Into::into)
    }

    fn handle(
        &mut self,
        _ctx: &ServiceContext,
        _method: &str,
        _params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError> {
        Ok(MethodOutcome::NotFound)
    }
}
