use screenwire::builder::tree_builder::TreeBuilder;
use screenwire::element::element_model::{ActionBinding, ElementId, Layout, MODAL_ANCHOR};
use screenwire::element::tree::UiTree;
use screenwire::ident::codec::{self, ServiceId};
use screenwire::ident::registry::{RegistryBuilder, ServiceRegistry};
use screenwire::service::service_model::{
    MethodOutcome, ScreenService, ServiceContext, ServiceError,
};
use screenwire::wire::wire_model::{ChangeSet, EventParams};

pub const OPENER: &str = "opener";
pub const DIALOG: &str = "dialog";
pub const COUNTER: &str = "counter";
pub const BROKEN: &str = "broken";

/// Sentinel IDs in explicit change sets, used to tell which service's
/// method actually ran.
pub const OPENER_MARKER: ElementId = 999;
pub const DIALOG_MARKER: ElementId = 111;

/// Screen that opens dialogs. Its `onCloseModal` removes the opener
/// marker, so a response containing it proves the caller reference routed
/// here.
pub struct OpenerService;

impl ScreenService for OpenerService {
    fn context_name(&self) -> &'static str {
        OPENER
    }

    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError> {
        let mut ui = TreeBuilder::new(ctx.registry, OPENER, ctx.scope)?;
        let root = ui.container().named("opener").attach_root()?;
        ui.label("Opener screen").attach(root)?;
        Ok(ui.build()?)
    }

    fn handle(
        &mut self,
        _ctx: &ServiceContext,
        method: &str,
        _params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError> {
        match method {
            "onCloseModal" => Ok(MethodOutcome::Changes(ChangeSet::removals([OPENER_MARKER]))),
            "onPing" => Ok(MethodOutcome::Done),
            _ => Ok(MethodOutcome::NotFound),
        }
    }
}

/// Dialog builder whose own `onCloseModal` must lose to the caller's.
pub struct DialogService;

impl ScreenService for DialogService {
    fn context_name(&self) -> &'static str {
        DIALOG
    }

    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError> {
        let mut ui = TreeBuilder::new(ctx.registry, DIALOG, ctx.scope)?;
        let panel = ui
            .container()
            .named("dialog")
            .layout(Layout::Column)
            .attach_anchor(MODAL_ANCHOR)?;
        ui.button("Close")
            .action(ActionBinding::new("close_modal"))
            .attach(panel)?;
        Ok(ui.build()?)
    }

    fn handle(
        &mut self,
        _ctx: &ServiceContext,
        method: &str,
        _params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError> {
        match method {
            "onCloseModal" => Ok(MethodOutcome::Changes(ChangeSet::removals([DIALOG_MARKER]))),
            _ => Ok(MethodOutcome::NotFound),
        }
    }
}

/// Screen with one mutable value; exercises the auto-diff path.
pub struct CounterService {
    count: u32,
}

impl CounterService {
    pub fn new() -> Self {
        CounterService { count: 0 }
    }
}

impl ScreenService for CounterService {
    fn context_name(&self) -> &'static str {
        COUNTER
    }

    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError> {
        let mut ui = TreeBuilder::new(ctx.registry, COUNTER, ctx.scope)?;
        let root = ui.container().named("counter").attach_root()?;
        ui.label(format!("Count: {}", self.count))
            .named("count")
            .attach(root)?;
        ui.label("A static sibling").named("static").attach(root)?;
        ui.button("+")
            .action(ActionBinding::new("increment"))
            .attach(root)?;
        Ok(ui.build()?)
    }

    fn handle(
        &mut self,
        _ctx: &ServiceContext,
        method: &str,
        _params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError> {
        match method {
            "onIncrement" => {
                self.count += 1;
                Ok(MethodOutcome::Done)
            }
            _ => Ok(MethodOutcome::NotFound),
        }
    }
}

/// Service for failure-path tests: `onExplode` raises, `onInspect`
/// rejects any routing-internal parameter that leaked through.
pub struct BrokenService;

impl ScreenService for BrokenService {
    fn context_name(&self) -> &'static str {
        BROKEN
    }

    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError> {
        let mut ui = TreeBuilder::new(ctx.registry, BROKEN, ctx.scope)?;
        ui.container().named("broken").attach_root()?;
        Ok(ui.build()?)
    }

    fn handle(
        &mut self,
        _ctx: &ServiceContext,
        method: &str,
        params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError> {
        match method {
            "onExplode" => Err(ServiceError::new("boom")),
            "onInspect" => {
                if params.keys().any(|k| k.starts_with('_')) {
                    return Err(ServiceError::new("internal parameter leaked"));
                }
                if params.get("plain").and_then(|v| v.as_str()) != Some("yes") {
                    return Err(ServiceError::new("expected plain=yes"));
                }
                Ok(MethodOutcome::Done)
            }
            _ => Ok(MethodOutcome::NotFound),
        }
    }
}

pub fn test_registry() -> ServiceRegistry {
    RegistryBuilder::new()
        .register(OPENER, || Box::new(OpenerService))
        .register(DIALOG, || Box::new(DialogService))
        .register(COUNTER, || Box::new(CounterService::new()))
        .register(BROKEN, || Box::new(BrokenService))
        .build()
        .expect("test registry")
}

/// Identifier owned by `context` at the given scope and ordinal.
pub fn id_for(registry: &ServiceRegistry, context: &str, scope: u8, ordinal: u32) -> ElementId {
    codec::pack(ServiceId {
        context: registry.context_index(context).expect("registered context"),
        scope,
        ordinal,
    })
    .expect("packable id")
}
