use crate::element::element_model::ElementId;
use crate::error::{ErrorKind, ProtocolError};
use crate::ident::registry::ServiceRegistry;
use crate::router::action::{caller_reference, method_name, strip_internal_params};
use crate::router::diff::{diff_trees, tree_digest};
use crate::service::service_model::{MethodOutcome, ScreenService, ServiceContext};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::DispatchTrace;
use crate::wire::serialize::to_wire;
use crate::wire::wire_model::{ChangeSet, EventRequest, EventResponse, WireTree};

/// Resolves inbound events to service methods and shapes the response.
/// One router serves any number of parallel dispatches; all its state is
/// the read-only registry plus configuration.
///
/// Per event: decode the routed identifier, resolve and freshly construct
/// the service, snapshot its tree, dispatch the resolved method, then
/// either relay the service's explicit change set or diff the before and
/// after snapshots. Every internal failure is converted here into the
/// stable external error shape; nothing escapes.
#[derive(Debug)]
pub struct EventRouter<'a> {
    registry: &'a ServiceRegistry,
    dev_mode: bool,
    tracer: Option<&'a TraceLogger>,
}

struct Dispatched {
    changes: ChangeSet,
    explicit: bool,
    before_digest: Option<String>,
    after_digest: Option<String>,
}

impl<'a> EventRouter<'a> {
    pub fn new(registry: &'a ServiceRegistry) -> Self {
        EventRouter {
            registry,
            dev_mode: false,
            tracer: None,
        }
    }

    /// Development mode includes internal error detail in 500-class
    /// responses.
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_tracer(mut self, tracer: &'a TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn dispatch(&self, request: &EventRequest) -> EventResponse {
        let caller = caller_reference(&request.parameters);
        if let Some(caller_id) = caller {
            log::debug!(
                "caller reference {} overrides component id {}",
                caller_id,
                request.component_id
            );
        }

        // The clicked element lives inside a dialog owned by whoever
        // opened it; the embedded caller wins over the component itself.
        let routed_id = caller.unwrap_or(request.component_id);
        let method = method_name(&request.action);
        let context = self
            .registry
            .resolve(routed_id)
            .map(|(name, _)| name)
            .unwrap_or("unknown");

        match self.run(routed_id, request, &method) {
            Ok(dispatched) => {
                log::debug!(
                    "dispatched '{}' to {}::{} ({} entries)",
                    request.action,
                    context,
                    method,
                    dispatched.changes.len()
                );
                self.trace(
                    DispatchTrace::now(context, &request.action, &method)
                        .with_outcome(if dispatched.explicit {
                            "explicit"
                        } else {
                            "auto_diff"
                        })
                        .with_changes(&dispatched.changes)
                        .with_digests(dispatched.before_digest, dispatched.after_digest),
                );
                EventResponse::Changes(dispatched.changes)
            }
            Err(error) => self.fail(context, request, &method, error),
        }
    }

    fn run(
        &self,
        routed_id: ElementId,
        request: &EventRequest,
        method: &str,
    ) -> Result<Dispatched, ProtocolError> {
        let (context, sid) = self.registry.resolve(routed_id)?;
        let mut service = self.registry.instantiate(context).ok_or_else(|| {
            ProtocolError::UnknownContextName {
                name: context.to_string(),
            }
        })?;
        let ctx = ServiceContext::new(self.registry, sid.scope);

        // Pre-invocation snapshot, when the tree is reconstructable.
        let before = match service.build_ui(&ctx) {
            Ok(tree) => Some(to_wire(&tree)?),
            Err(e) => {
                log::warn!("pre-dispatch snapshot unavailable for '{}': {}", context, e);
                None
            }
        };

        let params = strip_internal_params(&request.parameters);
        let outcome =
            service
                .handle(&ctx, method, &params)
                .map_err(|source| ProtocolError::Service {
                    context: context.to_string(),
                    action: request.action.clone(),
                    source,
                })?;

        match outcome {
            MethodOutcome::NotFound => Err(ProtocolError::UnknownAction {
                context: context.to_string(),
                action: request.action.clone(),
                method: method.to_string(),
            }),

            // An explicit change set is used verbatim, never merged with
            // auto-detected changes.
            MethodOutcome::Changes(changes) => Ok(Dispatched {
                before_digest: before.as_ref().and_then(tree_digest),
                after_digest: None,
                explicit: true,
                changes,
            }),

            MethodOutcome::Done => {
                service.clear_stored_ui();
                let after_tree =
                    service
                        .build_ui(&ctx)
                        .map_err(|source| ProtocolError::Service {
                            context: context.to_string(),
                            action: request.action.clone(),
                            source,
                        })?;
                let after = to_wire(&after_tree)?;

                let empty = WireTree::new();
                let diff = diff_trees(before.as_ref().unwrap_or(&empty), &after);

                Ok(Dispatched {
                    before_digest: before.as_ref().and_then(tree_digest),
                    after_digest: tree_digest(&after),
                    explicit: false,
                    changes: diff.changes,
                })
            }
        }
    }

    fn fail(
        &self,
        context: &str,
        request: &EventRequest,
        method: &str,
        error: ProtocolError,
    ) -> EventResponse {
        let status = error.status();

        match error.kind() {
            ErrorKind::Routing => {
                log::warn!(
                    "routing failure for action '{}' on component {}: {}",
                    request.action,
                    request.component_id,
                    error
                );
            }
            _ => {
                log::error!(
                    "dispatch failed: context={} action={} method={} component={}: {}",
                    context,
                    request.action,
                    method,
                    request.component_id,
                    error
                );
            }
        }

        self.trace(
            DispatchTrace::now(context, &request.action, method)
                .with_outcome("error")
                .with_error(&error),
        );

        // Routing and malformed-input failures are client-visible as-is;
        // internal detail is gated on development mode.
        let message = if status < 500 || self.dev_mode {
            error.to_string()
        } else {
            "internal error".to_string()
        };

        EventResponse::error(status, message)
    }

    fn trace(&self, event: DispatchTrace) {
        if let Some(tracer) = self.tracer {
            tracer.log(&event);
        }
    }
}
