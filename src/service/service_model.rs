use std::fmt;

use crate::element::element_model::ElementId;
use crate::element::tree::UiTree;
use crate::error::ProtocolError;
use crate::ident::codec::{self, ServiceId};
use crate::ident::registry::ServiceRegistry;
use crate::wire::wire_model::{ChangeSet, EventParams};

/// Per-dispatch context handed to a service: the shared registry plus the
/// instance scope decoded from the routed identifier. Rebuilding with the
/// same scope reproduces the same element IDs.
#[derive(Debug, Clone, Copy)]
pub struct ServiceContext<'a> {
    pub registry: &'a ServiceRegistry,
    pub scope: u8,
}

impl<'a> ServiceContext<'a> {
    pub fn new(registry: &'a ServiceRegistry, scope: u8) -> Self {
        ServiceContext { registry, scope }
    }

    /// Identifier that routes back to `context` at this instance scope.
    /// Embedded as the caller reference on dialog buttons.
    pub fn reference(&self, context: &str) -> Result<ElementId, ProtocolError> {
        let index = self
            .registry
            .context_index(context)
            .ok_or_else(|| ProtocolError::UnknownContextName {
                name: context.to_string(),
            })?;
        codec::pack(ServiceId {
            context: index,
            scope: self.scope,
            ordinal: 0,
        })
    }
}

/// What a service's action method produced.
#[derive(Debug)]
pub enum MethodOutcome {
    /// The service implements no such method; the router reports a
    /// routing error without invoking anything.
    NotFound,

    /// Method ran and mutated service state; the router diffs the
    /// before/after trees itself.
    Done,

    /// Method supplied its own change set, used verbatim. Never merged
    /// with auto-detected changes.
    Changes(ChangeSet),
}

/// Error raised inside a service's action method. Caught at the router
/// boundary; the message only reaches the client in development mode.
#[derive(Debug)]
pub struct ServiceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        ServiceError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ServiceError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<ProtocolError> for ServiceError {
    fn from(err: ProtocolError) -> Self {
        ServiceError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Contract every screen service satisfies. Instances are constructed
/// fresh per request by the registry and hold no state beyond one
/// dispatch.
pub trait ScreenService {
    /// Registry name of this service's context.
    fn context_name(&self) -> &'static str;

    /// Builds the service's current UI tree. Deterministic for identical
    /// service state and scope; the router relies on this to reconstruct
    /// the pre-dispatch snapshot.
    fn build_ui(&mut self, ctx: &ServiceContext) -> Result<UiTree, ServiceError>;

    /// Drops any cached UI so the next `build_ui` observes post-dispatch
    /// state. Default is a no-op for services that never cache.
    fn clear_stored_ui(&mut self) {}

    /// Dispatches one resolved method (`onSubmitForm` form). Implemented
    /// as an explicit match per service; unknown methods return
    /// `MethodOutcome::NotFound`.
    fn handle(
        &mut self,
        ctx: &ServiceContext,
        method: &str,
        params: &EventParams,
    ) -> Result<MethodOutcome, ServiceError>;
}
