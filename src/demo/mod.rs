pub mod compose;
pub mod inbox;

use crate::error::ProtocolError;
use crate::ident::registry::{RegistryBuilder, ServiceRegistry};

/// Registry wiring for the bundled demo screens. Registration order is
/// part of the wire contract: it fixes each context's index.
pub fn demo_registry() -> Result<ServiceRegistry, ProtocolError> {
    RegistryBuilder::new()
        .register(inbox::CONTEXT, || Box::new(inbox::InboxService::new()))
        .register(compose::CONTEXT, || Box::new(compose::ComposeDialog))
        .build()
}
