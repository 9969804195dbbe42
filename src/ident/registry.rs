use std::collections::HashMap;

use crate::element::element_model::ElementId;
use crate::error::ProtocolError;
use crate::ident::codec::{self, ServiceId};
use crate::service::service_model::ScreenService;

pub type ServiceFactory = fn() -> Box<dyn ScreenService>;

/// Process-wide table of known service contexts. Built once at startup,
/// read-only afterwards: safe to share across request workers without
/// locking. The context index is what the identifier codec embeds in
/// every element ID.
#[derive(Debug)]
pub struct ServiceRegistry {
    names: Vec<&'static str>,
    indexes: HashMap<&'static str, u16>,
    factories: HashMap<&'static str, ServiceFactory>,
}

impl ServiceRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn context_index(&self, name: &str) -> Option<u16> {
        self.indexes.get(name).copied()
    }

    pub fn context_name(&self, index: u16) -> Option<&'static str> {
        self.names.get(usize::from(index)).copied()
    }

    /// Decodes an element ID back to its owning context. An index that
    /// matches no registered service is a routing failure, never fatal.
    pub fn resolve(&self, raw: ElementId) -> Result<(&'static str, ServiceId), ProtocolError> {
        let sid = codec::unpack(raw)?;
        let name = self
            .context_name(sid.context)
            .ok_or(ProtocolError::UnknownContext { index: sid.context })?;
        Ok((name, sid))
    }

    /// Constructs a fresh service instance. Services hold no state across
    /// requests; one instance never serves two dispatches.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn ScreenService>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contexts(&self) -> impl Iterator<Item = (u16, &'static str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (i as u16, *name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collects `(context name, factory)` pairs before the registry is frozen.
/// Registration order fixes each context's index, so the list must be
/// stable across processes for IDs to route consistently.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<(&'static str, ServiceFactory)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder {
            entries: Vec::new(),
        }
    }

    pub fn register(mut self, name: &'static str, factory: ServiceFactory) -> Self {
        self.entries.push((name, factory));
        self
    }

    pub fn build(self) -> Result<ServiceRegistry, ProtocolError> {
        let max_contexts = 1u64 << codec::CONTEXT_BITS;
        if self.entries.len() as u64 > max_contexts {
            return Err(ProtocolError::FieldRange {
                field: "context",
                value: self.entries.len() as u64,
                max: max_contexts - 1,
            });
        }

        let mut names = Vec::with_capacity(self.entries.len());
        let mut indexes = HashMap::new();
        let mut factories = HashMap::new();

        for (name, factory) in self.entries {
            if indexes.contains_key(name) {
                return Err(ProtocolError::DuplicateContext {
                    name: name.to_string(),
                });
            }
            indexes.insert(name, names.len() as u16);
            names.push(name);
            factories.insert(name, factory);
        }

        Ok(ServiceRegistry {
            names,
            indexes,
            factories,
        })
    }
}
