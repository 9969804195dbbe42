use std::fmt;

use crate::element::element_model::ElementId;
use crate::service::service_model::ServiceError;

/// Broad failure classes the router maps onto response statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown handler context or action: 404-class, never fatal.
    Routing,
    /// Malformed tree or identifier: aborts the operation.
    Structural,
    /// A screen service raised an error during dispatch.
    Service,
}

#[derive(Debug)]
pub enum ProtocolError {
    /// Decoded context index matches no registered service
    UnknownContext { index: u16 },

    /// Context name not present in the registry
    UnknownContextName { name: String },

    /// Action token resolved to a method the service does not implement
    UnknownAction {
        context: String,
        action: String,
        method: String,
    },

    /// Two contexts registered under the same name
    DuplicateContext { name: String },

    /// Identifier component does not fit its bit range
    FieldRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// Element references a parent ID absent from the tree
    DanglingParent { element: ElementId, parent: ElementId },

    /// Container lists a child ID absent from the tree
    DanglingChild { parent: ElementId, child: ElementId },

    /// Child claimed by more than one container, or parent links disagree
    ChildConflict { parent: ElementId, child: ElementId },

    /// Child attached to an element that is not a container
    NotAContainer { parent: ElementId },

    /// Parent chain loops back on itself; the tree must stay a forest
    CyclicTree { element: ElementId },

    /// Symbolic parent is not a well-known anchor
    UnknownAnchor { anchor: String },

    /// Builder option applied to an element type that does not support it
    BadOption {
        element: &'static str,
        option: &'static str,
    },

    /// Inbound JSON did not match the wire shape
    MalformedPayload {
        context: String,
        source: serde_json::Error,
    },

    /// Error raised inside a service's action method
    Service {
        context: String,
        action: String,
        source: ServiceError,
    },
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::UnknownContext { .. }
            | ProtocolError::UnknownContextName { .. }
            | ProtocolError::UnknownAction { .. } => ErrorKind::Routing,

            ProtocolError::DuplicateContext { .. }
            | ProtocolError::FieldRange { .. }
            | ProtocolError::DanglingParent { .. }
            | ProtocolError::DanglingChild { .. }
            | ProtocolError::ChildConflict { .. }
            | ProtocolError::NotAContainer { .. }
            | ProtocolError::CyclicTree { .. }
            | ProtocolError::UnknownAnchor { .. }
            | ProtocolError::BadOption { .. }
            | ProtocolError::MalformedPayload { .. } => ErrorKind::Structural,

            ProtocolError::Service { .. } => ErrorKind::Service,
        }
    }

    /// HTTP-class status for the external error shape. Routing failures are
    /// 404, client-originated structural corruption is 400, everything else
    /// is an internal 500.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Routing => 404,
            ErrorKind::Structural => match self {
                ProtocolError::MalformedPayload { .. } | ProtocolError::CyclicTree { .. } => 400,
                _ => 500,
            },
            ErrorKind::Service => 500,
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownContext { index } => {
                write!(f, "no service registered for context index {}", index)
            }
            ProtocolError::UnknownContextName { name } => {
                write!(f, "unknown service context '{}'", name)
            }
            ProtocolError::UnknownAction {
                context,
                action,
                method,
            } => {
                write!(
                    f,
                    "service '{}' has no method '{}' for action '{}'",
                    context, method, action
                )
            }
            ProtocolError::DuplicateContext { name } => {
                write!(f, "context '{}' registered twice", name)
            }
            ProtocolError::FieldRange { field, value, max } => {
                write!(f, "identifier {} {} exceeds maximum {}", field, value, max)
            }
            ProtocolError::DanglingParent { element, parent } => {
                write!(f, "element {} references missing parent {}", element, parent)
            }
            ProtocolError::DanglingChild { parent, child } => {
                write!(f, "container {} lists missing child {}", parent, child)
            }
            ProtocolError::ChildConflict { parent, child } => {
                write!(
                    f,
                    "child {} cannot be attached to container {}: already owned elsewhere",
                    child, parent
                )
            }
            ProtocolError::NotAContainer { parent } => {
                write!(f, "element {} cannot take children: not a container", parent)
            }
            ProtocolError::CyclicTree { element } => {
                write!(f, "parent chain of element {} forms a cycle", element)
            }
            ProtocolError::UnknownAnchor { anchor } => {
                write!(f, "'{}' is not a well-known anchor", anchor)
            }
            ProtocolError::BadOption { element, option } => {
                write!(f, "option '{}' does not apply to a {}", option, element)
            }
            ProtocolError::MalformedPayload { context, source } => {
                write!(f, "malformed payload ({}): {}", context, source)
            }
            ProtocolError::Service {
                context,
                action,
                source,
            } => {
                write!(
                    f,
                    "service '{}' failed handling action '{}': {}",
                    context, action, source
                )
            }
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::MalformedPayload { source, .. } => Some(source),
            ProtocolError::Service { source, .. } => Some(source),
            _ => None,
        }
    }
}
