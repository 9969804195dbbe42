use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::element_model::{ElementId, ElementKind, ParentRef};

/// Parameter mapping carried on events and action bindings. Insertion
/// order is irrelevant; a sorted map keeps the encoding canonical.
pub type EventParams = BTreeMap<String, Value>;

/// Per-element JSON payload: the type tag and type-specific fields
/// (flattened from the kind), plus the common envelope. Containers carry
/// their child list in declared render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireElement {
    #[serde(flatten)]
    pub kind: ElementKind,

    /// Element ID, symbolic anchor string, or absent for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_visible() -> bool {
    true
}

/// Flat ID-to-payload mapping, the tree's exchange form. Order carries no
/// meaning beyond container child lists.
pub type WireTree = BTreeMap<ElementId, WireElement>;

/// Minimal description of one event cycle's effect: affected IDs mapped
/// to their full new payload, or to `null` (the reserved removal marker).
/// Unchanged elements never appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    pub entries: BTreeMap<ElementId, Option<WireElement>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet {
            entries: BTreeMap::new(),
        }
    }

    /// Full payload for an added or changed element.
    pub fn insert(&mut self, id: ElementId, payload: WireElement) {
        self.entries.insert(id, Some(payload));
    }

    /// Removal marker for a deleted element.
    pub fn insert_removed(&mut self, id: ElementId) {
        self.entries.insert(id, None);
    }

    /// Change set that adds every element of a tree.
    pub fn from_tree(tree: &WireTree) -> Self {
        let entries = tree
            .iter()
            .map(|(id, payload)| (*id, Some(payload.clone())))
            .collect();
        ChangeSet { entries }
    }

    /// Change set that removes every listed ID.
    pub fn removals(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let entries = ids.into_iter().map(|id| (id, None)).collect();
        ChangeSet { entries }
    }

    pub fn get(&self, id: ElementId) -> Option<&Option<WireElement>> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn removed_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_none()).count()
    }
}

/// Inbound event posted back by the client, verbatim from the rendered
/// action binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    pub component_id: ElementId,

    /// Client-side event kind ("click", "submit", ...); informational
    #[serde(default)]
    pub event: String,

    /// Action token in lowercase word-separated form
    pub action: String,

    #[serde(default)]
    pub parameters: EventParams,
}

/// Outbound dispatch result: the change set itself, or a structured error
/// body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventResponse {
    Changes(ChangeSet),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    /// HTTP-class status: 404 routing, 400 malformed input, 500 internal
    pub status: u16,

    pub message: String,
}

impl EventResponse {
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        EventResponse::Error(ErrorBody {
            error: ErrorDetail {
                status,
                message: message.into(),
            },
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EventResponse::Error(_))
    }
}
