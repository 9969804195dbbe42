use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque element identifier. Encodes owning context, instance scope and
/// ordinal; see `ident::codec`.
pub type ElementId = u64;

/// Well-known symbolic parent for modal dialogs.
pub const MODAL_ANCHOR: &str = "modal";

/// Symbolic parents the serializer accepts.
pub const KNOWN_ANCHORS: &[&str] = &[MODAL_ANCHOR];

/// Parent link of an element: another element by ID, or a well-known
/// symbolic anchor such as the modal overlay root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Element(ElementId),
    Anchor(String),
}

/// Action attached to an interactive element. The client echoes `action`
/// and `params` back verbatim on interaction; `caller` carries the
/// identifier of the service that opened the enclosing dialog, when that
/// differs from the one that built it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub action: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<ElementId>,
}

impl ActionBinding {
    pub fn new(action: impl Into<String>) -> Self {
        ActionBinding {
            action: action.into(),
            params: BTreeMap::new(),
            caller: None,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn caller(mut self, id: ElementId) -> Self {
        self.caller = Some(id);
        self
    }
}

/// Layout directions a container can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Column,
    Row,
}

/// Type tag plus type-specific configuration. The closed variant set of
/// the element model; containers own their child order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Container {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<ElementId>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<Layout>,
    },

    Label {
        text: String,
    },

    Button {
        text: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<ActionBinding>,
    },

    Input {
        #[serde(default)]
        value: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,

        /// Submit binding, echoed like a button action
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<ActionBinding>,
    },

    Checkbox {
        label: String,

        #[serde(default)]
        checked: bool,
    },

    Table {
        columns: Vec<String>,

        #[serde(default)]
        rows: Vec<Vec<String>>,

        /// Display widths derived from headers and cells after the tree is
        /// fully connected
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        column_widths: Vec<usize>,
    },
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Container { .. } => "container",
            ElementKind::Label { .. } => "label",
            ElementKind::Button { .. } => "button",
            ElementKind::Input { .. } => "input",
            ElementKind::Checkbox { .. } => "checkbox",
            ElementKind::Table { .. } => "table",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ElementKind::Container { .. })
    }
}

/// A node in the UI tree. Immutable snapshot once serialized; a new tree
/// is produced for the next event rather than mutating this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,

    /// Optional display name for semantic lookup
    pub name: Option<String>,

    pub visible: bool,

    pub parent: Option<ParentRef>,

    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Element {
            id,
            name: None,
            visible: true,
            parent: None,
            kind,
        }
    }

    /// Finalization hook run after all parent/child connections exist.
    /// Tables derive per-column display widths here.
    pub fn post_connect(&mut self) {
        if let ElementKind::Table {
            columns,
            rows,
            column_widths,
        } = &mut self.kind
        {
            *column_widths = columns
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    rows.iter()
                        .filter_map(|row| row.get(col))
                        .map(|cell| cell.chars().count())
                        .fold(header.chars().count(), usize::max)
                })
                .collect();
        }
    }
}
