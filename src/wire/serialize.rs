use crate::element::element_model::{ElementKind, KNOWN_ANCHORS, ParentRef};
use crate::element::tree::UiTree;
use crate::error::ProtocolError;
use crate::wire::wire_model::{WireElement, WireTree};

/// Flattens a tree into its ID-to-payload exchange form. Parent and child
/// references are validated here: a link to an ID outside the tree, or an
/// anchor nobody knows, aborts the whole serialization.
pub fn to_wire(tree: &UiTree) -> Result<WireTree, ProtocolError> {
    let mut wire = WireTree::new();

    for (id, element) in tree.iter() {
        match &element.parent {
            Some(ParentRef::Element(parent)) if !tree.contains(*parent) => {
                return Err(ProtocolError::DanglingParent {
                    element: *id,
                    parent: *parent,
                });
            }
            Some(ParentRef::Anchor(anchor)) if !KNOWN_ANCHORS.contains(&anchor.as_str()) => {
                return Err(ProtocolError::UnknownAnchor {
                    anchor: anchor.clone(),
                });
            }
            _ => {}
        }

        if let ElementKind::Container { children, .. } = &element.kind {
            for child in children {
                if !tree.contains(*child) {
                    return Err(ProtocolError::DanglingChild {
                        parent: *id,
                        child: *child,
                    });
                }
            }
        }

        wire.insert(
            *id,
            WireElement {
                kind: element.kind.clone(),
                parent: element.parent.clone(),
                visible: element.visible,
                name: element.name.clone(),
            },
        );
    }

    Ok(wire)
}

/// Exchange form as a JSON value, for response bodies and fixtures.
pub fn to_json(tree: &UiTree) -> Result<serde_json::Value, ProtocolError> {
    let wire = to_wire(tree)?;
    serde_json::to_value(&wire).map_err(|source| ProtocolError::MalformedPayload {
        context: "serializing tree".to_string(),
        source,
    })
}
