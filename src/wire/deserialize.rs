use std::mem;

use crate::element::element_model::{Element, ElementId, ElementKind, ParentRef};
use crate::element::tree::UiTree;
use crate::error::ProtocolError;
use crate::wire::wire_model::WireTree;

/// Reconstructs a tree from its exchange form.
///
/// The mapping is flat and entries may reference entries that appear later
/// (a container's children can precede it), so reconstruction runs in
/// passes:
///
/// 1. construct every element in isolation from its own payload, ignoring
///    relationships; the constructed set is the pass-1 index, a local
///    structure handed to pass 2;
/// 2. resolve declared parent/child references against that index and
///    connect children in declared order;
/// 3. run each element's post-connect hook once all links exist.
///
/// A reference to a missing ID aborts the whole tree. No partial trees.
pub fn from_wire(wire: &WireTree) -> Result<UiTree, ProtocolError> {
    let mut tree = UiTree::new();
    let mut declared: Vec<(ElementId, Vec<ElementId>)> = Vec::new();

    // Pass 1: isolated construction. Containers start childless; their
    // declared lists are connected in pass 2.
    for (id, payload) in wire {
        let mut kind = payload.kind.clone();
        if let ElementKind::Container { children, .. } = &mut kind {
            declared.push((*id, mem::take(children)));
        }

        tree.insert(Element {
            id: *id,
            name: payload.name.clone(),
            visible: payload.visible,
            parent: payload.parent.clone(),
            kind,
        });
    }

    // Pass 2: wire relationships against the pass-1 index.
    for (id, payload) in wire {
        if let Some(ParentRef::Element(parent)) = &payload.parent {
            if !tree.contains(*parent) {
                return Err(ProtocolError::DanglingParent {
                    element: *id,
                    parent: *parent,
                });
            }
        }
    }

    for (parent, children) in &declared {
        for child in children {
            tree.connect_child(*parent, *child)?;
        }
    }

    verify_acyclic(&tree)?;

    // Pass 3: derived state.
    tree.post_connect();

    Ok(tree)
}

/// The parent graph must stay a forest even when the payload came from
/// outside; a chain longer than the element count can only be a loop.
fn verify_acyclic(tree: &UiTree) -> Result<(), ProtocolError> {
    let limit = tree.len();
    for (id, _) in tree.iter() {
        let mut current = *id;
        let mut steps = 0;
        while let Some(ParentRef::Element(parent)) = tree.get(current).and_then(|el| el.parent.as_ref())
        {
            steps += 1;
            if steps > limit {
                return Err(ProtocolError::CyclicTree { element: *id });
            }
            current = *parent;
        }
    }
    Ok(())
}

/// Parses a raw JSON value into the exchange form and reconstructs the
/// tree. Shape mismatches are client-originated structural errors.
pub fn from_json(value: serde_json::Value) -> Result<UiTree, ProtocolError> {
    let wire: WireTree =
        serde_json::from_value(value).map_err(|source| ProtocolError::MalformedPayload {
            context: "parsing tree payload".to_string(),
            source,
        })?;
    from_wire(&wire)
}
