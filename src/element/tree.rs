use std::collections::BTreeMap;

use crate::element::element_model::{Element, ElementId, ElementKind, ParentRef};
use crate::error::ProtocolError;

/// Arena of elements indexed by ID. Parent/child links are ID references
/// into the arena, never owning pointers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiTree {
    elements: BTreeMap<ElementId, Element>,
}

impl UiTree {
    pub fn new() -> Self {
        UiTree {
            elements: BTreeMap::new(),
        }
    }

    /// Inserts an element. Two elements with the same ID in one tree is a
    /// programming error, not a recoverable condition.
    ///
    /// # Panics
    ///
    /// Panics if the ID is already present.
    pub fn insert(&mut self, element: Element) {
        let id = element.id;
        if self.elements.insert(id, element).is_some() {
            panic!("duplicate element id {} inserted into tree", id);
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.elements.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    /// Semantic lookup by display name.
    pub fn find_named(&self, name: &str) -> Option<&Element> {
        self.elements
            .values()
            .find(|el| el.name.as_deref() == Some(name))
    }

    /// Attaches `child` to `parent`, keeping the container's child list and
    /// the child's parent link consistent. A child already owned by another
    /// container, or listed twice, is a structural conflict; the parent
    /// graph stays a forest.
    pub fn connect_child(
        &mut self,
        parent: ElementId,
        child: ElementId,
    ) -> Result<(), ProtocolError> {
        match self.elements.get(&parent) {
            None => {
                return Err(ProtocolError::DanglingParent {
                    element: child,
                    parent,
                });
            }
            Some(el) if !el.kind.is_container() => {
                return Err(ProtocolError::NotAContainer { parent });
            }
            Some(el) => {
                if let ElementKind::Container { children, .. } = &el.kind {
                    if children.contains(&child) {
                        return Err(ProtocolError::ChildConflict { parent, child });
                    }
                }
            }
        }

        match self.elements.get(&child) {
            None => return Err(ProtocolError::DanglingChild { parent, child }),
            Some(el) => match &el.parent {
                Some(ParentRef::Element(p)) if *p != parent => {
                    return Err(ProtocolError::ChildConflict { parent, child });
                }
                Some(ParentRef::Anchor(_)) => {
                    return Err(ProtocolError::ChildConflict { parent, child });
                }
                _ => {}
            },
        }

        if let Some(el) = self.elements.get_mut(&parent) {
            if let ElementKind::Container { children, .. } = &mut el.kind {
                children.push(child);
            }
        }
        if let Some(el) = self.elements.get_mut(&child) {
            el.parent = Some(ParentRef::Element(parent));
        }

        Ok(())
    }

    /// Runs every element's finalization hook. Called once all connections
    /// exist (third deserialization pass, or at the end of a build).
    pub fn post_connect(&mut self) {
        let ids: Vec<ElementId> = self.elements.keys().copied().collect();
        for id in ids {
            if let Some(el) = self.elements.get_mut(&id) {
                el.post_connect();
            }
        }
    }
}
