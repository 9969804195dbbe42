use crate::element::element_model::{
    ActionBinding, Element, ElementId, ElementKind, KNOWN_ANCHORS, Layout, ParentRef,
};
use crate::element::tree::UiTree;
use crate::error::ProtocolError;
use crate::ident::codec::{self, ServiceId};
use crate::ident::registry::ServiceRegistry;

/// Assembles one service invocation's tree without the caller managing
/// IDs or parent wiring by hand. The builder owns the ordinal counter;
/// creating elements here is the only place it advances, so identical
/// build sequences always yield identical IDs.
#[derive(Debug)]
pub struct TreeBuilder {
    context: u16,
    scope: u8,
    next_ordinal: u32,
    tree: UiTree,
}

impl TreeBuilder {
    /// Starts a build scoped to one registered context and instance scope.
    pub fn new(
        registry: &ServiceRegistry,
        context: &str,
        scope: u8,
    ) -> Result<Self, ProtocolError> {
        let index = registry
            .context_index(context)
            .ok_or_else(|| ProtocolError::UnknownContextName {
                name: context.to_string(),
            })?;

        Ok(TreeBuilder {
            context: index,
            scope,
            next_ordinal: 0,
            tree: UiTree::new(),
        })
    }

    fn allocate(&mut self) -> Result<ElementId, ProtocolError> {
        let id = codec::pack(ServiceId {
            context: self.context,
            scope: self.scope,
            ordinal: self.next_ordinal,
        })?;
        self.next_ordinal += 1;
        Ok(id)
    }

    pub fn container(&mut self) -> ElementBuilder<'_> {
        ElementBuilder::new(
            self,
            ElementKind::Container {
                children: Vec::new(),
                layout: None,
            },
        )
    }

    pub fn label(&mut self, text: impl Into<String>) -> ElementBuilder<'_> {
        ElementBuilder::new(self, ElementKind::Label { text: text.into() })
    }

    pub fn button(&mut self, text: impl Into<String>) -> ElementBuilder<'_> {
        ElementBuilder::new(
            self,
            ElementKind::Button {
                text: text.into(),
                action: None,
            },
        )
    }

    pub fn input(&mut self) -> ElementBuilder<'_> {
        ElementBuilder::new(
            self,
            ElementKind::Input {
                value: String::new(),
                placeholder: None,
                action: None,
            },
        )
    }

    pub fn checkbox(&mut self, label: impl Into<String>) -> ElementBuilder<'_> {
        ElementBuilder::new(
            self,
            ElementKind::Checkbox {
                label: label.into(),
                checked: false,
            },
        )
    }

    pub fn table<I, S>(&mut self, columns: I) -> ElementBuilder<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ElementBuilder::new(
            self,
            ElementKind::Table {
                columns: columns.into_iter().map(Into::into).collect(),
                rows: Vec::new(),
                column_widths: Vec::new(),
            },
        )
    }

    /// Finalizes the build: derived state is computed and the finished
    /// tree handed over. Parent links were validated as elements attached.
    pub fn build(mut self) -> Result<UiTree, ProtocolError> {
        self.tree.post_connect();
        Ok(self.tree)
    }
}

/// One element mid-configuration. Option setters apply to the element
/// types that support them; a mismatched option surfaces as an error when
/// the element attaches.
#[derive(Debug)]
pub struct ElementBuilder<'b> {
    owner: &'b mut TreeBuilder,
    name: Option<String>,
    visible: bool,
    kind: ElementKind,
    error: Option<ProtocolError>,
}

impl<'b> ElementBuilder<'b> {
    fn new(owner: &'b mut TreeBuilder, kind: ElementKind) -> Self {
        ElementBuilder {
            owner,
            name: None,
            visible: true,
            kind,
            error: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn action(mut self, binding: ActionBinding) -> Self {
        if let ElementKind::Button { action, .. } | ElementKind::Input { action, .. } =
            &mut self.kind
        {
            *action = Some(binding);
        } else {
            self.reject("action");
        }
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        if let ElementKind::Input { value: v, .. } = &mut self.kind {
            *v = value.into();
        } else {
            self.reject("value");
        }
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        if let ElementKind::Input { placeholder: p, .. } = &mut self.kind {
            *p = Some(placeholder.into());
        } else {
            self.reject("placeholder");
        }
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        if let ElementKind::Checkbox { checked: c, .. } = &mut self.kind {
            *c = checked;
        } else {
            self.reject("checked");
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ElementKind::Table { rows, .. } = &mut self.kind {
            rows.push(cells.into_iter().map(Into::into).collect());
        } else {
            self.reject("row");
        }
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        if let ElementKind::Container { layout: l, .. } = &mut self.kind {
            *l = Some(layout);
        } else {
            self.reject("layout");
        }
        self
    }

    fn reject(&mut self, option: &'static str) {
        if self.error.is_none() {
            self.error = Some(ProtocolError::BadOption {
                element: self.kind.type_name(),
                option,
            });
        }
    }

    /// Attaches under an existing container and returns the new ID.
    pub fn attach(self, parent: ElementId) -> Result<ElementId, ProtocolError> {
        self.finish(Some(ParentRef::Element(parent)))
    }

    /// Attaches as a root element (no parent).
    pub fn attach_root(self) -> Result<ElementId, ProtocolError> {
        self.finish(None)
    }

    /// Attaches under a well-known symbolic anchor such as `"modal"`.
    pub fn attach_anchor(self, anchor: &str) -> Result<ElementId, ProtocolError> {
        if !KNOWN_ANCHORS.contains(&anchor) {
            return Err(ProtocolError::UnknownAnchor {
                anchor: anchor.to_string(),
            });
        }
        self.finish(Some(ParentRef::Anchor(anchor.to_string())))
    }

    fn finish(self, parent: Option<ParentRef>) -> Result<ElementId, ProtocolError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let id = self.owner.allocate()?;
        let mut element = Element::new(id, self.kind);
        element.name = self.name;
        element.visible = self.visible;
        self.owner.tree.insert(element);

        match parent {
            // connect_child validates the container and sets the parent link
            Some(ParentRef::Element(parent_id)) => {
                self.owner.tree.connect_child(parent_id, id)?;
            }
            other => {
                if let Some(el) = self.owner.tree.get_mut(id) {
                    el.parent = other;
                }
            }
        }

        Ok(id)
    }
}
