#![forbid(unsafe_code)]

//! Scoped read-only access to the card's content.
//!
//! [`ContentView`] is only constructed by the manager and only lent to the
//! callback of [`BulletinManager::with_content_view`]. It hands out
//! [`ElementSnapshot`]s, plain values copied out of the elements, so nothing
//! read through the view can mutate the card after the callback returns.
//!
//! [`BulletinManager::with_content_view`]: crate::BulletinManager::with_content_view

use std::fmt;

use bltn_core::{ContentContainer, Element, ElementId};

/// Value copy of one element's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub label: String,
    pub is_group: bool,
    pub is_hidden: bool,
    pub alpha: f32,
    /// Snapshots of the group's children, empty for leaves.
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    fn of(element: &Element) -> Self {
        Self {
            id: element.id(),
            label: element.label().to_owned(),
            is_group: element.is_group(),
            is_hidden: element.is_hidden(),
            alpha: element.alpha(),
            children: element.children().iter().map(Self::of).collect(),
        }
    }
}

/// Read-only access to a [`ContentContainer`] for the duration of one call.
pub struct ContentView<'a> {
    container: &'a ContentContainer,
}

impl<'a> ContentView<'a> {
    pub(crate) fn new(container: &'a ContentContainer) -> Self {
        Self { container }
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn alpha(&self) -> f32 {
        self.container.alpha()
    }

    /// Top-level elements in order.
    pub fn snapshots(&self) -> Vec<ElementSnapshot> {
        self.container
            .elements()
            .iter()
            .map(ElementSnapshot::of)
            .collect()
    }

    pub fn first(&self) -> Option<ElementSnapshot> {
        self.container.first().as_ref().map(ElementSnapshot::of)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.container.elements().iter().any(|e| e.id() == id)
    }

    /// Labels of the top-level elements, in order.
    pub fn labels(&self) -> Vec<String> {
        self.container
            .elements()
            .iter()
            .map(|e| e.label().to_owned())
            .collect()
    }
}

impl fmt::Debug for ContentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentView").field(self.container).finish()
    }
}
