#![forbid(unsafe_code)]

//! Content container of a bulletin card.
//!
//! The container is the ordered list of top-level elements currently laid
//! out in the card. It is owned by the presentation surface and mutated by
//! the stack manager; every method takes `&self` so the surface can hand out
//! a plain reference while the manager drives it.
//!
//! # Invariants
//!
//! - An element appears at most once; appending it again moves it to the end.
//! - Every element in the container is attached; removal does not detach
//!   (callers detach explicitly once they are done with the element).
//! - Container alpha is within `[0.0, 1.0]`.

use std::cell::{Cell, RefCell};
use std::fmt;

use crate::element::Element;

/// Ordered collection of the card's top-level elements.
pub struct ContentContainer {
    elements: RefCell<Vec<Element>>,
    alpha: Cell<f32>,
}

impl Default for ContentContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentContainer {
    /// Create an empty, fully opaque container.
    pub fn new() -> Self {
        Self {
            elements: RefCell::new(Vec::new()),
            alpha: Cell::new(1.0),
        }
    }

    /// Append an element and attach it to the rendering tree.
    pub fn append(&self, element: Element) {
        let mut elements = self.elements.borrow_mut();
        elements.retain(|e| e != &element);
        element.attach();
        elements.push(element);
    }

    /// Remove an element. Returns `false` if it was not in the container.
    pub fn remove(&self, element: &Element) -> bool {
        let mut elements = self.elements.borrow_mut();
        let Some(idx) = elements.iter().position(|e| e == element) else {
            return false;
        };
        elements.remove(idx);
        true
    }

    /// Remove every element, returning them in order.
    pub fn drain(&self) -> Vec<Element> {
        std::mem::take(&mut *self.elements.borrow_mut())
    }

    /// Snapshot of the current elements.
    pub fn elements(&self) -> Vec<Element> {
        self.elements.borrow().clone()
    }

    pub fn first(&self) -> Option<Element> {
        self.elements.borrow().first().cloned()
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.elements.borrow().iter().any(|e| e == element)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha.get()
    }

    pub fn set_alpha(&self, alpha: f32) {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        self.alpha.set(alpha);
    }
}

impl fmt::Debug for ContentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentContainer")
            .field("elements", &*self.elements.borrow())
            .field("alpha", &self.alpha.get())
            .finish()
    }
}
