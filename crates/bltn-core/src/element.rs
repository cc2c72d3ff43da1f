#![forbid(unsafe_code)]

//! Visual elements produced by bulletin items.
//!
//! An [`Element`] is a shared handle to one node of an abstract element tree.
//! The stack manager only needs a handful of presentation properties (hidden,
//! alpha, attachment) and the grouping structure; what an element actually
//! draws is up to the host, which can stash anything in the element payload.
//!
//! # Invariants
//!
//! - Element ids are unique for the lifetime of the process.
//! - Clones of one handle share state; equality is by id.
//! - `alpha` is always within `[0.0, 1.0]`.
//! - A group's children never change after construction.
//!
//! # Failure Modes
//!
//! - `payload::<T>()` with the wrong type returns `None`.
//! - Detaching an element that was never attached is a no-op.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

/// Global counter for unique element ids.
static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        Self(ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

bitflags! {
    /// Presentation flags of an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        /// Excluded from layout (collapsed), independent of alpha.
        const HIDDEN = 1 << 0;
        /// Part of a rendering tree.
        const ATTACHED = 1 << 1;
    }
}

enum ElementKind {
    Leaf,
    Group(Vec<Element>),
}

struct ElementNode {
    id: ElementId,
    label: String,
    kind: ElementKind,
    payload: Option<Rc<dyn Any>>,
    flags: Cell<ElementFlags>,
    alpha: Cell<f32>,
}

/// Shared handle to a visual element.
#[derive(Clone)]
pub struct Element {
    node: Rc<ElementNode>,
}

impl Element {
    fn from_parts(label: String, kind: ElementKind, payload: Option<Rc<dyn Any>>) -> Self {
        Self {
            node: Rc::new(ElementNode {
                id: ElementId::next(),
                label,
                kind,
                payload,
                flags: Cell::new(ElementFlags::empty()),
                alpha: Cell::new(1.0),
            }),
        }
    }

    /// Create a leaf element.
    pub fn new(label: impl Into<String>) -> Self {
        Self::from_parts(label.into(), ElementKind::Leaf, None)
    }

    /// Create a leaf element carrying a host-defined payload.
    pub fn with_payload(label: impl Into<String>, payload: impl Any) -> Self {
        Self::from_parts(label.into(), ElementKind::Leaf, Some(Rc::new(payload)))
    }

    /// Create a grouping element (a nested stack of elements).
    pub fn group(label: impl Into<String>, children: impl IntoIterator<Item = Element>) -> Self {
        let children = children.into_iter().collect();
        Self::from_parts(label.into(), ElementKind::Group(children), None)
    }

    #[inline]
    pub fn id(&self) -> ElementId {
        self.node.id
    }

    pub fn label(&self) -> &str {
        &self.node.label
    }

    pub fn is_group(&self) -> bool {
        matches!(self.node.kind, ElementKind::Group(_))
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[Element] {
        match &self.node.kind {
            ElementKind::Leaf => &[],
            ElementKind::Group(children) => children,
        }
    }

    /// Borrow the payload as `T`, if there is one of that type.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.node.payload.as_deref()?.downcast_ref::<T>()
    }

    pub fn flags(&self) -> ElementFlags {
        self.node.flags.get()
    }

    pub fn is_hidden(&self) -> bool {
        self.flags().contains(ElementFlags::HIDDEN)
    }

    pub fn set_hidden(&self, hidden: bool) {
        let mut flags = self.flags();
        flags.set(ElementFlags::HIDDEN, hidden);
        self.node.flags.set(flags);
    }

    pub fn alpha(&self) -> f32 {
        self.node.alpha.get()
    }

    /// Set opacity, clamped to `[0.0, 1.0]` (NaN becomes transparent).
    pub fn set_alpha(&self, alpha: f32) {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        self.node.alpha.set(alpha);
    }

    pub fn is_attached(&self) -> bool {
        self.flags().contains(ElementFlags::ATTACHED)
    }

    pub(crate) fn attach(&self) {
        self.set_attached(true);
    }

    /// Remove this element and its descendants from the rendering tree.
    pub fn detach(&self) {
        self.set_attached(false);
    }

    fn set_attached(&self, attached: bool) {
        let mut flags = self.flags();
        flags.set(ElementFlags::ATTACHED, attached);
        self.node.flags.set(flags);
        for child in self.children() {
            child.set_attached(attached);
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.node.id == other.node.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        s.field("id", &self.node.id.0)
            .field("label", &self.node.label)
            .field("flags", &self.flags())
            .field("alpha", &self.alpha());
        if self.is_group() {
            s.field("children", &self.children());
        }
        s.finish()
    }
}

/// Flatten elements into the set whose visibility a transition toggles.
///
/// Pre-order and depth-first: each group is listed, followed by its
/// recursively flattened children.
pub fn flatten_hideable(elements: &[Element]) -> Vec<Element> {
    let mut out = Vec::with_capacity(elements.len());
    let mut pending: Vec<&Element> = elements.iter().rev().collect();
    while let Some(element) = pending.pop() {
        out.push(element.clone());
        pending.extend(element.children().iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn labels(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(Element::label).collect()
    }

    #[test]
    fn new_element_is_visible_and_detached() {
        let e = Element::new("title");
        assert!(!e.is_hidden());
        assert!(!e.is_attached());
        assert_eq!(e.alpha(), 1.0);
        assert!(!e.is_group());
        assert!(e.children().is_empty());
    }

    #[test]
    fn unique_ids() {
        let a = Element::new("a");
        let b = Element::new("a");
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn clones_share_state() {
        let a = Element::new("a");
        let alias = a.clone();
        alias.set_hidden(true);
        alias.set_alpha(0.25);
        assert!(a.is_hidden());
        assert_eq!(a.alpha(), 0.25);
    }

    #[test]
    fn alpha_is_clamped() {
        let e = Element::new("e");
        e.set_alpha(3.0);
        assert_eq!(e.alpha(), 1.0);
        e.set_alpha(-0.5);
        assert_eq!(e.alpha(), 0.0);
        e.set_alpha(f32::NAN);
        assert_eq!(e.alpha(), 0.0);
    }

    #[test]
    fn payload_downcasts_by_type() {
        let e = Element::with_payload("image", 42_u32);
        assert_eq!(e.payload::<u32>(), Some(&42));
        assert!(e.payload::<String>().is_none());
        assert!(Element::new("plain").payload::<u32>().is_none());
    }

    #[test]
    fn detach_recurses_into_children() {
        let leaf = Element::new("leaf");
        let group = Element::group("buttons", [leaf.clone()]);
        group.attach();
        assert!(leaf.is_attached());
        group.detach();
        assert!(!group.is_attached());
        assert!(!leaf.is_attached());
    }

    #[test]
    fn flatten_is_preorder_depth_first() {
        let inner = Element::group("inner", [Element::new("c"), Element::new("d")]);
        let outer = Element::group("outer", [Element::new("b"), inner]);
        let top = vec![Element::new("a"), outer, Element::new("e")];
        let flat = flatten_hideable(&top);
        assert_eq!(labels(&flat), ["a", "outer", "b", "inner", "c", "d", "e"]);
    }

    #[test]
    fn flatten_empty_group_keeps_group() {
        let flat = flatten_hideable(&[Element::group("empty", [])]);
        assert_eq!(labels(&flat), ["empty"]);
    }

    #[derive(Debug, Clone)]
    enum Shape {
        Leaf,
        Group(Vec<Shape>),
    }

    fn shape() -> impl Strategy<Value = Shape> {
        Just(Shape::Leaf).prop_recursive(4, 32, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Shape::Group)
        })
    }

    fn build(shape: &Shape, next: &mut usize) -> Element {
        let label = format!("n{next}");
        *next += 1;
        match shape {
            Shape::Leaf => Element::new(label),
            Shape::Group(children) => {
                let children: Vec<Element> = children.iter().map(|c| build(c, next)).collect();
                Element::group(label, children)
            }
        }
    }

    fn preorder(element: &Element, out: &mut Vec<String>) {
        out.push(element.label().to_owned());
        for child in element.children() {
            preorder(child, out);
        }
    }

    proptest! {
        #[test]
        fn flatten_matches_recursive_preorder(shapes in prop::collection::vec(shape(), 0..5)) {
            let mut next = 0;
            let top: Vec<Element> = shapes.iter().map(|s| build(s, &mut next)).collect();

            let mut expected = Vec::new();
            for element in &top {
                preorder(element, &mut expected);
            }
            let flat = flatten_hideable(&top);

            prop_assert_eq!(flat.len(), next);
            prop_assert_eq!(labels(&flat), expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
