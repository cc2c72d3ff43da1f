#![forbid(unsafe_code)]

//! Bulletin items: one card of content each.
//!
//! An item pairs host-supplied [`ItemContent`] (element factory and teardown
//! hook) with the links the manager maintains: a weak back-reference to the
//! manager, an optional `next` item, the dismissable flag and an optional
//! dismissal handler.
//!
//! # Invariants
//!
//! - The manager back-reference is weak; an item never keeps its manager
//!   alive.
//! - `next` is owned by the item that links to it. Teardown of a whole chain
//!   severs every link it walks.
//! - Elements are built fresh on every transition; an item never caches the
//!   iterator returned by [`ItemContent::make_elements`].
//!
//! # Failure Modes
//!
//! - Calling back into the same item's content from inside `make_elements` or
//!   `tear_down` panics with a `RefCell` borrow error.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bltn_core::Element;

use crate::manager::{BulletinManager, WeakManager};

/// Shared handle to an item. Identity is pointer identity.
pub type ItemRef = Rc<BulletinItem>;

/// Handler run when the bulletin is dismissed while this item is current.
pub type DismissalHandler = Rc<dyn Fn(&ItemRef)>;

/// Host-defined content of an item.
pub trait ItemContent {
    /// Build the item's top-level elements.
    ///
    /// Called once per transition onto the item; the returned iterator is
    /// drained immediately and must be finite.
    fn make_elements(&mut self) -> Box<dyn Iterator<Item = Element> + '_>;

    /// Release resources held by the content. May run more than once.
    fn tear_down(&mut self) {}
}

/// [`ItemContent`] backed by a closure returning the elements.
pub struct FnContent<F> {
    build: F,
}

impl<F> FnContent<F>
where
    F: FnMut() -> Vec<Element>,
{
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F> ItemContent for FnContent<F>
where
    F: FnMut() -> Vec<Element>,
{
    fn make_elements(&mut self) -> Box<dyn Iterator<Item = Element> + '_> {
        Box::new((self.build)().into_iter())
    }
}

struct ItemLinks {
    manager: Option<WeakManager>,
    next: Option<ItemRef>,
    is_dismissable: bool,
    dismissal_handler: Option<DismissalHandler>,
}

/// One card of a bulletin.
pub struct BulletinItem {
    label: String,
    links: RefCell<ItemLinks>,
    content: RefCell<Box<dyn ItemContent>>,
}

impl BulletinItem {
    /// Create an unlabeled item.
    pub fn new(content: impl ItemContent + 'static) -> ItemRef {
        Self::labeled("", content)
    }

    /// Create an item with a label used in logs and `Debug` output.
    pub fn labeled(label: impl Into<String>, content: impl ItemContent + 'static) -> ItemRef {
        Rc::new(Self {
            label: label.into(),
            links: RefCell::new(ItemLinks {
                manager: None,
                next: None,
                is_dismissable: true,
                dismissal_handler: None,
            }),
            content: RefCell::new(Box::new(content)),
        })
    }

    /// Shorthand for an item whose elements come from a closure.
    pub fn from_fn(
        label: impl Into<String>,
        build: impl FnMut() -> Vec<Element> + 'static,
    ) -> ItemRef {
        Self::labeled(label, FnContent::new(build))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether `a` and `b` are the same item.
    #[inline]
    pub fn same(a: &ItemRef, b: &ItemRef) -> bool {
        Rc::ptr_eq(a, b)
    }

    pub fn next_item(&self) -> Option<ItemRef> {
        self.links.borrow().next.clone()
    }

    pub fn set_next_item(&self, next: Option<ItemRef>) {
        self.links.borrow_mut().next = next;
    }

    pub(crate) fn take_next_item(&self) -> Option<ItemRef> {
        self.links.borrow_mut().next.take()
    }

    /// The manager currently displaying this item, if it is still alive.
    pub fn manager(&self) -> Option<BulletinManager> {
        self.links.borrow().manager.as_ref().and_then(WeakManager::upgrade)
    }

    /// Whether the back-reference is set, even if the manager is gone.
    pub fn has_manager(&self) -> bool {
        self.links.borrow().manager.is_some()
    }

    pub(crate) fn attach_manager(&self, manager: WeakManager) {
        self.links.borrow_mut().manager = Some(manager);
    }

    pub(crate) fn detach_manager(&self) {
        self.links.borrow_mut().manager = None;
    }

    pub fn is_dismissable(&self) -> bool {
        self.links.borrow().is_dismissable
    }

    pub fn set_dismissable(&self, dismissable: bool) {
        self.links.borrow_mut().is_dismissable = dismissable;
    }

    pub fn set_dismissal_handler(&self, handler: impl Fn(&ItemRef) + 'static) {
        self.links.borrow_mut().dismissal_handler = Some(Rc::new(handler));
    }

    pub fn clear_dismissal_handler(&self) {
        self.links.borrow_mut().dismissal_handler = None;
    }

    pub fn dismissal_handler(&self) -> Option<DismissalHandler> {
        self.links.borrow().dismissal_handler.clone()
    }

    /// Materialize a fresh set of elements.
    pub(crate) fn make_elements(&self) -> Vec<Element> {
        self.content.borrow_mut().make_elements().collect()
    }

    pub(crate) fn tear_down(&self) {
        self.content.borrow_mut().tear_down();
    }
}

impl fmt::Debug for BulletinItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let links = self.links.borrow();
        f.debug_struct("BulletinItem")
            .field("label", &self.label)
            .field("is_dismissable", &links.is_dismissable)
            .field("has_manager", &links.manager.is_some())
            .field("next", &links.next.as_ref().map(|n| n.label.clone()))
            .field("has_dismissal_handler", &links.dismissal_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Counting {
        builds: Rc<Cell<usize>>,
        teardowns: Rc<Cell<usize>>,
    }

    impl ItemContent for Counting {
        fn make_elements(&mut self) -> Box<dyn Iterator<Item = Element> + '_> {
            self.builds.set(self.builds.get() + 1);
            Box::new((0..2).map(|i| Element::new(format!("row-{i}"))))
        }

        fn tear_down(&mut self) {
            self.teardowns.set(self.teardowns.get() + 1);
        }
    }

    #[test]
    fn defaults() {
        let item = BulletinItem::from_fn("intro", Vec::new);
        assert_eq!(item.label(), "intro");
        assert!(item.is_dismissable());
        assert!(item.next_item().is_none());
        assert!(!item.has_manager());
        assert!(item.manager().is_none());
        assert!(item.dismissal_handler().is_none());
    }

    #[test]
    fn elements_are_built_fresh() {
        let builds = Rc::new(Cell::new(0));
        let teardowns = Rc::new(Cell::new(0));
        let item = BulletinItem::new(Counting {
            builds: Rc::clone(&builds),
            teardowns: Rc::clone(&teardowns),
        });
        let first = item.make_elements();
        let second = item.make_elements();
        assert_eq!(first.len(), 2);
        assert_ne!(first[0], second[0]);
        assert_eq!(builds.get(), 2);
        item.tear_down();
        assert_eq!(teardowns.get(), 1);
    }

    #[test]
    fn next_links() {
        let a = BulletinItem::from_fn("a", Vec::new);
        let b = BulletinItem::from_fn("b", Vec::new);
        a.set_next_item(Some(Rc::clone(&b)));
        assert!(a.next_item().is_some_and(|n| BulletinItem::same(&n, &b)));
        assert!(a.take_next_item().is_some());
        assert!(a.next_item().is_none());
    }

    #[test]
    fn dismissal_handler_receives_item() {
        let seen = Rc::new(Cell::new(false));
        let item = BulletinItem::from_fn("a", Vec::new);
        let flag = Rc::clone(&seen);
        item.set_dismissal_handler(move |it| flag.set(it.label() == "a"));
        let handler = item.dismissal_handler().unwrap();
        handler(&item);
        assert!(seen.get());
        item.clear_dismissal_handler();
        assert!(item.dismissal_handler().is_none());
    }

    #[test]
    fn debug_shows_links() {
        let a = BulletinItem::from_fn("a", Vec::new);
        a.set_next_item(Some(BulletinItem::from_fn("b", Vec::new)));
        let dbg = format!("{a:?}");
        assert!(dbg.contains("label: \"a\""));
        assert!(dbg.contains("Some(\"b\")"));
    }
}
