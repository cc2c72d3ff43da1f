#![forbid(unsafe_code)]

//! Items with observable build and teardown counts.

use std::cell::Cell;
use std::rc::Rc;

use bltn_core::Element;
use bltn_stack::{BulletinItem, ItemContent, ItemRef};

/// Counters shared between a [`ScriptedItem`] and the test observing it.
#[derive(Debug, Clone, Default)]
pub struct ItemProbe {
    builds: Rc<Cell<usize>>,
    teardowns: Rc<Cell<usize>>,
}

impl ItemProbe {
    pub fn builds(&self) -> usize {
        self.builds.get()
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.get()
    }
}

/// Content producing a title, a grouped body of `rows` rows, and a footer.
///
/// Element labels are prefixed with the item label (`intro.title`,
/// `intro.row-0`, ...).
pub struct ScriptedItem {
    label: String,
    rows: usize,
    probe: ItemProbe,
}

impl ScriptedItem {
    /// Build an item with two body rows.
    pub fn build(label: &str) -> (ItemRef, ItemProbe) {
        Self::with_rows(label, 2)
    }

    pub fn with_rows(label: &str, rows: usize) -> (ItemRef, ItemProbe) {
        let probe = ItemProbe::default();
        let content = Self {
            label: label.to_owned(),
            rows,
            probe: probe.clone(),
        };
        (BulletinItem::labeled(label, content), probe)
    }
}

impl ItemContent for ScriptedItem {
    fn make_elements(&mut self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.probe.builds.set(self.probe.builds.get() + 1);
        let label = &self.label;
        let body = Element::group(
            format!("{label}.body"),
            (0..self.rows).map(|i| Element::new(format!("{label}.row-{i}"))),
        );
        Box::new(
            [
                Element::new(format!("{label}.title")),
                body,
                Element::new(format!("{label}.footer")),
            ]
            .into_iter(),
        )
    }

    fn tear_down(&mut self) {
        self.probe.teardowns.set(self.probe.teardowns.get() + 1);
    }
}

/// Link `items` into a `next` chain, in order.
pub fn link_chain(items: &[ItemRef]) {
    for pair in items.windows(2) {
        pair[0].set_next_item(Some(Rc::clone(&pair[1])));
    }
}
