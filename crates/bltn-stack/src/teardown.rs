#![forbid(unsafe_code)]

//! Teardown of `next`-linked item chains.
//!
//! The walk is an explicit loop. A visited set keyed by item address is
//! shared across every chain torn down during one dismissal, so a cyclic or
//! shared chain terminates and each item is torn down once per walk.
//!
//! # Invariants
//!
//! - After a walk, no visited item has a manager back-reference or a `next`
//!   link.
//! - Every visited item stays alive until the walk is dropped, so an address
//!   in the visited set never belongs to a different item.

use std::rc::Rc;

use ahash::AHashSet;
use tracing::trace;

use crate::item::ItemRef;

fn address(item: &ItemRef) -> usize {
    Rc::as_ptr(item).cast::<()>() as usize
}

/// Tears down chains of items, remembering what it already visited.
#[derive(Debug, Default)]
pub(crate) struct TeardownWalk {
    visited: AHashSet<usize>,
    held: Vec<ItemRef>,
}

impl TeardownWalk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Tear down `start` and everything reachable through `next`, severing
    /// each link. Returns the number of items torn down by this call.
    pub(crate) fn tear_down_chain(&mut self, start: &ItemRef) -> usize {
        let mut count = 0;
        let mut cursor = Some(Rc::clone(start));
        while let Some(item) = cursor.take() {
            if !self.visited.insert(address(&item)) {
                // Already walked; its link was severed then.
                break;
            }
            self.held.push(Rc::clone(&item));
            item.tear_down();
            item.detach_manager();
            count += 1;
            cursor = item.take_next_item();
            trace!(
                item = item.label(),
                has_next = cursor.is_some(),
                "bulletin item torn down"
            );
        }
        count
    }

    pub(crate) fn visited(&self) -> usize {
        self.held.len()
    }
}
