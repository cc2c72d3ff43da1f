#![forbid(unsafe_code)]

//! Random stack operation sequences for property tests.

use std::rc::Rc;

use bltn_stack::{BulletinItem, BulletinManager, ItemRef};
use proptest::prelude::*;

use crate::item::ScriptedItem;

/// One stack-mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    Push,
    Pop,
    PopToRoot,
    /// Pop to the stacked item at `index % depth`; pop to root when empty.
    PopTo(usize),
}

/// Strategy for a single [`StackOp`], weighted towards pushes.
pub fn stack_op() -> impl Strategy<Value = StackOp> {
    prop_oneof![
        4 => Just(StackOp::Push),
        3 => Just(StackOp::Pop),
        1 => Just(StackOp::PopToRoot),
        2 => (0usize..8).prop_map(StackOp::PopTo),
    ]
}

/// Strategy for a sequence of up to `max_len` operations.
pub fn stack_ops(max_len: usize) -> impl Strategy<Value = Vec<StackOp>> {
    prop::collection::vec(stack_op(), 0..=max_len)
}

/// Applies operations to a manager, creating pushed items on demand.
#[derive(Default)]
pub struct OpDriver {
    pushed: Vec<ItemRef>,
}

impl OpDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every item pushed so far.
    pub fn pushed(&self) -> &[ItemRef] {
        &self.pushed
    }

    pub fn apply(&mut self, manager: &BulletinManager, op: StackOp) {
        match op {
            StackOp::Push => {
                let (item, _) = ScriptedItem::build(&format!("item-{}", self.pushed.len()));
                self.pushed.push(Rc::clone(&item));
                manager.push(item);
            }
            StackOp::Pop => manager.pop_item(),
            StackOp::PopToRoot => manager.pop_to_root_item(),
            StackOp::PopTo(index) => {
                let stack = manager.stack_items();
                match stack.get(index % stack.len().max(1)) {
                    Some(target) => manager.pop_to(target, false),
                    None => manager.pop_to_root_item(),
                }
            }
        }
    }
}

/// Whether `current == stack.last() ?? root`.
pub fn current_matches_stack(manager: &BulletinManager) -> bool {
    let current = manager.current_item();
    match manager.stack_items().last() {
        Some(top) => BulletinItem::same(&current, top),
        None => BulletinItem::same(&current, &manager.root_item()),
    }
}
