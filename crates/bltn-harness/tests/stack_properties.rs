#![forbid(unsafe_code)]

//! Property tests over random stack operation sequences.

use std::rc::Rc;

use bltn_harness::ops::{OpDriver, StackOp, current_matches_stack, stack_ops};
use bltn_harness::{ScriptedItem, instant_manager, link_chain};
use bltn_stack::{BulletinItem, ItemRef};
use proptest::prelude::*;

fn stack_labels(items: &[ItemRef]) -> Vec<String> {
    items.iter().map(|i| i.label().to_owned()).collect()
}

proptest! {
    #[test]
    fn current_is_top_of_stack_or_root(ops in stack_ops(40)) {
        let (root, _) = ScriptedItem::build("root");
        let (manager, _) = instant_manager(root);
        manager.prepare();
        let mut driver = OpDriver::new();
        for op in ops {
            driver.apply(&manager, op);
            prop_assert!(current_matches_stack(&manager), "after {:?}", op);
        }
    }

    #[test]
    fn shallow_pop_equals_pop_to_root(prefix in stack_ops(12), push_one in any::<bool>()) {
        let build = || {
            let (root, _) = ScriptedItem::build("root");
            let (manager, factory) = instant_manager(root);
            manager.prepare();
            (manager, factory)
        };
        let (popped, popped_factory) = build();
        let (rooted, rooted_factory) = build();
        let mut popped_driver = OpDriver::new();
        let mut rooted_driver = OpDriver::new();
        for &op in &prefix {
            popped_driver.apply(&popped, op);
            rooted_driver.apply(&rooted, op);
        }
        // Bring both to depth 0 or 1.
        popped.pop_to_root_item();
        rooted.pop_to_root_item();
        if push_one {
            popped_driver.apply(&popped, StackOp::Push);
            rooted_driver.apply(&rooted, StackOp::Push);
        }

        popped.pop_item();
        rooted.pop_to_root_item();

        prop_assert_eq!(popped.stack_depth(), 0);
        prop_assert_eq!(rooted.stack_depth(), 0);
        prop_assert_eq!(
            popped.current_item().label().to_owned(),
            rooted.current_item().label().to_owned()
        );
        let popped_surface = popped_factory.last().unwrap();
        let rooted_surface = rooted_factory.last().unwrap();
        prop_assert_eq!(popped_surface.labels(), rooted_surface.labels());
        prop_assert_eq!(
            popped_surface.dismissable_history(),
            rooted_surface.dismissable_history()
        );
    }

    #[test]
    fn dismissal_severs_every_link(
        ops in stack_ops(30),
        chain_len in 0usize..5,
        close_cycle in any::<bool>(),
    ) {
        let (root, _) = ScriptedItem::build("root");
        let mut chain = vec![Rc::clone(&root)];
        for i in 0..chain_len {
            chain.push(ScriptedItem::build(&format!("next-{i}")).0);
        }
        link_chain(&chain);
        if close_cycle {
            if let Some(last) = chain.last() {
                last.set_next_item(Some(Rc::clone(&root)));
            }
        }

        let (manager, factory) = instant_manager(Rc::clone(&root));
        manager.prepare();
        let mut driver = OpDriver::new();
        for op in ops {
            driver.apply(&manager, op);
        }
        // Give stacked items their own chains too.
        let stacked = manager.stack_items();
        for item in &stacked {
            item.set_next_item(Some(ScriptedItem::build("tail").0));
        }
        let tails: Vec<ItemRef> = stacked.iter().filter_map(|i| i.next_item()).collect();

        manager.dismiss_bulletin(true);
        prop_assert!(factory.last().unwrap().complete_dismissal());

        prop_assert!(manager.stack_items().is_empty());
        prop_assert!(BulletinItem::same(&manager.current_item(), &root));
        for item in chain.iter().chain(&stacked).chain(&tails).chain(driver.pushed()) {
            prop_assert!(!item.has_manager(), "{} kept its manager", item.label());
        }
        for item in chain.iter().chain(&stacked) {
            prop_assert!(item.next_item().is_none(), "{} kept its next link", item.label());
        }
    }

    #[test]
    fn pop_to_stacked_item_truncates(pushes in 1usize..8, pick in any::<prop::sample::Index>()) {
        let (root, _) = ScriptedItem::build("root");
        let (manager, _) = instant_manager(root);
        manager.prepare();
        let mut driver = OpDriver::new();
        for _ in 0..pushes {
            driver.apply(&manager, StackOp::Push);
        }
        let before = stack_labels(&manager.stack_items());
        let index = pick.index(pushes);
        let target = Rc::clone(&manager.stack_items()[index]);

        manager.pop_to(&target, false);

        let after = manager.stack_items();
        prop_assert_eq!(after.len(), index + 1);
        prop_assert!(BulletinItem::same(after.last().unwrap(), &target));
        prop_assert!(BulletinItem::same(&manager.current_item(), &target));
        prop_assert_eq!(&stack_labels(&after)[..], &before[..=index]);
    }
}
