#![forbid(unsafe_code)]

//! Refresh transition and complete dismissal.
//!
//! The refresh transition swaps the card from the outgoing item's elements to
//! the current item's elements through three equal linear phases:
//!
//! | Phase  | Block                                              | Completion |
//! |--------|----------------------------------------------------|------------|
//! | hide   | hide indicator, alpha 0 on outgoing and incoming   | - |
//! | swap   | hide outgoing set, show incoming set               | container alpha 1 |
//! | reveal | alpha 1 on incoming                                | restore dismissable, remove outgoing, announce |
//!
//! # Invariants
//!
//! - The surface is not dismissable from the start of a transition until the
//!   reveal phase completes.
//! - Outgoing elements stay in the container until the reveal completion.
//! - While preparing, the chain has zero duration and new elements are never
//!   hidden.
//! - A transition still running when another starts is fast-forwarded first.

use std::rc::Rc;

use bltn_anim::{AnimationChain, AnimationCurve, AnimationPhase};
use bltn_core::{Element, flatten_hideable};
use tracing::{debug, debug_span, trace};

use crate::manager::BulletinManager;
use crate::surface::PresentationSurface;
use crate::teardown::TeardownWalk;

const PHASE_FRACTION: f32 = 1.0 / 3.0;

fn phase() -> AnimationPhase {
    AnimationPhase::new(PHASE_FRACTION, AnimationCurve::Linear)
}

impl BulletinManager {
    /// Run the unfinished part of the last transition, if any.
    pub(crate) fn settle_transition(&self) {
        let pending = self.shared.state.borrow_mut().transition.take();
        if let Some(id) = pending
            && self.shared.scheduler.is_pending(id)
        {
            debug!(chain = id.id(), "fast-forwarding bulletin transition");
            self.shared.scheduler.finish(id);
        }
    }

    /// Transition the surface to the current item.
    pub(crate) fn refresh_current_item(&self) {
        self.settle_transition();
        let surface = self.surface_for("refresh_current_item");
        let (current, preparing) = {
            let state = self.state();
            (Rc::clone(&state.current), state.is_preparing)
        };
        let _span = debug_span!(
            "bulletin_transition",
            item = current.label(),
            preparing
        )
        .entered();

        surface.set_dismissable(false);
        surface.refresh_swipe_interaction();

        let outgoing = surface.content().elements();
        let outgoing_hideable = flatten_hideable(&outgoing);

        let previous = self.state().previous.clone();
        if let Some(previous) = previous {
            trace!(item = previous.label(), "tearing down previous item");
            previous.tear_down();
            previous.detach_manager();
        }
        self.shared.state.borrow_mut().previous = None;

        current.attach_manager(self.downgrade());

        let incoming = current.make_elements();
        let incoming_hideable = flatten_hideable(&incoming);
        if !preparing {
            for element in &incoming_hideable {
                element.set_hidden(true);
            }
        }
        for element in &incoming {
            surface.content().append(element.clone());
        }

        let duration = if preparing {
            std::time::Duration::ZERO
        } else {
            self.shared.config.effective_transition_duration()
        };
        trace!(
            outgoing = outgoing.len(),
            incoming = incoming.len(),
            duration_ms = duration.as_millis() as u64,
            "starting bulletin transition"
        );

        let chain = AnimationChain::new(duration)
            .with_phase(hide_phase(&surface, &outgoing, &incoming))
            .with_phase(swap_phase(&surface, outgoing_hideable, incoming_hideable))
            .with_phase(self.reveal_phase(&surface, outgoing, incoming));
        let id = chain.start(&self.shared.scheduler);
        self.shared.state.borrow_mut().transition = Some(id);
    }

    fn reveal_phase(
        &self,
        surface: &Rc<dyn PresentationSurface>,
        outgoing: Vec<Element>,
        incoming: Vec<Element>,
    ) -> AnimationPhase {
        let shown = incoming.clone();
        let surface = Rc::clone(surface);
        let manager = self.downgrade();
        phase()
            .block(move || {
                trace!("transition phase: reveal");
                for element in &shown {
                    element.set_alpha(1.0);
                }
            })
            .on_complete(move || {
                if let Some(manager) = manager.upgrade() {
                    let dismissable = manager.state().current.is_dismissable();
                    surface.set_dismissable(dismissable);
                    surface.refresh_swipe_interaction();
                }
                for element in outgoing.iter().filter(|e| !incoming.contains(e)) {
                    surface.content().remove(element);
                    element.detach();
                }
                surface.post_screen_changed(incoming.first());
                trace!("bulletin transition complete");
            })
    }

    /// Final cleanup once `surface` has been dismissed.
    pub(crate) fn complete_dismissal(&self, surface: Rc<dyn PresentationSurface>) {
        let is_current = self
            .state()
            .surface
            .as_ref()
            .is_some_and(|active| Rc::ptr_eq(active, &surface));
        if !is_current {
            debug!("releasing stale bulletin surface");
            for element in surface.content().drain() {
                element.detach();
            }
            surface.release();
            return;
        }

        let current = Rc::clone(&self.state().current);
        if let Some(handler) = current.dismissal_handler() {
            handler(&current);
        }

        for element in surface.content().drain() {
            element.detach();
        }

        surface.release();
        let (root, stacked) = {
            let mut state = self.shared.state.borrow_mut();
            state.surface = None;
            state.is_presented = false;
            state.previous = None;
            state.current = Rc::clone(&state.root);
            (Rc::clone(&state.root), state.stack.clone())
        };

        let mut walk = TeardownWalk::new();
        walk.tear_down_chain(&root);
        for item in &stacked {
            walk.tear_down_chain(item);
        }

        let mut state = self.shared.state.borrow_mut();
        state.stack.clear();
        state.is_dismissing = false;
        debug!(
            torn_down = walk.visited(),
            root = root.label(),
            "bulletin dismissal complete"
        );
    }
}

fn hide_phase(
    surface: &Rc<dyn PresentationSurface>,
    outgoing: &[Element],
    incoming: &[Element],
) -> AnimationPhase {
    let surface = Rc::clone(surface);
    let faded: Vec<Element> = outgoing.iter().chain(incoming).cloned().collect();
    phase().block(move || {
        trace!("transition phase: hide");
        surface.hide_activity_indicator();
        for element in &faded {
            element.set_alpha(0.0);
        }
    })
}

fn swap_phase(
    surface: &Rc<dyn PresentationSurface>,
    outgoing_hideable: Vec<Element>,
    incoming_hideable: Vec<Element>,
) -> AnimationPhase {
    let surface = Rc::clone(surface);
    phase()
        .block(move || {
            trace!("transition phase: swap");
            for element in &outgoing_hideable {
                element.set_hidden(true);
            }
            for element in &incoming_hideable {
                element.set_hidden(false);
            }
        })
        .on_complete(move || surface.content().set_alpha(1.0))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use bltn_core::Rgba;
    use tracing_test::traced_test;

    use super::*;
    use crate::config::BulletinConfig;
    use crate::item::{BulletinItem, ItemContent, ItemRef};
    use crate::test_support::{StubSurface, item, manager, manager_with};

    struct Tracked {
        label: &'static str,
        teardowns: Rc<Cell<usize>>,
    }

    impl ItemContent for Tracked {
        fn make_elements(&mut self) -> Box<dyn Iterator<Item = Element> + '_> {
            let label = self.label;
            Box::new(std::iter::once(Element::group(
                format!("{label}.stack"),
                [Element::new(format!("{label}.title")), Element::new(format!("{label}.body"))],
            )))
        }

        fn tear_down(&mut self) {
            self.teardowns.set(self.teardowns.get() + 1);
        }
    }

    fn tracked(label: &'static str) -> (ItemRef, Rc<Cell<usize>>) {
        let teardowns = Rc::new(Cell::new(0));
        let item = BulletinItem::labeled(
            label,
            Tracked {
                label,
                teardowns: Rc::clone(&teardowns),
            },
        );
        (item, teardowns)
    }

    fn timed(root: ItemRef) -> (crate::BulletinManager, Rc<StubSurface>) {
        let (m, surfaces) = manager_with(
            root,
            BulletinConfig::new().transition_duration(Duration::from_millis(750)),
        );
        m.prepare();
        let surface = Rc::clone(&surfaces.borrow()[0]);
        (m, surface)
    }

    fn run_to_end(m: &crate::BulletinManager) {
        let later = m.scheduler().now() + Duration::from_secs(5);
        m.scheduler().tick(later);
    }

    #[test]
    fn prepare_shows_everything_at_once() {
        let (root, _) = tracked("root");
        let (m, surface) = timed(root);
        let elements = flatten_hideable(&surface.content.elements());
        assert_eq!(elements.len(), 3);
        assert!(elements.iter().all(|e| !e.is_hidden() && e.alpha() == 1.0));
        assert!(elements.iter().all(Element::is_attached));
        assert!(!m.is_transitioning());
        assert!(surface.dismissable.get());
        assert_eq!(*surface.announced.borrow(), [Some("root.stack".to_owned())]);
    }

    #[test]
    fn timed_push_hides_incoming_until_swap() {
        let (root, _) = tracked("root");
        let (m, surface) = timed(root);
        let outgoing = surface.content.elements();
        let (a, _) = tracked("a");
        m.push(a);

        assert!(m.is_transitioning());
        assert!(!surface.dismissable.get());
        let all = surface.content.elements();
        assert_eq!(all.len(), 2);
        let incoming = &all[1];
        assert_eq!(incoming.label(), "a.stack");
        assert!(incoming.is_hidden());
        assert!(flatten_hideable(std::slice::from_ref(incoming))
            .iter()
            .all(Element::is_hidden));
        // Hide phase already ran at start.
        assert_eq!(outgoing[0].alpha(), 0.0);
        assert_eq!(incoming.alpha(), 0.0);

        run_to_end(&m);
        assert!(!m.is_transitioning());
        assert!(surface.dismissable.get());
        let remaining = surface.content.elements();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].label(), "a.stack");
        assert!(!remaining[0].is_hidden());
        assert_eq!(remaining[0].alpha(), 1.0);
        assert!(!outgoing[0].is_attached());
        assert!(outgoing[0].is_hidden());
    }

    #[test]
    fn dismissable_restored_from_current_item() {
        let (root, _) = tracked("root");
        let (m, surface) = timed(root);
        let (a, _) = tracked("a");
        a.set_dismissable(false);
        m.push(a);
        assert!(!surface.dismissable.get());
        run_to_end(&m);
        assert!(!surface.dismissable.get());
        m.pop_item();
        assert!(!surface.dismissable.get());
        run_to_end(&m);
        assert!(surface.dismissable.get());
    }

    #[test]
    fn previous_item_torn_down_once_and_detached() {
        let (root, root_teardowns) = tracked("root");
        let (m, _) = manager(Rc::clone(&root));
        m.prepare();
        let (a, a_teardowns) = tracked("a");
        m.push(Rc::clone(&a));
        assert_eq!(root_teardowns.get(), 1);
        assert!(!root.has_manager());
        assert!(a.has_manager());
        m.pop_to_root_item();
        assert_eq!(a_teardowns.get(), 1);
        assert!(!a.has_manager());
        assert!(root.has_manager());
    }

    #[test]
    fn second_push_fast_forwards_running_transition() {
        let (root, _) = tracked("root");
        let (m, surface) = timed(root);
        let (a, _) = tracked("a");
        let (b, _) = tracked("b");
        m.push(a);
        m.push(b);
        // The first transition completed, so only a's and b's cards remain.
        let labels: Vec<String> = surface
            .content
            .elements()
            .iter()
            .map(|e| e.label().to_owned())
            .collect();
        assert_eq!(labels, ["a.stack", "b.stack"]);
        run_to_end(&m);
        let labels: Vec<String> = m.with_content_view(|v| v.labels());
        assert_eq!(labels, ["b.stack"]);
        assert_eq!(m.scheduler().pending_chains(), 0);
    }

    #[test]
    fn transition_hides_activity_indicator() {
        let (m, surface) = timed(item("root"));
        m.display_activity_indicator(Rgba::BLACK);
        assert_eq!(surface.indicator.get(), Some(Rgba::BLACK));
        m.push(item("a"));
        assert_eq!(surface.indicator.get(), None);
        assert_eq!(surface.content.alpha(), 0.0);
        run_to_end(&m);
        assert_eq!(surface.content.alpha(), 1.0);
    }

    #[test]
    fn reused_elements_survive_transition() {
        let shared = Element::new("shared");
        let kept = shared.clone();
        let root = BulletinItem::from_fn("root", move || vec![kept.clone()]);
        let (m, surface) = timed(Rc::clone(&root));
        m.push(Rc::clone(&root));
        run_to_end(&m);
        assert_eq!(surface.content.elements(), vec![shared.clone()]);
        assert!(shared.is_attached());
        assert!(!shared.is_hidden());
    }

    #[test]
    fn dismissal_runs_handler_and_empties_container() {
        let (root, root_teardowns) = tracked("root");
        let (m, surfaces) = manager(Rc::clone(&root));
        m.prepare();
        let (a, a_teardowns) = tracked("a");
        let handled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&handled);
        a.set_dismissal_handler(move |item| flag.set(item.label() == "a"));
        m.push(Rc::clone(&a));
        let elements = surfaces.borrow()[0].content.elements();

        m.dismiss_bulletin(false);
        assert_eq!(a_teardowns.get(), 1);
        assert!(!a.has_manager());
        assert!(!handled.get());

        surfaces.borrow()[0].finish_dismissal();
        assert!(handled.get());
        assert!(surfaces.borrow()[0].content.is_empty());
        assert!(elements.iter().all(|e| !e.is_attached()));
        assert!(BulletinItem::same(&m.current_item(), &root));
        assert!(root_teardowns.get() >= 2);
        assert!(!root.has_manager());
    }

    #[test]
    fn stale_surface_completion_only_releases_it() {
        let (m, surfaces) = manager(item("root"));
        m.prepare();
        let first = Rc::clone(&surfaces.borrow()[0]);
        m.dismiss_bulletin(false);
        first.finish_dismissal();
        m.prepare();
        m.push(item("a"));
        // A late completion for the released surface.
        m.complete_dismissal(first.clone() as Rc<dyn PresentationSurface>);
        assert!(m.is_prepared());
        assert_eq!(m.stack_depth(), 1);
        assert!(m.surface().is_some());
    }

    #[test]
    #[traced_test]
    fn transition_is_logged() {
        let (m, _) = manager(item("root"));
        m.prepare();
        m.push(item("a"));
        assert!(logs_contain("bulletin_transition"));
        assert!(logs_contain("pushed bulletin item"));
        assert!(logs_contain("starting bulletin transition"));
    }
}
