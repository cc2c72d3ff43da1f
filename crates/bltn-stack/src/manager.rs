#![forbid(unsafe_code)]

//! The bulletin stack manager.
//!
//! [`BulletinManager`] owns the root item, the push history and the
//! presentation surface. Stack operations update the state and then run the
//! refresh transition (see `transition.rs`); dismissal tears everything down
//! once the surface reports it is gone.
//!
//! # State machine
//!
//! ```text
//! Unprepared --prepare--> Prepared --(push|pop|pop_to_root|pop_to)*--> Prepared
//!      ^                      |
//!      |                dismiss_bulletin
//!      |                      v
//!      +--dismissal done-- Dismissing
//! ```
//!
//! # Invariants
//!
//! - `current` is `stack.last()` when the stack is non-empty, else `root`.
//! - Stack operations, indicator calls and presentation require `Prepared`.
//! - `is_prepared` is cleared as soon as `dismiss_bulletin` is called, before
//!   the surface reports completion.
//! - No borrow of the manager state is held while item hooks, the surface,
//!   the factory, the host or animation closures run.
//!
//! # Failure Modes
//!
//! Every public operation checks the UI thread first, then its lifecycle
//! precondition, and panics with a [`ContractViolation`] when either fails.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use bltn_anim::{AnimationScheduler, ChainId};
use bltn_core::Rgba;
use tracing::debug;

use crate::config::BulletinConfig;
use crate::error::ContractViolation;
use crate::item::{BulletinItem, ItemRef};
use crate::surface::{
    Completion, PresentOptions, PresentationHost, PresentationSurface, SurfaceFactory,
};
use crate::thread::UiThread;
use crate::view::ContentView;

pub(crate) struct StackState {
    pub(crate) root: ItemRef,
    pub(crate) stack: Vec<ItemRef>,
    pub(crate) current: ItemRef,
    pub(crate) previous: Option<ItemRef>,
    pub(crate) is_prepared: bool,
    pub(crate) is_preparing: bool,
    pub(crate) is_dismissing: bool,
    pub(crate) is_presented: bool,
    pub(crate) surface: Option<Rc<dyn PresentationSurface>>,
    pub(crate) transition: Option<ChainId>,
}

pub(crate) struct Shared {
    pub(crate) thread: UiThread,
    pub(crate) config: BulletinConfig,
    factory: RefCell<Box<dyn SurfaceFactory>>,
    pub(crate) scheduler: AnimationScheduler,
    pub(crate) state: RefCell<StackState>,
}

enum PopTarget {
    Root,
    Stacked(usize),
    Missing,
}

/// Handle to a bulletin stack manager. Clones share one manager.
#[derive(Clone)]
pub struct BulletinManager {
    pub(crate) shared: Rc<Shared>,
}

/// Non-owning handle to a [`BulletinManager`].
#[derive(Clone)]
pub struct WeakManager {
    shared: Weak<Shared>,
}

impl WeakManager {
    pub fn upgrade(&self) -> Option<BulletinManager> {
        self.shared.upgrade().map(|shared| BulletinManager { shared })
    }

    /// Whether both handles refer to the same manager.
    pub fn ptr_eq(&self, other: &WeakManager) -> bool {
        self.shared.ptr_eq(&other.shared)
    }
}

impl fmt::Debug for WeakManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakManager")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl BulletinManager {
    /// Create a manager for `root` on the calling (UI) thread.
    pub fn new(
        root: ItemRef,
        config: BulletinConfig,
        factory: impl SurfaceFactory + 'static,
    ) -> Self {
        Self::with_scheduler(root, config, factory, AnimationScheduler::new())
    }

    /// Like [`new`](Self::new), driving transitions through `scheduler`.
    pub fn with_scheduler(
        root: ItemRef,
        config: BulletinConfig,
        factory: impl SurfaceFactory + 'static,
        scheduler: AnimationScheduler,
    ) -> Self {
        let state = StackState {
            current: Rc::clone(&root),
            root,
            stack: Vec::new(),
            previous: None,
            is_prepared: false,
            is_preparing: false,
            is_dismissing: false,
            is_presented: false,
            surface: None,
            transition: None,
        };
        Self {
            shared: Rc::new(Shared {
                thread: UiThread::current(),
                config,
                factory: RefCell::new(Box::new(factory)),
                scheduler,
                state: RefCell::new(state),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakManager {
        WeakManager {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub(crate) fn state(&self) -> Ref<'_, StackState> {
        self.shared.state.borrow()
    }

    #[track_caller]
    fn require_prepared(&self, operation: &'static str) {
        self.shared.thread.assert_current(operation);
        if !self.state().is_prepared {
            ContractViolation::NotPrepared { operation }.raise();
        }
    }

    #[track_caller]
    pub(crate) fn surface_for(&self, operation: &'static str) -> Rc<dyn PresentationSurface> {
        match self.surface() {
            Some(surface) => surface,
            None => ContractViolation::NoSurface { operation }.raise(),
        }
    }

    // --- Lifecycle ---

    /// Build the surface and show the root item without animation.
    #[track_caller]
    pub fn prepare(&self) {
        self.shared.thread.assert_current("prepare");
        {
            let state = self.state();
            if state.is_prepared {
                ContractViolation::AlreadyPrepared.raise();
            }
            if state.is_dismissing {
                ContractViolation::DismissalPending.raise();
            }
        }

        let surface = self
            .shared
            .factory
            .borrow_mut()
            .make_surface(&self.shared.config);
        surface.attach_manager(self.downgrade());
        surface.load_background_view();

        {
            let mut state = self.shared.state.borrow_mut();
            state.surface = Some(surface);
            state.is_prepared = true;
            state.is_preparing = true;
            state.is_presented = false;
            state.previous = None;
            debug!(root = state.root.label(), "bulletin prepared");
        }
        self.refresh_current_item();
        self.shared.state.borrow_mut().is_preparing = false;
    }

    /// [`prepare`](Self::prepare) unless already prepared.
    #[track_caller]
    pub fn prepare_if_needed(&self) {
        if !self.is_prepared() {
            self.prepare();
        }
    }

    /// Hand the surface to `host` for presentation.
    #[track_caller]
    pub fn present_bulletin(
        &self,
        host: &mut dyn PresentationHost,
        animated: bool,
        completion: Option<Completion>,
    ) {
        self.require_prepared("present_bulletin");
        let surface = self.surface_for("present_bulletin");
        surface.set_captures_status_bar_appearance(true);

        let manager = self.downgrade();
        let presented: Completion = Box::new(move || {
            if let Some(manager) = manager.upgrade() {
                manager.shared.state.borrow_mut().is_presented = true;
            }
            if let Some(completion) = completion {
                completion();
            }
        });
        debug!(animated, "presenting bulletin");
        host.present(
            surface,
            PresentOptions {
                animated,
                captures_status_bar_appearance: true,
            },
            Some(presented),
        );
    }

    /// Prepare if needed, then present.
    #[track_caller]
    pub fn show_bulletin(
        &self,
        host: &mut dyn PresentationHost,
        animated: bool,
        completion: Option<Completion>,
    ) {
        self.prepare_if_needed();
        self.present_bulletin(host, animated, completion);
    }

    /// Tear down the current item and dismiss the surface. Cleanup finishes
    /// when the surface calls back; `is_prepared()` is false immediately.
    #[track_caller]
    pub fn dismiss_bulletin(&self, animated: bool) {
        self.require_prepared("dismiss_bulletin");
        self.settle_transition();

        let current = Rc::clone(&self.state().current);
        current.tear_down();
        current.detach_manager();

        let surface = self.surface_for("dismiss_bulletin");
        {
            let mut state = self.shared.state.borrow_mut();
            state.is_prepared = false;
            state.is_dismissing = true;
            debug!(
                animated,
                current = current.label(),
                depth = state.stack.len(),
                "dismissing bulletin"
            );
        }

        let manager = self.clone();
        let dismissed = Rc::clone(&surface);
        surface.dismiss(
            animated,
            Box::new(move || manager.complete_dismissal(dismissed)),
        );
    }

    // --- Stack operations ---

    /// Push `item` and transition to it.
    #[track_caller]
    pub fn push(&self, item: ItemRef) {
        self.require_prepared("push");
        {
            let mut state = self.shared.state.borrow_mut();
            let outgoing = Rc::clone(&state.current);
            state.previous = Some(outgoing);
            state.stack.push(Rc::clone(&item));
            state.current = item;
            debug!(
                item = state.current.label(),
                depth = state.stack.len(),
                "pushed bulletin item"
            );
        }
        self.refresh_current_item();
    }

    /// Pop the top item. With fewer than two items stacked this is
    /// [`pop_to_root_item`](Self::pop_to_root_item).
    #[track_caller]
    pub fn pop_item(&self) {
        self.require_prepared("pop_item");
        {
            let mut state = self.shared.state.borrow_mut();
            if state.stack.len() < 2 {
                drop(state);
                self.pop_to_root_item();
                return;
            }
            let popped = state.stack.pop();
            let Some(top) = state.stack.last().cloned() else {
                return;
            };
            state.previous = popped;
            state.current = top;
            debug!(
                item = state.current.label(),
                depth = state.stack.len(),
                "popped bulletin item"
            );
        }
        self.refresh_current_item();
    }

    /// Return to the root item. A no-op when the root is already current.
    #[track_caller]
    pub fn pop_to_root_item(&self) {
        self.require_prepared("pop_to_root_item");
        {
            let mut state = self.shared.state.borrow_mut();
            if BulletinItem::same(&state.current, &state.root) {
                debug!("already at root bulletin item");
                return;
            }
            let outgoing = Rc::clone(&state.current);
            state.previous = Some(outgoing);
            state.current = Rc::clone(&state.root);
            let cleared = state.stack.len();
            state.stack.clear();
            debug!(cleared, "popped to root bulletin item");
        }
        self.refresh_current_item();
    }

    /// Pop back to `item`.
    ///
    /// When `item` is stacked, everything above it is popped. When it is the
    /// root, this is [`pop_to_root_item`](Self::pop_to_root_item). Otherwise
    /// the bulletin is dismissed (`or_dismiss`) or popped to root.
    #[track_caller]
    pub fn pop_to(&self, item: &ItemRef, or_dismiss: bool) {
        self.require_prepared("pop_to");
        let target = {
            let state = self.state();
            if BulletinItem::same(item, &state.root) {
                PopTarget::Root
            } else {
                state
                    .stack
                    .iter()
                    .rposition(|stacked| BulletinItem::same(stacked, item))
                    .map_or(PopTarget::Missing, PopTarget::Stacked)
            }
        };
        match target {
            PopTarget::Root => self.pop_to_root_item(),
            PopTarget::Missing if or_dismiss => {
                debug!(item = item.label(), "item not stacked; dismissing");
                self.dismiss_bulletin(true);
            }
            PopTarget::Missing => {
                debug!(item = item.label(), "item not stacked; popping to root");
                self.pop_to_root_item();
            }
            PopTarget::Stacked(index) => {
                {
                    let mut state = self.shared.state.borrow_mut();
                    if BulletinItem::same(&state.current, item) {
                        return;
                    }
                    let outgoing = Rc::clone(&state.current);
                    state.previous = Some(outgoing);
                    state.stack.truncate(index + 1);
                    state.current = Rc::clone(item);
                    debug!(
                        item = item.label(),
                        depth = state.stack.len(),
                        "popped to bulletin item"
                    );
                }
                self.refresh_current_item();
            }
        }
    }

    /// Push the current item's `next` item.
    #[track_caller]
    pub fn display_next_item(&self) {
        self.require_prepared("display_next_item");
        let current = Rc::clone(&self.state().current);
        match current.next_item() {
            Some(next) => self.push(next),
            None => ContractViolation::MissingNextItem {
                current: current.label().to_owned(),
            }
            .raise(),
        }
    }

    // --- Activity indicator ---

    /// Show a blocking indicator over the card. The stack is unchanged; the
    /// next transition hides the indicator.
    #[track_caller]
    pub fn display_activity_indicator(&self, color: Rgba) {
        self.require_prepared("display_activity_indicator");
        let surface = self.surface_for("display_activity_indicator");
        surface.content().set_alpha(0.0);
        surface.display_activity_indicator(color);
        debug!(color = %color, "activity indicator shown");
    }

    #[track_caller]
    pub fn hide_activity_indicator(&self) {
        self.require_prepared("hide_activity_indicator");
        let surface = self.surface_for("hide_activity_indicator");
        surface.hide_activity_indicator();
        surface.content().set_alpha(1.0);
        debug!("activity indicator hidden");
    }

    // --- Content access ---

    /// Run `transform` with read-only access to the card's content.
    ///
    /// The view is borrowed for the call only. Panics from `transform`
    /// propagate unchanged.
    #[track_caller]
    pub fn with_content_view<R>(&self, transform: impl FnOnce(&ContentView<'_>) -> R) -> R {
        self.shared.thread.assert_current("with_content_view");
        let surface = self.surface_for("with_content_view");
        let view = ContentView::new(surface.content());
        transform(&view)
    }

    // --- Queries ---

    pub fn current_item(&self) -> ItemRef {
        Rc::clone(&self.state().current)
    }

    pub fn root_item(&self) -> ItemRef {
        Rc::clone(&self.state().root)
    }

    /// Pushed items, bottom first. The root is not included.
    pub fn stack_items(&self) -> Vec<ItemRef> {
        self.state().stack.clone()
    }

    pub fn stack_depth(&self) -> usize {
        self.state().stack.len()
    }

    pub fn is_prepared(&self) -> bool {
        self.state().is_prepared
    }

    /// Prepared and presented by a host.
    pub fn is_showing_bulletin(&self) -> bool {
        let state = self.state();
        state.is_prepared && state.is_presented
    }

    /// Dismissal requested, surface not yet done.
    pub fn is_dismissing(&self) -> bool {
        self.state().is_dismissing
    }

    /// Whether the last transition still has phases left to run.
    pub fn is_transitioning(&self) -> bool {
        let transition = self.state().transition;
        transition.is_some_and(|id| self.shared.scheduler.is_pending(id))
    }

    pub(crate) fn surface(&self) -> Option<Rc<dyn PresentationSurface>> {
        self.state().surface.clone()
    }

    pub fn config(&self) -> &BulletinConfig {
        &self.shared.config
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.shared.scheduler
    }
}

impl fmt::Debug for BulletinManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("BulletinManager")
            .field("root", &state.root.label())
            .field("current", &state.current.label())
            .field(
                "stack",
                &state.stack.iter().map(|i| i.label()).collect::<Vec<_>>(),
            )
            .field("is_prepared", &state.is_prepared)
            .field("is_dismissing", &state.is_dismissing)
            .field("is_presented", &state.is_presented)
            .field("has_surface", &state.surface.is_some())
            .finish()
    }
}
