#![forbid(unsafe_code)]

//! A surface that records every call the manager makes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bltn_core::{ContentContainer, Element, Rgba};
use bltn_stack::{
    BackgroundStyle, BulletinConfig, CardAppearance, Completion, PresentationSurface,
    StatusBarAppearance, WeakManager,
};
use tracing::trace;

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    AttachManager,
    LoadBackgroundView {
        style: BackgroundStyle,
        color: Rgba,
    },
    DisplayActivityIndicator(Rgba),
    HideActivityIndicator,
    RefreshSwipeInteraction { enabled: bool },
    SetDismissable(bool),
    /// `appearance` is what the status bar shows after the call.
    CapturesStatusBarAppearance {
        captures: bool,
        appearance: StatusBarAppearance,
    },
    Dismiss { animated: bool },
    ScreenChanged(Option<String>),
    Release,
}

/// How [`RecordingSurface::dismiss`] reports completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DismissMode {
    /// Call the completion inside `dismiss`.
    Immediate,
    /// Hold the completion until [`RecordingSurface::complete_dismissal`].
    #[default]
    Deferred,
}

/// Surface double that logs [`SurfaceEvent`]s.
pub struct RecordingSurface {
    config: BulletinConfig,
    appearance: CardAppearance,
    status_bar: Cell<StatusBarAppearance>,
    content: ContentContainer,
    dismissable: Cell<bool>,
    swipe_enabled: Cell<bool>,
    indicator: Cell<Option<Rgba>>,
    background_loaded: Cell<bool>,
    manager: RefCell<Option<WeakManager>>,
    dismiss_mode: DismissMode,
    pending_dismissal: RefCell<Option<Completion>>,
    released: Cell<bool>,
    events: RefCell<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new(config: &BulletinConfig, dismiss_mode: DismissMode) -> Self {
        Self {
            config: config.clone(),
            appearance: config.appearance(),
            status_bar: Cell::new(StatusBarAppearance::Automatic),
            content: ContentContainer::new(),
            dismissable: Cell::new(false),
            swipe_enabled: Cell::new(false),
            indicator: Cell::new(None),
            background_loaded: Cell::new(false),
            manager: RefCell::new(None),
            dismiss_mode,
            pending_dismissal: RefCell::new(None),
            released: Cell::new(false),
            events: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, event: SurfaceEvent) {
        trace!(?event, "surface event");
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    /// Dismissable values set so far, in order.
    pub fn dismissable_history(&self) -> Vec<bool> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::SetDismissable(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn swipe_enabled(&self) -> bool {
        self.swipe_enabled.get()
    }

    pub fn indicator(&self) -> Option<Rgba> {
        self.indicator.get()
    }

    /// Chrome resolved from the config the surface was built with.
    pub fn appearance(&self) -> CardAppearance {
        self.appearance
    }

    /// Status bar appearance currently in effect.
    pub fn status_bar(&self) -> StatusBarAppearance {
        self.status_bar.get()
    }

    pub fn background_loaded(&self) -> bool {
        self.background_loaded.get()
    }

    pub fn has_manager(&self) -> bool {
        self.manager.borrow().is_some()
    }

    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    pub fn has_pending_dismissal(&self) -> bool {
        self.pending_dismissal.borrow().is_some()
    }

    /// Report a deferred dismissal as finished. Returns `false` if none was
    /// pending.
    pub fn complete_dismissal(&self) -> bool {
        let completion = self.pending_dismissal.borrow_mut().take();
        match completion {
            Some(completion) => {
                completion();
                true
            }
            None => false,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.content
            .elements()
            .iter()
            .map(|e| e.label().to_owned())
            .collect()
    }
}

impl PresentationSurface for RecordingSurface {
    fn attach_manager(&self, manager: WeakManager) {
        *self.manager.borrow_mut() = Some(manager);
        self.record(SurfaceEvent::AttachManager);
    }

    fn load_background_view(&self) {
        self.background_loaded.set(true);
        self.record(SurfaceEvent::LoadBackgroundView {
            style: self.appearance.background_style,
            color: self.appearance.background_color,
        });
    }

    fn display_activity_indicator(&self, color: Rgba) {
        self.indicator.set(Some(color));
        self.record(SurfaceEvent::DisplayActivityIndicator(color));
    }

    fn hide_activity_indicator(&self) {
        self.indicator.set(None);
        self.record(SurfaceEvent::HideActivityIndicator);
    }

    fn refresh_swipe_interaction(&self) {
        let enabled = self.config.allows_swipe_interaction && self.dismissable.get();
        self.swipe_enabled.set(enabled);
        self.record(SurfaceEvent::RefreshSwipeInteraction { enabled });
    }

    fn set_dismissable(&self, dismissable: bool) {
        self.dismissable.set(dismissable);
        self.record(SurfaceEvent::SetDismissable(dismissable));
    }

    fn is_dismissable(&self) -> bool {
        self.dismissable.get()
    }

    fn content(&self) -> &ContentContainer {
        &self.content
    }

    fn set_captures_status_bar_appearance(&self, captures: bool) {
        let appearance = if captures {
            self.appearance.status_bar
        } else {
            StatusBarAppearance::Automatic
        };
        self.status_bar.set(appearance);
        self.record(SurfaceEvent::CapturesStatusBarAppearance {
            captures,
            appearance,
        });
    }

    fn dismiss(&self, animated: bool, completion: Completion) {
        self.record(SurfaceEvent::Dismiss { animated });
        match self.dismiss_mode {
            DismissMode::Immediate => completion(),
            DismissMode::Deferred => *self.pending_dismissal.borrow_mut() = Some(completion),
        }
    }

    fn post_screen_changed(&self, focus: Option<&Element>) {
        self.record(SurfaceEvent::ScreenChanged(
            focus.map(|e| e.label().to_owned()),
        ));
    }

    fn release(&self) {
        self.background_loaded.set(false);
        *self.manager.borrow_mut() = None;
        self.released.set(true);
        self.record(SurfaceEvent::Release);
    }
}

/// Factory handing out [`RecordingSurface`]s and remembering them.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    dismiss_mode: DismissMode,
    made: Rc<RefCell<Vec<Rc<RecordingSurface>>>>,
}

impl RecordingFactory {
    pub fn new(dismiss_mode: DismissMode) -> Self {
        Self {
            dismiss_mode,
            made: Rc::default(),
        }
    }

    /// Every surface built so far, oldest first.
    pub fn surfaces(&self) -> Vec<Rc<RecordingSurface>> {
        self.made.borrow().clone()
    }

    /// The most recently built surface.
    pub fn last(&self) -> Option<Rc<RecordingSurface>> {
        self.made.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.made.borrow().len()
    }
}

impl bltn_stack::SurfaceFactory for RecordingFactory {
    fn make_surface(&mut self, config: &BulletinConfig) -> Rc<dyn PresentationSurface> {
        let surface = Rc::new(RecordingSurface::new(config, self.dismiss_mode));
        self.made.borrow_mut().push(Rc::clone(&surface));
        surface
    }
}
