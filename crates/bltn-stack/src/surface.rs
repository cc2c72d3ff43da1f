#![forbid(unsafe_code)]

//! Collaborator traits for the on-screen side of a bulletin.
//!
//! A [`PresentationSurface`] owns the card: content container, activity
//! indicator, background and swipe-to-dismiss gesture. The manager drives it
//! through `&self` methods, so implementations keep their state in `Cell` /
//! `RefCell`.
//!
//! # Invariants
//!
//! - The manager never holds one of its own borrows while calling into a
//!   surface, factory or host; implementations may call back into the manager.
//! - `dismiss` must invoke its completion exactly once, synchronously or
//!   later.

use std::rc::Rc;

use bltn_core::{ContentContainer, Element, Rgba};

use crate::config::BulletinConfig;
use crate::manager::WeakManager;

/// One-shot callback handed to surfaces and hosts.
pub type Completion = Box<dyn FnOnce()>;

/// The card shown on screen.
pub trait PresentationSurface {
    /// Called once, right after the surface is created.
    fn attach_manager(&self, _manager: WeakManager) {}

    fn load_background_view(&self);

    /// Show a blocking indicator on top of the card.
    fn display_activity_indicator(&self, color: Rgba);

    fn hide_activity_indicator(&self);

    /// Re-evaluate whether the swipe-to-dismiss gesture is enabled.
    fn refresh_swipe_interaction(&self);

    fn set_dismissable(&self, dismissable: bool);

    fn is_dismissable(&self) -> bool;

    /// The card's content container.
    fn content(&self) -> &ContentContainer;

    fn set_captures_status_bar_appearance(&self, _captures: bool) {}

    /// Dismiss the card, then call `completion`.
    fn dismiss(&self, animated: bool, completion: Completion);

    /// Accessibility notification that the card's content changed.
    fn post_screen_changed(&self, _focus: Option<&Element>) {}

    /// Drop the background view, the manager back-reference and any
    /// transition delegate.
    fn release(&self);
}

/// Builds a fresh surface on every `prepare()`.
pub trait SurfaceFactory {
    fn make_surface(&mut self, config: &BulletinConfig) -> Rc<dyn PresentationSurface>;
}

impl<F> SurfaceFactory for F
where
    F: FnMut(&BulletinConfig) -> Rc<dyn PresentationSurface>,
{
    fn make_surface(&mut self, config: &BulletinConfig) -> Rc<dyn PresentationSurface> {
        self(config)
    }
}

/// Options for [`PresentationHost::present`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentOptions {
    pub animated: bool,
    /// Let the surface drive the status bar while on screen.
    pub captures_status_bar_appearance: bool,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            animated: true,
            captures_status_bar_appearance: true,
        }
    }
}

/// The host screen a bulletin is presented above.
pub trait PresentationHost {
    /// Put `surface` on screen and call `completion` once it is visible.
    fn present(
        &mut self,
        surface: Rc<dyn PresentationSurface>,
        options: PresentOptions,
        completion: Option<Completion>,
    );
}
