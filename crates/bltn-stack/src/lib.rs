#![forbid(unsafe_code)]

//! Item stack and transitions for bulletin cards.
//!
//! A [`BulletinManager`] shows one [`BulletinItem`] at a time on a
//! [`PresentationSurface`], supports push / pop / pop-to-root / pop-to-item,
//! cross-fades between items through a three-phase animation chain and tears
//! every item down once the bulletin is dismissed.
//!
//! Everything here is single-threaded: managers, items and surfaces are `Rc`
//! based and must stay on the UI thread that created the manager.

pub mod config;
pub mod error;
pub mod item;
pub mod manager;
pub mod surface;
mod teardown;
pub mod thread;
mod transition;
pub mod view;

pub use config::{
    BackgroundStyle, BlurStyle, BulletinConfig, CardAppearance, DEFAULT_CARD_CORNER_RADIUS,
    DEFAULT_TRANSITION_DURATION, EdgeSpacing, StatusBarAppearance,
};
pub use error::ContractViolation;
pub use item::{BulletinItem, DismissalHandler, FnContent, ItemContent, ItemRef};
pub use manager::{BulletinManager, WeakManager};
pub use surface::{
    Completion, PresentOptions, PresentationHost, PresentationSurface, SurfaceFactory,
};
pub use thread::UiThread;
pub use view::{ContentView, ElementSnapshot};
