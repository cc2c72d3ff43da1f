#![forbid(unsafe_code)]

//! bltn: stacked, animated bulletin cards.
//!
//! A bulletin is a modal card that walks the user through a stack of items
//! (onboarding pages, permission prompts, confirmations). This crate
//! re-exports the element model from `bltn-core`, the animation scheduler
//! from `bltn-anim` and the stack manager from `bltn-stack`.
//!
//! ```rust,ignore
//! use bltn::prelude::*;
//!
//! let root = BulletinItem::from_fn("welcome", || vec![Element::new("title")]);
//! let manager = BulletinManager::new(root, BulletinConfig::from_env(), my_factory);
//! manager.show_bulletin(&mut host, true, None);
//! ```

pub use bltn_anim::{
    AnimationChain, AnimationCurve, AnimationPhase, AnimationScheduler, ChainId, PhaseProgress,
};
pub use bltn_core::{ContentContainer, Element, ElementFlags, ElementId, Rgba, flatten_hideable};
pub use bltn_stack::{
    BackgroundStyle, BlurStyle, BulletinConfig, BulletinItem, BulletinManager, CardAppearance,
    Completion, ContentView, ContractViolation, DEFAULT_TRANSITION_DURATION, DismissalHandler,
    EdgeSpacing, ElementSnapshot, FnContent, ItemContent, ItemRef, PresentOptions,
    PresentationHost, PresentationSurface, StatusBarAppearance, SurfaceFactory, UiThread,
    WeakManager,
};

/// Convenience re-exports for common usage.
///
/// ```rust,ignore
/// use bltn::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BulletinConfig, BulletinItem, BulletinManager, Completion, ContentView, Element,
        ItemContent, ItemRef, PresentationHost, PresentationSurface, Rgba, SurfaceFactory,
    };
}
