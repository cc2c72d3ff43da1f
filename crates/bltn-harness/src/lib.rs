#![forbid(unsafe_code)]

//! Test support for bltn.
//!
//! - [`RecordingSurface`] / [`RecordingFactory`]: a surface that logs every
//!   call as a [`SurfaceEvent`] and can hold its dismissal completion.
//! - [`ScriptedItem`]: content with grouped elements and an [`ItemProbe`]
//!   counting builds and teardowns.
//! - [`ManualHost`]: a presentation host completing on request.
//! - [`ops`]: proptest strategies over stack operations.

pub mod host;
pub mod item;
pub mod ops;
pub mod surface;

use std::time::Duration;

use bltn_stack::{BulletinConfig, BulletinManager, ItemRef};

pub use host::ManualHost;
pub use item::{ItemProbe, ScriptedItem, link_chain};
pub use surface::{DismissMode, RecordingFactory, RecordingSurface, SurfaceEvent};

/// Manager with instant transitions and deferred dismissal.
pub fn instant_manager(root: ItemRef) -> (BulletinManager, RecordingFactory) {
    manager_with(root, BulletinConfig::new().reduced_motion(true), DismissMode::Deferred)
}

/// Manager animating over `duration` with deferred dismissal.
pub fn animated_manager(root: ItemRef, duration: Duration) -> (BulletinManager, RecordingFactory) {
    manager_with(
        root,
        BulletinConfig::new().transition_duration(duration),
        DismissMode::Deferred,
    )
}

pub fn manager_with(
    root: ItemRef,
    config: BulletinConfig,
    dismiss_mode: DismissMode,
) -> (BulletinManager, RecordingFactory) {
    let factory = RecordingFactory::new(dismiss_mode);
    let manager = BulletinManager::new(root, config, factory.clone());
    (manager, factory)
}

/// Run every pending animation step of `manager`'s scheduler.
pub fn settle(manager: &BulletinManager) {
    let later = manager.scheduler().now() + Duration::from_secs(60);
    manager.scheduler().tick(later);
}
