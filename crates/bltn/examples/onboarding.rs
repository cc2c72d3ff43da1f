#![forbid(unsafe_code)]

//! Walks an onboarding bulletin through its pages, printing the card after
//! every animation step.
//!
//! Run with `RUST_LOG=bltn_stack=debug cargo run -p bltn --example onboarding`.
//! `BLTN_REDUCED_MOTION=1` makes every transition instant.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use bltn::prelude::*;
use bltn::{CardAppearance, ContentContainer, EdgeSpacing, WeakManager, flatten_hideable};
use tracing_subscriber::EnvFilter;

/// Prints the card as indented text.
struct TextSurface {
    appearance: CardAppearance,
    content: ContentContainer,
    dismissable: Cell<bool>,
    indicator: Cell<Option<Rgba>>,
}

impl TextSurface {
    fn new(config: &BulletinConfig) -> Self {
        Self {
            appearance: config.appearance(),
            content: ContentContainer::new(),
            dismissable: Cell::new(false),
            indicator: Cell::new(None),
        }
    }

    fn render(&self, caption: &str) {
        let margin = " ".repeat(self.appearance.edge_inset as usize / 3);
        println!(
            "{margin}--- {caption} (dismissable: {}, radius {}) ---",
            self.dismissable.get(),
            self.appearance.corner_radius
        );
        if let Some(color) = self.indicator.get() {
            println!("{margin}  [activity {color}]");
        }
        for element in flatten_hideable(&self.content.elements()) {
            if element.is_hidden() {
                continue;
            }
            let indent = if element.is_group() { "" } else { "  " };
            println!(
                "{margin}  {indent}{} (alpha {:.2})",
                element.label(),
                element.alpha()
            );
        }
    }
}

impl PresentationSurface for TextSurface {
    fn attach_manager(&self, _manager: WeakManager) {}

    fn load_background_view(&self) {
        println!(
            "background {:?} behind a {} card",
            self.appearance.background_style, self.appearance.background_color
        );
    }

    fn display_activity_indicator(&self, color: Rgba) {
        self.indicator.set(Some(color));
    }

    fn hide_activity_indicator(&self) {
        self.indicator.set(None);
    }

    fn refresh_swipe_interaction(&self) {}

    fn set_dismissable(&self, dismissable: bool) {
        self.dismissable.set(dismissable);
    }

    fn is_dismissable(&self) -> bool {
        self.dismissable.get()
    }

    fn content(&self) -> &ContentContainer {
        &self.content
    }

    fn set_captures_status_bar_appearance(&self, captures: bool) {
        if captures {
            println!(
                "status bar {:?}, home indicator hidden: {}",
                self.appearance.status_bar, self.appearance.hides_home_indicator
            );
        }
    }

    fn dismiss(&self, animated: bool, completion: Completion) {
        println!("dismissing (animated: {animated})");
        completion();
    }

    fn post_screen_changed(&self, focus: Option<&Element>) {
        if let Some(focus) = focus {
            println!("screen changed, focus on {}", focus.label());
        }
    }

    fn release(&self) {
        println!("surface released");
    }
}

struct ImmediateHost;

impl PresentationHost for ImmediateHost {
    fn present(
        &mut self,
        _surface: Rc<dyn PresentationSurface>,
        options: bltn::PresentOptions,
        completion: Option<Completion>,
    ) {
        println!("presented (animated: {})", options.animated);
        if let Some(completion) = completion {
            completion();
        }
    }
}

fn page(label: &'static str, lines: &'static [&'static str]) -> ItemRef {
    BulletinItem::from_fn(label, move || {
        vec![
            Element::new(format!("{label}: title")),
            Element::group(
                format!("{label}: body"),
                lines.iter().map(|line| Element::new(*line)),
            ),
        ]
    })
}

fn step_through(manager: &BulletinManager, surface: &TextSurface, caption: &str) {
    let start = manager.scheduler().now();
    let mut elapsed = Duration::ZERO;
    while manager.is_transitioning() {
        elapsed += Duration::from_millis(125);
        manager.scheduler().tick(start + elapsed);
        surface.render(&format!("{caption} +{}ms", elapsed.as_millis()));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bltn_stack=info")),
        )
        .with_target(true)
        .init();

    let welcome = page("welcome", &["Stacked cards", "Animated swaps"]);
    let notifications = page("notifications", &["Allow alerts?"]);
    let done = page("done", &["All set"]);
    welcome.set_next_item(Some(Rc::clone(&notifications)));
    notifications.set_next_item(Some(Rc::clone(&done)));
    notifications.set_dismissable(false);
    done.set_dismissal_handler(|item| println!("dismissed on {}", item.label()));

    let config = BulletinConfig::from_env().edge_spacing(EdgeSpacing::Compact);
    let surface = Rc::new(TextSurface::new(&config));
    let shared = Rc::clone(&surface);
    let factory = move |_: &BulletinConfig| -> Rc<dyn PresentationSurface> {
        Rc::clone(&shared) as Rc<dyn PresentationSurface>
    };
    let manager = BulletinManager::new(welcome, config, factory);

    manager.show_bulletin(&mut ImmediateHost, true, None);
    surface.render("prepared");

    manager.display_next_item();
    step_through(&manager, &surface, "to notifications");

    manager.display_activity_indicator(Rgba::SYSTEM_GRAY);
    surface.render("waiting for permission");

    manager.display_next_item();
    step_through(&manager, &surface, "to done");

    manager.pop_to_root_item();
    step_through(&manager, &surface, "back to welcome");

    manager.push(Rc::clone(&done));
    step_through(&manager, &surface, "to done again");

    manager.dismiss_bulletin(true);
    println!(
        "prepared: {}, stack depth: {}",
        manager.is_prepared(),
        manager.stack_depth()
    );
}
