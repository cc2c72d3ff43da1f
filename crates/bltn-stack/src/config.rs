#![forbid(unsafe_code)]

//! Presentation options of a bulletin.
//!
//! The manager itself only reads the transition timing; everything else is
//! handed to the [`SurfaceFactory`](crate::surface::SurfaceFactory) when the
//! surface is built. Surfaces resolve the chrome fields into a
//! [`CardAppearance`] through [`BulletinConfig::appearance`].

use std::env;
use std::time::Duration;

use bltn_core::Rgba;

/// Default total duration of a refresh transition.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(750);

/// Environment variable forcing instant transitions when set to a truthy value.
pub const ENV_REDUCED_MOTION: &str = "BLTN_REDUCED_MOTION";
/// Environment variable overriding the transition duration, in milliseconds.
pub const ENV_TRANSITION_MS: &str = "BLTN_TRANSITION_MS";

/// Blur material used by [`BackgroundStyle::Blurred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlurStyle {
    Light,
    #[default]
    Dark,
    ExtraLight,
    Regular,
    Prominent,
}

/// What sits between the host content and the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BackgroundStyle {
    None,
    #[default]
    Dimmed,
    Blurred(BlurStyle),
}

/// Status bar appearance while the bulletin is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusBarAppearance {
    #[default]
    Automatic,
    Hidden,
    Light,
    Dark,
}

/// Spacing between the card and the screen edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeSpacing {
    None,
    Compact,
    #[default]
    Regular,
}

impl EdgeSpacing {
    /// Spacing in points.
    #[must_use]
    pub const fn points(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Compact => 6.0,
            Self::Regular => 12.0,
        }
    }
}

/// Corner radius of a card inset from the screen edges, when not configured.
pub const DEFAULT_CARD_CORNER_RADIUS: f32 = 12.0;

/// Chrome a surface applies, resolved from a [`BulletinConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardAppearance {
    pub background_style: BackgroundStyle,
    pub background_color: Rgba,
    pub status_bar: StatusBarAppearance,
    pub hides_home_indicator: bool,
    /// Distance between the card and each screen edge, in points.
    pub edge_inset: f32,
    pub corner_radius: f32,
}

/// Options for one bulletin manager.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BulletinConfig {
    /// Total duration of a refresh transition.
    pub transition_duration: Duration,
    /// When set, transitions are instant.
    pub reduced_motion: bool,
    pub background_style: BackgroundStyle,
    /// Card background colour.
    pub background_color: Rgba,
    pub status_bar_appearance: StatusBarAppearance,
    pub hides_home_indicator: bool,
    /// Whether the swipe-to-dismiss gesture may be enabled for dismissable items.
    pub allows_swipe_interaction: bool,
    pub edge_spacing: EdgeSpacing,
    /// Card corner radius; `None` lets the surface pick.
    pub card_corner_radius: Option<f32>,
}

impl Default for BulletinConfig {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            reduced_motion: false,
            background_style: BackgroundStyle::default(),
            background_color: Rgba::WHITE,
            status_bar_appearance: StatusBarAppearance::default(),
            hides_home_indicator: false,
            allows_swipe_interaction: true,
            edge_spacing: EdgeSpacing::default(),
            card_corner_radius: None,
        }
    }
}

impl BulletinConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `BLTN_REDUCED_MOTION` / `BLTN_TRANSITION_MS` applied.
    #[must_use]
    pub fn from_env() -> Self {
        let reduced = env::var(ENV_REDUCED_MOTION).ok();
        let millis = env::var(ENV_TRANSITION_MS).ok();
        Self::default().with_overrides(reduced.as_deref(), millis.as_deref())
    }

    fn with_overrides(mut self, reduced_motion: Option<&str>, transition_ms: Option<&str>) -> Self {
        if let Some(flag) = reduced_motion.and_then(parse_flag) {
            self.reduced_motion = flag;
        }
        if let Some(ms) = transition_ms.and_then(|raw| raw.trim().parse::<u64>().ok()) {
            self.transition_duration = Duration::from_millis(ms);
        }
        self
    }

    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn background_style(mut self, style: BackgroundStyle) -> Self {
        self.background_style = style;
        self
    }

    pub fn background_color(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }

    pub fn status_bar_appearance(mut self, appearance: StatusBarAppearance) -> Self {
        self.status_bar_appearance = appearance;
        self
    }

    pub fn hides_home_indicator(mut self, hides: bool) -> Self {
        self.hides_home_indicator = hides;
        self
    }

    pub fn allows_swipe_interaction(mut self, allows: bool) -> Self {
        self.allows_swipe_interaction = allows;
        self
    }

    pub fn edge_spacing(mut self, spacing: EdgeSpacing) -> Self {
        self.edge_spacing = spacing;
        self
    }

    pub fn card_corner_radius(mut self, radius: f32) -> Self {
        self.card_corner_radius = Some(radius);
        self
    }

    /// Resolve the chrome fields for a surface.
    ///
    /// A card flush with the screen edges gets square corners unless a
    /// radius is configured; negative radii clamp to zero.
    #[must_use]
    pub fn appearance(&self) -> CardAppearance {
        let corner_radius = match (self.card_corner_radius, self.edge_spacing) {
            (Some(radius), _) => radius.max(0.0),
            (None, EdgeSpacing::None) => 0.0,
            (None, _) => DEFAULT_CARD_CORNER_RADIUS,
        };
        CardAppearance {
            background_style: self.background_style,
            background_color: self.background_color,
            status_bar: self.status_bar_appearance,
            hides_home_indicator: self.hides_home_indicator,
            edge_inset: self.edge_spacing.points(),
            corner_radius,
        }
    }

    /// Duration a non-initial transition actually takes.
    #[must_use]
    pub fn effective_transition_duration(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            self.transition_duration
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
