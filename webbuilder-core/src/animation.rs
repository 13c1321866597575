//! Entrance animation presets.

use serde::{Deserialize, Serialize};

/// A named animation an element can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationPreset {
    /// Fade in.
    FadeIn,
    /// Slide up into place.
    SlideUp,
    /// Slide in from the right.
    SlideInRight,
    /// Zoom in.
    ZoomIn,
    /// Bounce.
    Bounce,
    /// Pulse.
    Pulse,
}

impl AnimationPreset {
    /// Every preset.
    pub const ALL: [Self; 6] = [
        Self::FadeIn,
        Self::SlideUp,
        Self::SlideInRight,
        Self::ZoomIn,
        Self::Bounce,
        Self::Pulse,
    ];

    /// Key stored on elements, e.g. `fadeIn`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::SlideUp => "slideUp",
            Self::SlideInRight => "slideInRight",
            Self::ZoomIn => "zoomIn",
            Self::Bounce => "bounce",
            Self::Pulse => "pulse",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FadeIn => "Fade In",
            Self::SlideUp => "Slide Up",
            Self::SlideInRight => "Slide In Right",
            Self::ZoomIn => "Zoom In",
            Self::Bounce => "Bounce",
            Self::Pulse => "Pulse",
        }
    }

    /// CSS class that plays the animation.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::FadeIn => "anim-fade-in",
            Self::SlideUp => "anim-slide-up",
            Self::SlideInRight => "anim-slide-in-right",
            Self::ZoomIn => "anim-zoom-in",
            Self::Bounce => "anim-bounce",
            Self::Pulse => "anim-pulse",
        }
    }

    /// Look a preset up by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }
}
