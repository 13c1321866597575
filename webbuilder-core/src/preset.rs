//! Page-wide style presets.
//!
//! A preset never touches elements; it only yields the CSS custom
//! properties (`--color-primary`, `--font-heading`, ...) the page reads.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named colour and font scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    /// Modern Clean.
    Modern,
    /// Midnight Dark.
    Midnight,
    /// Playful Bright.
    Playful,
    /// Business Pro.
    Professional,
}

/// Colours of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetColors {
    /// Accent colour.
    pub primary: &'static str,
    /// Secondary accent.
    pub secondary: &'static str,
    /// Page background.
    pub background: &'static str,
    /// Card surfaces.
    pub surface: &'static str,
    /// Body text.
    pub text: &'static str,
    /// Muted text.
    pub text_secondary: &'static str,
    /// Borders.
    pub border: &'static str,
}

impl StylePreset {
    /// Every preset.
    pub const ALL: [Self; 4] = [Self::Modern, Self::Midnight, Self::Playful, Self::Professional];

    /// Identifier, e.g. `midnight`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Midnight => "midnight",
            Self::Playful => "playful",
            Self::Professional => "professional",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Modern => "Modern Clean",
            Self::Midnight => "Midnight Dark",
            Self::Playful => "Playful Bright",
            Self::Professional => "Business Pro",
        }
    }

    /// The preset's colours.
    #[must_use]
    pub const fn colors(self) -> PresetColors {
        match self {
            Self::Modern => PresetColors {
                primary: "#6366f1",
                secondary: "#4f46e5",
                background: "#ffffff",
                surface: "#f8fafc",
                text: "#1e293b",
                text_secondary: "#64748b",
                border: "#e2e8f0",
            },
            Self::Midnight => PresetColors {
                primary: "#8b5cf6",
                secondary: "#7c3aed",
                background: "#0f172a",
                surface: "#1e293b",
                text: "#f8fafc",
                text_secondary: "#94a3b8",
                border: "#334155",
            },
            Self::Playful => PresetColors {
                primary: "#ec4899",
                secondary: "#db2777",
                background: "#fffafb",
                surface: "#fff1f2",
                text: "#881337",
                text_secondary: "#be185d",
                border: "#fecdd3",
            },
            Self::Professional => PresetColors {
                primary: "#0f172a",
                secondary: "#334155",
                background: "#ffffff",
                surface: "#f1f5f9",
                text: "#0f172a",
                text_secondary: "#475569",
                border: "#cbd5e1",
            },
        }
    }

    /// Heading and body font stacks.
    #[must_use]
    pub const fn fonts(self) -> (&'static str, &'static str) {
        match self {
            Self::Modern | Self::Professional => ("'Inter', sans-serif", "'Inter', sans-serif"),
            Self::Midnight => ("'Space Grotesk', sans-serif", "'Inter', sans-serif"),
            Self::Playful => ("'DM Sans', sans-serif", "'DM Sans', sans-serif"),
        }
    }

    /// Font families the preset's stacks need loaded.
    #[must_use]
    pub fn font_families(self) -> Vec<&'static str> {
        match self {
            Self::Modern | Self::Professional => vec!["Inter"],
            Self::Midnight => vec!["Space Grotesk", "Inter"],
            Self::Playful => vec!["DM Sans"],
        }
    }

    /// CSS custom properties in declaration order.
    #[must_use]
    pub fn variables(self) -> Vec<(&'static str, &'static str)> {
        let c = self.colors();
        let (heading, body) = self.fonts();
        vec![
            ("--color-primary", c.primary),
            ("--color-secondary", c.secondary),
            ("--color-background", c.background),
            ("--color-surface", c.surface),
            ("--color-text", c.text),
            ("--color-text-secondary", c.text_secondary),
            ("--color-border", c.border),
            ("--font-heading", heading),
            ("--font-body", body),
        ]
    }

    /// Look a preset up by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }
}

impl FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(&s.to_ascii_lowercase()).ok_or_else(|| format!("unknown style preset: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_cover_colors_and_fonts() {
        let vars = StylePreset::Midnight.variables();
        assert_eq!(vars.len(), 9);
        assert!(vars.contains(&("--color-background", "#0f172a")));
        assert!(vars.contains(&("--font-heading", "'Space Grotesk', sans-serif")));
    }

    #[test]
    fn test_font_families_match_stacks() {
        for preset in StylePreset::ALL {
            let (heading, body) = preset.fonts();
            for family in preset.font_families() {
                assert!(heading.contains(family) || body.contains(family));
            }
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Playful".parse::<StylePreset>(), Ok(StylePreset::Playful));
        assert!("neon".parse::<StylePreset>().is_err());
    }
}
