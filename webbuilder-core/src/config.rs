//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::drag::DEFAULT_GRID_SIZE;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::template::Theme;

/// Default offset applied to absolutely positioned duplicates, in pixels.
pub const DEFAULT_DUPLICATE_OFFSET: f64 = 20.0;

/// Tunables for an [`EditorSession`](crate::EditorSession).
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of undo entries.
    pub history_limit: usize,
    /// Snapping grid for drags; `None` disables snapping.
    pub grid_size: Option<f64>,
    /// How far a duplicated, absolutely positioned element is shifted.
    pub duplicate_offset: f64,
    /// Palette used for new components and templates.
    pub theme: Theme,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            grid_size: Some(DEFAULT_GRID_SIZE),
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            theme: Theme::default(),
        }
    }
}

impl SessionConfig {
    /// Override the history limit.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Override the snapping grid.
    #[must_use]
    pub fn with_grid_size(mut self, grid: Option<f64>) -> Self {
        self.grid_size = grid;
        self
    }

    /// Override the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"history_limit": 10, "theme": "light"}"#).expect("parse");
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.grid_size, Some(DEFAULT_GRID_SIZE));
        assert!((config.duplicate_offset - DEFAULT_DUPLICATE_OFFSET).abs() < f64::EPSILON);
    }
}
