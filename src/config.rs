//! Editor configuration.

use crate::error::{Error, Result};
use crate::unicode::WidthMethod;

/// Default tab width in columns.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Settings that affect editing arithmetic and history retention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    /// Columns occupied by a tab character.
    pub tab_size: usize,
    /// How East-Asian ambiguous-width code points are measured.
    pub width_method: WidthMethod,
    /// Maximum number of retained undo versions. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            width_method: WidthMethod::WcWidth,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    #[must_use]
    pub fn with_width_method(mut self, method: WidthMethod) -> Self {
        self.width_method = method;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Reject settings that would make column math or history degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.tab_size == 0 {
            return Err(Error::InvalidConfig(
                "tab size must be at least 1".to_string(),
            ));
        }
        if self.history_limit == Some(0) {
            return Err(Error::InvalidConfig(
                "history limit must keep at least one version".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.width_method, WidthMethod::WcWidth);
        assert_eq!(config.history_limit, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EditorConfig::new()
            .with_tab_size(8)
            .with_width_method(WidthMethod::Unicode)
            .with_history_limit(100);
        assert_eq!(config.tab_size, 8);
        assert_eq!(config.width_method, WidthMethod::Unicode);
        assert_eq!(config.history_limit, Some(100));
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        assert!(matches!(
            EditorConfig::new().with_tab_size(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            EditorConfig::new().with_history_limit(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
