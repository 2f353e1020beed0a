//! Popup surface
//!
//! The single floating element that shows definitions. It is created once and lives for the
//! whole page; lookups only ever change its content, position and visibility.

use crate::shared::error::AppResult;
use crate::shared::types::Position;

/// Contract for the on-page popup.
///
/// `show` replaces the content, moves the popup and makes it visible. `hide` is idempotent.
/// Content is trusted: it always comes from `core::render`.
pub trait PopupSurface {
    fn show(&mut self, content: &str, position: Position) -> AppResult<()>;

    fn hide(&mut self) -> AppResult<()>;

    fn is_shown(&self) -> bool;
}

/// In-memory popup: visibility, position and the current HTML fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    pub visible: bool,
    pub position: Position,
    pub content: String,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PopupSurface for PopupState {
    fn show(&mut self, content: &str, position: Position) -> AppResult<()> {
        self.content = content.to_string();
        self.position = position;
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> AppResult<()> {
        self.visible = false;
        Ok(())
    }

    fn is_shown(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let popup = PopupState::new();
        assert!(!popup.is_shown());
        assert!(popup.content.is_empty());
    }

    #[test]
    fn test_show_sets_content_and_position() {
        let mut popup = PopupState::new();
        popup.show("<strong>cat</strong>", Position::new(15.0, 25.0)).unwrap();

        assert!(popup.is_shown());
        assert_eq!(popup.content, "<strong>cat</strong>");
        assert_eq!(popup.position, Position::new(15.0, 25.0));
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut popup = PopupState::new();
        popup.show("x", Position::default()).unwrap();

        popup.hide().unwrap();
        popup.hide().unwrap();

        assert!(!popup.is_shown());
        // Content survives hiding; the next show replaces it
        assert_eq!(popup.content, "x");
    }
}
