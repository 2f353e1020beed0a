use serde::{Deserialize, Serialize};

/// A point in page coordinates (CSS pixels, relative to the document origin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift both axes by the same amount
    pub fn offset_by(self, delta: f64) -> Self {
        Self {
            x: self.x + delta,
            y: self.y + delta,
        }
    }

    /// CSS `left` value
    pub fn css_left(&self) -> String {
        format!("{}px", self.x)
    }

    /// CSS `top` value
    pub fn css_top(&self) -> String {
        format!("{}px", self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_by_moves_both_axes() {
        let pos = Position::new(100.0, 240.0).offset_by(5.0);
        assert_eq!(pos, Position::new(105.0, 245.0));
    }

    #[test]
    fn test_css_values() {
        let pos = Position::new(12.0, 7.5);
        assert_eq!(pos.css_left(), "12px");
        assert_eq!(pos.css_top(), "7.5px");
    }
}
