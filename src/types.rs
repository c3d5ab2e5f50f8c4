use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementRect {
    /// A box with zero width or height is not rendered.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// The subset of computed style the visibility filter looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
        }
    }
}

impl ComputedStyle {
    pub fn hides(&self) -> bool {
        self.display.eq_ignore_ascii_case("none") || self.visibility.eq_ignore_ascii_case("hidden")
    }
}

/// Location and title of the page a snapshot was taken from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageIdentity {
    pub url: String,
    pub title: String,
}

impl PageIdentity {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_rect_has_no_area() {
        let rect = ElementRect {
            x: 10.0,
            y: 10.0,
            width: 0.0,
            height: 20.0,
        };
        assert!(!rect.has_area());
        assert!(ElementRect {
            width: 1.0,
            height: 1.0,
            ..rect
        }
        .has_area());
    }

    #[test]
    fn hidden_styles() {
        let mut style = ComputedStyle::default();
        assert!(!style.hides());
        style.visibility = "HIDDEN".to_string();
        assert!(style.hides());
        style.visibility = "visible".to_string();
        style.display = "none".to_string();
        assert!(style.hides());
    }
}
