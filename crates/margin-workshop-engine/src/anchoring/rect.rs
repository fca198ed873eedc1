use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box reported by the host's layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Translate this rectangle into the coordinate space of `container`.
    ///
    /// Only the origin moves; width and height are unchanged.
    #[must_use]
    pub fn relative_to(self, container: Rect) -> Rect {
        Rect {
            top: self.top - container.top,
            left: self.left - container.left,
            width: self.width,
            height: self.height,
        }
    }
}
