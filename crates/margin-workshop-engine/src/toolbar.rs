//! Placement of the floating action toolbar above a selection.

use crate::anchoring::Rect;
use crate::annotations::AnnotationKind;

/// Toolbar dimensions in host units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarLayout {
    pub width: f32,
    pub height: f32,
    /// Gap between the toolbar and the top of the selection.
    pub margin: f32,
}

impl Default for ToolbarLayout {
    fn default() -> Self {
        Self {
            width: 220.0,
            height: 44.0,
            margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarPosition {
    pub top: f32,
    pub left: f32,
}

/// Center the toolbar horizontally over the selection, just above it.
///
/// `rect` is the anchor's rectangle, already relative to the container the
/// toolbar is positioned in.
pub fn toolbar_position(rect: Rect, layout: ToolbarLayout) -> ToolbarPosition {
    ToolbarPosition {
        top: rect.top - layout.height - layout.margin,
        left: rect.left + rect.width / 2.0 - layout.width / 2.0,
    }
}

/// Buttons offered on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Highlight,
    Strikethrough,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 2] = [ToolbarAction::Highlight, ToolbarAction::Strikethrough];

    pub fn kind(self) -> AnnotationKind {
        match self {
            ToolbarAction::Highlight => AnnotationKind::Highlight,
            ToolbarAction::Strikethrough => AnnotationKind::Strikethrough,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolbarAction::Highlight => "Highlight",
            ToolbarAction::Strikethrough => "Strike",
        }
    }
}
