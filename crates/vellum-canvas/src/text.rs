//! Draggable text label anchored to the image box in percent coordinates.

use serde::{Deserialize, Serialize};

use crate::drag::{DragController, from_percent, percent_position};
use crate::types::{Point, Size, TextDefaults};

/// Text overlay attributes.
///
/// The overlay is never destroyed: a non-empty `text` is what makes it
/// active, and deleting it only clears `text` so color, size, and font
/// carry over to the next label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlayState {
    /// Label content. Empty means the tool is inactive.
    pub text: String,
    /// CSS color string.
    pub color: String,
    /// Font size as a percentage of the image box width.
    pub size: f64,
    /// CSS font family.
    pub font: String,
    /// Horizontal anchor, percent of the image box width.
    pub x: f64,
    /// Vertical anchor, percent of the image box height.
    pub y: f64,
}

impl From<&TextDefaults> for TextOverlayState {
    fn from(d: &TextDefaults) -> Self {
        Self {
            text: String::new(),
            color: d.color.clone(),
            size: d.size,
            font: d.font.clone(),
            x: d.x,
            y: d.y,
        }
    }
}

impl Default for TextOverlayState {
    fn default() -> Self {
        Self::from(&TextDefaults::default())
    }
}

/// Text overlay state plus its drag controller.
#[derive(Debug, Clone, Default)]
pub struct TextOverlay {
    state: TextOverlayState,
    drag: DragController<Point>,
}

impl TextOverlay {
    /// Wrap existing overlay state.
    #[must_use]
    pub const fn new(state: TextOverlayState) -> Self {
        Self {
            state,
            drag: DragController::new(),
        }
    }

    /// Current attributes.
    #[must_use]
    pub const fn state(&self) -> &TextOverlayState {
        &self.state
    }

    /// Mutable attributes, for the external text editor.
    pub const fn state_mut(&mut self) -> &mut TextOverlayState {
        &mut self.state
    }

    /// Replace the label content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.state.text = text.into();
    }

    /// `true` when there is a label to show.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.state.text.is_empty()
    }

    /// Returns `true` while the label is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Clear the label, keeping color/size/font/position for reuse.
    ///
    /// Any drag in progress ends.
    pub fn delete(&mut self) {
        self.state.text.clear();
        self.drag.end();
    }

    /// Start dragging from `pointer` inside an image box of `container`
    /// size. Refused while inactive.
    pub fn begin_drag(&mut self, pointer: Point, container: Size) -> bool {
        if !self.is_active() {
            return false;
        }
        let start = Point::new(
            from_percent(self.state.x, container.width),
            from_percent(self.state.y, container.height),
        );
        self.drag.begin(pointer, start);
        log::debug!("text drag started at ({:.2}%, {:.2}%)", self.state.x, self.state.y);
        true
    }

    /// Move the label to follow `pointer`; returns the new percent position.
    pub fn drag_to(&mut self, pointer: Point, container: Size) -> Option<Point> {
        let (&start, delta) = self.drag.delta(pointer)?;
        let p = percent_position(start, delta, container);
        self.state.x = p.x;
        self.state.y = p.y;
        Some(p)
    }

    /// Stop dragging.
    pub fn end_drag(&mut self) -> bool {
        self.drag.end()
    }

    /// Rendered font size in pixels for an image box `container_width` wide.
    #[must_use]
    pub fn font_size_px(&self, container_width: f64) -> f64 {
        from_percent(self.state.size, container_width)
    }
}
