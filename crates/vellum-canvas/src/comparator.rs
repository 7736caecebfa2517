//! Before/after comparison slider.
//!
//! The "after" image is the full-opacity base layer; the "before" image
//! sits on top, clipped so only the left `position%` shows. The slider
//! position is derived purely from the pointer X relative to the
//! comparator container.

use crate::drag::DragController;
use crate::types::{Dimensions, Point, Rect};

/// Slider position used before any interaction.
pub const DEFAULT_POSITION: f64 = 50.0;

/// Slider position for a pointer at client `pointer_x`.
///
/// `clamp(pointer_x - left, 0, width) / width * 100`; a zero-width
/// container yields `0.0`.
#[must_use]
pub fn slider_position(pointer_x: f64, container_left: f64, container_width: f64) -> f64 {
    if container_width <= 0.0 {
        return 0.0;
    }
    (pointer_x - container_left).clamp(0.0, container_width) / container_width * 100.0
}

/// Comparator slider state.
#[derive(Debug, Clone)]
pub struct Comparator {
    position: f64,
    after: Option<Dimensions>,
    drag: DragController<f64>,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// A centred slider with no known "after" dimensions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: DEFAULT_POSITION,
            after: None,
            drag: DragController::new(),
        }
    }

    /// Slider position in percent of the container width.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Returns `true` while the slider is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Jump the slider to `pointer` and start dragging.
    ///
    /// A press anywhere on the comparator moves the slider there.
    pub fn begin(&mut self, pointer: Point, container: Rect) -> f64 {
        self.drag.begin(pointer, self.position);
        self.position = slider_position(pointer.x, container.left, container.width);
        self.position
    }

    /// Follow the pointer while dragging.
    pub fn update(&mut self, pointer: Point, container: Rect) -> Option<f64> {
        if !self.drag.is_dragging() {
            return None;
        }
        self.position = slider_position(pointer.x, container.left, container.width);
        Some(self.position)
    }

    /// Stop dragging.
    pub fn end(&mut self) -> bool {
        self.drag.end()
    }

    /// Right inset of the "before" layer's clip region, in percent.
    ///
    /// Hosts render it as `clip-path: inset(0 {inset}% 0 0)`.
    #[must_use]
    pub fn clip_inset(&self) -> f64 {
        100.0 - self.position
    }

    /// Record the "after" image's natural size once it has loaded.
    pub const fn set_after_dimensions(&mut self, dimensions: Dimensions) {
        self.after = Some(dimensions);
    }

    /// Container aspect ratio, known once the "after" image has loaded.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.after.and_then(Dimensions::aspect_ratio)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const RECT: Rect = Rect::new(100.0, 40.0, 400.0, 300.0);

    #[test]
    fn position_is_clamped_at_edges() {
        assert!((slider_position(500.0, 100.0, 400.0) - 100.0).abs() < EPS);
        assert!((slider_position(9_999.0, 100.0, 400.0) - 100.0).abs() < EPS);
        assert!(slider_position(100.0, 100.0, 400.0).abs() < EPS);
        assert!(slider_position(-50.0, 100.0, 400.0).abs() < EPS);
        assert!((slider_position(200.0, 100.0, 400.0) - 25.0).abs() < EPS);
    }

    #[test]
    fn zero_width_container() {
        assert!(slider_position(10.0, 0.0, 0.0).abs() < EPS);
    }

    #[test]
    fn press_jumps_slider() {
        let mut c = Comparator::new();
        assert!((c.position() - 50.0).abs() < EPS);
        let p = c.begin(Point::new(400.0, 90.0), RECT);
        assert!((p - 75.0).abs() < EPS);
        assert!(c.is_dragging());
    }

    #[test]
    fn update_only_while_dragging() {
        let mut c = Comparator::new();
        assert!(c.update(Point::new(200.0, 0.0), RECT).is_none());
        c.begin(Point::new(200.0, 0.0), RECT);
        let p = c.update(Point::new(700.0, 0.0), RECT).unwrap();
        assert!((p - 100.0).abs() < EPS);
        assert!(c.end());
        assert!(c.update(Point::new(100.0, 0.0), RECT).is_none());
        assert!((c.position() - 100.0).abs() < EPS);
    }

    #[test]
    fn clip_inset_complements_position() {
        let mut c = Comparator::new();
        c.begin(Point::new(200.0, 0.0), RECT);
        assert!((c.clip_inset() - 75.0).abs() < EPS);
    }

    #[test]
    fn aspect_ratio_follows_after_image() {
        let mut c = Comparator::new();
        assert!(c.aspect_ratio().is_none());
        c.set_after_dimensions(Dimensions::new(1024, 768));
        assert!((c.aspect_ratio().unwrap() - 1024.0 / 768.0).abs() < EPS);
    }
}
