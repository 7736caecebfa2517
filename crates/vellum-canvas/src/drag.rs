//! Generic snapshot-based drag state machine.
//!
//! A [`DragController`] is either idle or dragging. Starting a drag
//! records a [`DragSnapshot`]: the pointer position and the subject's
//! state at that moment. Every subsequent move is computed from that
//! fixed snapshot plus the current pointer delta, never from the
//! previous frame, so rounding and clamping cannot accumulate.
//!
//! The controller is shared by the text overlay, the comparator slider,
//! the crop box, and panning.

use crate::types::{Point, Size};

/// Immutable record captured at gesture start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSnapshot<S> {
    /// Client position of the pointer when the gesture began.
    pub pointer: Point,
    /// The subject's state when the gesture began.
    pub subject: S,
}

/// Idle → Dragging → Idle.
#[derive(Debug, Clone)]
pub struct DragController<S> {
    snapshot: Option<DragSnapshot<S>>,
}

impl<S> Default for DragController<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DragController<S> {
    /// A controller in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self { snapshot: None }
    }

    /// Returns `true` between [`begin`](Self::begin) and [`end`](Self::end).
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The snapshot of the active gesture, if any.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&DragSnapshot<S>> {
        self.snapshot.as_ref()
    }

    /// Enter the dragging state, capturing the start snapshot.
    ///
    /// Beginning while already dragging replaces the snapshot; callers
    /// that need strict exclusion check [`is_dragging`](Self::is_dragging)
    /// first.
    pub fn begin(&mut self, pointer: Point, subject: S) {
        self.snapshot = Some(DragSnapshot { pointer, subject });
    }

    /// Return to idle. Returns `true` if a drag was active.
    pub fn end(&mut self) -> bool {
        self.snapshot.take().is_some()
    }

    /// The starting subject and the pointer delta from the snapshot.
    ///
    /// Returns `None` while idle.
    #[must_use]
    pub fn delta(&self, pointer: Point) -> Option<(&S, Point)> {
        self.snapshot
            .as_ref()
            .map(|snap| (&snap.subject, pointer - snap.pointer))
    }
}

/// Express `value` as a percentage of `extent`.
///
/// A zero or negative extent yields `0.0` rather than a non-finite value.
#[must_use]
pub fn to_percent(value: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        value / extent * 100.0
    } else {
        0.0
    }
}

/// Convert a percentage of `extent` back into pixels.
#[must_use]
pub fn from_percent(percent: f64, extent: f64) -> f64 {
    percent * extent / 100.0
}

/// Compute a dragged subject's new position in percent of its container.
///
/// `start` is the subject's position in container pixels at gesture
/// start and `delta` is the pointer movement since then. Each axis is
/// clamped to `[0, 100]` independently.
#[must_use]
pub fn percent_position(start: Point, delta: Point, container: Size) -> Point {
    let moved = start + delta;
    Point::new(
        to_percent(moved.x, container.width).clamp(0.0, 100.0),
        to_percent(moved.y, container.height).clamp(0.0, 100.0),
    )
}
