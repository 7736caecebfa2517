//! Pointer unification: mouse and touch in, one `(x, y)` stream out.
//!
//! Drag-initiating input is normalised with [`normalize_start`], which
//! ignores non-primary mouse buttons and reads only the first touch
//! point. Moves go through [`normalize_move`]. Ending is unconditional
//! and carries no position.
//!
//! Move/end events are only observed while a gesture is active: a
//! [`PointerTracker`] acquires a [`PointerCapture`] guard on start and
//! drops it on end. Because release happens in the guard's `Drop`, the
//! global listeners are removed on every exit path, including the
//! tracker itself being dropped mid-gesture.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Mouse button that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    /// Usually the wheel button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
    /// Back/forward and other extra buttons.
    Other,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub const fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            _ => Self::Other,
        }
    }
}

/// Which device family an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerSource {
    /// Mouse, pen emulating a mouse, trackpad.
    Mouse,
    /// Touch screen.
    Touch,
}

/// Input as delivered by the host, before unification.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPointer {
    /// A mouse event at a client position.
    Mouse {
        /// Button that changed state (ignored for moves).
        button: MouseButton,
        /// Client position.
        position: Point,
    },
    /// A touch event with the current touch points in client space.
    Touch {
        /// Active touch points, in the order the host reports them.
        touches: Vec<Point>,
    },
}

/// A unified pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Originating device family.
    pub source: PointerSource,
    /// Client position.
    pub position: Point,
}

/// Normalise an interaction-start event.
///
/// Returns `None` for non-primary mouse buttons and for touch events
/// without any touch point.
#[must_use]
pub fn normalize_start(raw: &RawPointer) -> Option<PointerEvent> {
    match raw {
        RawPointer::Mouse { button, position } => {
            (*button == MouseButton::Primary).then_some(PointerEvent {
                source: PointerSource::Mouse,
                position: *position,
            })
        }
        RawPointer::Touch { touches } => first_touch(touches),
    }
}

/// Normalise a move event. The mouse button is not consulted.
#[must_use]
pub fn normalize_move(raw: &RawPointer) -> Option<PointerEvent> {
    match raw {
        RawPointer::Mouse { position, .. } => Some(PointerEvent {
            source: PointerSource::Mouse,
            position: *position,
        }),
        RawPointer::Touch { touches } => first_touch(touches),
    }
}

/// Phase of an input event within a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerPhase {
    /// Button down or touch start.
    Start,
    /// Pointer or touch moved.
    Move,
    /// Button up or touch end.
    End,
}

/// Normalise a raw event for the given phase.
///
/// Start events go through [`normalize_start`]; move and end events
/// through [`normalize_move`]. An end with no remaining touch point
/// yields `None`, but ending a gesture never depends on a position, so
/// hosts call [`PointerTracker::end`] regardless.
#[must_use]
pub fn normalize(raw: &RawPointer, phase: PointerPhase) -> Option<PointerEvent> {
    match phase {
        PointerPhase::Start => normalize_start(raw),
        PointerPhase::Move | PointerPhase::End => normalize_move(raw),
    }
}

fn first_touch(touches: &[Point]) -> Option<PointerEvent> {
    touches.first().map(|&position| PointerEvent {
        source: PointerSource::Touch,
        position,
    })
}

/// A process-wide input surface that can route move/end events to the
/// active gesture.
///
/// `capture` subscribes the global listeners and returns a guard; the
/// guard's `Drop` must unsubscribe them.
pub trait PointerCapture {
    /// RAII handle for the subscription.
    type Guard;
    /// Error raised when the surface cannot subscribe.
    type Error: std::error::Error;

    /// Subscribe to global move/end events.
    ///
    /// # Errors
    ///
    /// Returns the surface's error when the listeners cannot be installed.
    fn capture(&self) -> Result<Self::Guard, Self::Error>;
}

/// Owns at most one active capture and the last observed position.
pub struct PointerTracker<C: PointerCapture> {
    surface: C,
    guard: Option<C::Guard>,
    source: Option<PointerSource>,
    last: Option<Point>,
}

impl<C: PointerCapture> PointerTracker<C> {
    /// Create an idle tracker over `surface`.
    pub const fn new(surface: C) -> Self {
        Self {
            surface,
            guard: None,
            source: None,
            last: None,
        }
    }

    /// Returns `true` while a capture is held.
    pub const fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Last position seen during the active (or most recent) gesture.
    pub const fn last_position(&self) -> Option<Point> {
        self.last
    }

    /// Device family of the active gesture.
    pub const fn source(&self) -> Option<PointerSource> {
        self.source
    }

    /// The underlying surface.
    pub const fn surface(&self) -> &C {
        &self.surface
    }

    /// Acquire the capture for a new gesture.
    ///
    /// Returns `Ok(false)` without touching the surface when a gesture
    /// already holds the capture.
    ///
    /// # Errors
    ///
    /// Propagates the surface's error when subscription fails.
    pub fn begin(&mut self, event: PointerEvent) -> Result<bool, C::Error> {
        if self.guard.is_some() {
            log::warn!("pointer capture requested while another gesture is active");
            return Ok(false);
        }
        self.guard = Some(self.surface.capture()?);
        self.source = Some(event.source);
        self.last = Some(event.position);
        Ok(true)
    }

    /// Record a move. Ignored while idle.
    pub fn track(&mut self, event: PointerEvent) -> Option<Point> {
        if self.guard.is_none() {
            return None;
        }
        self.last = Some(event.position);
        self.last
    }

    /// Release the capture. Returns `true` if one was held.
    pub fn end(&mut self) -> bool {
        self.source = None;
        self.guard.take().is_some()
    }
}
