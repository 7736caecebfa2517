//! Crop box controller: a move mode plus eight anchor-edge resize handles.
//!
//! The rectangle lives in percent of the image box. After every update
//! the invariants hold:
//!
//! - `width, height ∈ [min_size, 100]`
//! - `x ∈ [0, 100 - width]`, `y ∈ [0, 100 - height]`
//!
//! Size is clamped before position. During a resize, the size clamp's
//! upper bound is the room remaining on the dragged side and near-edge
//! positions are derived from the fixed opposite edge, so the edge
//! opposite the handle never moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::drag::{DragController, to_percent};
use crate::types::{Dimensions, Point, Size};

/// Crop rectangle in percent of the image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge (percent).
    pub x: f64,
    /// Top edge (percent).
    pub y: f64,
    /// Width (percent).
    pub width: f64,
    /// Height (percent).
    pub height: f64,
}

impl CropRect {
    /// Create a rectangle without clamping.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from an `[x, y, width, height]` array.
    #[must_use]
    pub const fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Right edge (percent).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (percent).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Apply the crop invariants: size first, then position.
    #[must_use]
    pub fn clamped(self, min_size: f64) -> Self {
        let width = self.width.clamp(min_size, 100.0);
        let height = self.height.clamp(min_size, 100.0);
        Self {
            x: self.x.clamp(0.0, 100.0 - width),
            y: self.y.clamp(0.0, 100.0 - height),
            width,
            height,
        }
    }

    /// `true` when every invariant holds (with a small float tolerance).
    #[must_use]
    pub fn is_valid(&self, min_size: f64) -> bool {
        const TOL: f64 = 1e-9;
        self.width >= min_size - TOL
            && self.width <= 100.0 + TOL
            && self.height >= min_size - TOL
            && self.height <= 100.0 + TOL
            && self.x >= -TOL
            && self.y >= -TOL
            && self.right() <= 100.0 + TOL
            && self.bottom() <= 100.0 + TOL
    }

    /// Convert to whole pixels of an image with `natural` dimensions.
    ///
    /// The result is at least one pixel in each dimension and never
    /// extends past the image.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn to_pixels(&self, natural: Dimensions) -> PixelCrop {
        let to_px = |percent: f64, extent: u32| -> u32 {
            (percent / 100.0 * f64::from(extent))
                .round()
                .clamp(0.0, f64::from(extent)) as u32
        };
        let x = to_px(self.x, natural.width).min(natural.width.saturating_sub(1));
        let y = to_px(self.y, natural.height).min(natural.height.saturating_sub(1));
        let width = to_px(self.width, natural.width)
            .max(1)
            .min(natural.width.saturating_sub(x));
        let height = to_px(self.height, natural.height)
            .max(1)
            .min(natural.height.saturating_sub(y));
        PixelCrop {
            x,
            y,
            width,
            height,
        }
    }
}

/// A crop rectangle in natural image pixels, for consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelCrop {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropHandle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl CropHandle {
    /// All handles, corners first.
    pub const ALL: [Self; 8] = [
        Self::Nw,
        Self::Ne,
        Self::Se,
        Self::Sw,
        Self::N,
        Self::E,
        Self::S,
        Self::W,
    ];

    /// Short identifier, also used as the DOM `data-handle` value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::Ne => "ne",
            Self::Nw => "nw",
            Self::Se => "se",
            Self::Sw => "sw",
        }
    }

    /// CSS cursor shown over the handle.
    #[must_use]
    pub const fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }

    /// Whether the handle drags the left edge.
    #[must_use]
    pub const fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Whether the handle drags the right edge.
    #[must_use]
    pub const fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether the handle drags the top edge.
    #[must_use]
    pub const fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether the handle drags the bottom edge.
    #[must_use]
    pub const fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

impl fmt::Display for CropHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown handle name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crop handle: {0:?}")]
pub struct UnknownHandle(pub String);

impl FromStr for CropHandle {
    type Err = UnknownHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.name() == s)
            .ok_or_else(|| UnknownHandle(s.to_owned()))
    }
}

/// What a crop gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropGrab {
    /// The body of the rectangle.
    Move,
    /// One of the resize handles.
    Resize(CropHandle),
}

impl From<Option<CropHandle>> for CropGrab {
    fn from(handle: Option<CropHandle>) -> Self {
        handle.map_or(Self::Move, Self::Resize)
    }
}

#[derive(Debug, Clone, Copy)]
struct CropStart {
    rect: CropRect,
    grab: CropGrab,
}

/// Crop rectangle plus its move/resize gesture state.
#[derive(Debug, Clone)]
pub struct CropController {
    rect: CropRect,
    default_rect: CropRect,
    min_size: f64,
    drag: DragController<CropStart>,
}

impl CropController {
    /// A controller showing `initial` (clamped) with the given minimum size.
    #[must_use]
    pub fn new(initial: CropRect, min_size: f64) -> Self {
        let rect = initial.clamped(min_size);
        Self {
            rect,
            default_rect: rect,
            min_size,
            drag: DragController::new(),
        }
    }

    /// Current rectangle.
    #[must_use]
    pub const fn rect(&self) -> CropRect {
        self.rect
    }

    /// Minimum width/height in percent.
    #[must_use]
    pub const fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Handle (or move) grabbed by the active gesture.
    #[must_use]
    pub fn grab(&self) -> Option<CropGrab> {
        self.drag.snapshot().map(|s| s.subject.grab)
    }

    /// Returns `true` while a gesture is active.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Replace the rectangle, applying the invariants.
    pub fn set_rect(&mut self, rect: CropRect) {
        self.rect = rect.clamped(self.min_size);
    }

    /// Restore the initial rectangle and drop any gesture.
    pub fn reset(&mut self) {
        self.drag.end();
        self.rect = self.default_rect;
    }

    /// Start a move (`None`) or resize gesture.
    pub fn begin(&mut self, pointer: Point, handle: Option<CropHandle>) {
        let grab = CropGrab::from(handle);
        log::debug!("crop gesture started: {grab:?}");
        self.drag.begin(
            pointer,
            CropStart {
                rect: self.rect,
                grab,
            },
        );
    }

    /// Apply the pointer position to the rectangle.
    ///
    /// `container` is the on-screen size of the image box; pointer
    /// deltas are converted to percent of it. Returns the new rectangle,
    /// or `None` while idle.
    pub fn update(&mut self, pointer: Point, container: Size) -> Option<CropRect> {
        let (start, delta) = self.drag.delta(pointer)?;
        let dx = to_percent(delta.x, container.width);
        let dy = to_percent(delta.y, container.height);

        let next = match start.grab {
            CropGrab::Move => CropRect {
                x: start.rect.x + dx,
                y: start.rect.y + dy,
                ..start.rect
            }
            .clamped(self.min_size),
            CropGrab::Resize(handle) => resize(start.rect, handle, dx, dy, self.min_size),
        };

        debug_assert!(
            next.is_valid(self.min_size),
            "crop invariant violated: {next:?}"
        );
        self.rect = next;
        Some(next)
    }

    /// End the gesture, clearing the drag flag and the handle identity.
    pub fn end(&mut self) -> bool {
        self.drag.end()
    }
}

impl Default for CropController {
    fn default() -> Self {
        Self::new(CropRect::from_array([10.0, 10.0, 80.0, 80.0]), 5.0)
    }
}

/// Anchor-edge resize of `start` by percent deltas.
fn resize(start: CropRect, handle: CropHandle, dx: f64, dy: f64, min_size: f64) -> CropRect {
    let mut width = start.width;
    let mut height = start.height;
    let mut max_width = 100.0;
    let mut max_height = 100.0;

    if handle.moves_left() {
        width = start.width - dx;
        max_width = start.right();
    } else if handle.moves_right() {
        width = start.width + dx;
        max_width = 100.0 - start.x;
    }
    if handle.moves_top() {
        height = start.height - dy;
        max_height = start.bottom();
    } else if handle.moves_bottom() {
        height = start.height + dy;
        max_height = 100.0 - start.y;
    }

    // Size first.
    let width = width.clamp(min_size, max_width.max(min_size));
    let height = height.clamp(min_size, max_height.max(min_size));

    // Near edges follow from the fixed far edge.
    let x = if handle.moves_left() {
        start.right() - width
    } else {
        start.x
    };
    let y = if handle.moves_top() {
        start.bottom() - height
    } else {
        start.y
    };

    CropRect::new(x, y, width, height).clamped(min_size)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const BOX: Size = Size::new(1000.0, 500.0);

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn controller(rect: CropRect) -> CropController {
        CropController::new(rect, 5.0)
    }

    /// Pointer position that produces the given percent deltas in `BOX`.
    fn at(dx_pct: f64, dy_pct: f64) -> Point {
        Point::new(dx_pct * BOX.width / 100.0, dy_pct * BOX.height / 100.0)
    }

    #[test]
    fn move_translates() {
        let mut c = controller(CropRect::new(10.0, 10.0, 50.0, 50.0));
        c.begin(Point::ZERO, None);
        let r = c.update(at(5.0, 7.0), BOX).unwrap();
        assert!(approx(r.x, 15.0) && approx(r.y, 17.0));
        assert!(approx(r.width, 50.0) && approx(r.height, 50.0));
    }

    #[test]
    fn move_clamps_inside_box() {
        let mut c = controller(CropRect::new(10.0, 10.0, 50.0, 50.0));
        c.begin(Point::ZERO, None);
        let r = c.update(at(200.0, -200.0), BOX).unwrap();
        assert!(approx(r.x, 50.0));
        assert!(approx(r.y, 0.0));
        assert!(approx(r.width, 50.0));
    }

    #[test]
    fn left_handle_keeps_right_edge() {
        let start = CropRect::new(20.0, 20.0, 60.0, 60.0);
        for dx in [-50.0, -20.0, -5.0, 0.0, 10.0, 40.0, 55.0, 58.0, 90.0] {
            let mut c = controller(start);
            c.begin(Point::ZERO, Some(CropHandle::W));
            let r = c.update(at(dx, 0.0), BOX).unwrap();
            assert!(approx(r.right(), 80.0), "dx={dx}: right moved to {}", r.right());
            assert!(r.is_valid(5.0), "dx={dx}: {r:?}");
        }
    }

    #[test]
    fn right_handle_keeps_left_edge() {
        let start = CropRect::new(20.0, 20.0, 60.0, 60.0);
        for dx in [-90.0, -56.0, -10.0, 0.0, 15.0, 50.0] {
            let mut c = controller(start);
            c.begin(Point::ZERO, Some(CropHandle::E));
            let r = c.update(at(dx, 0.0), BOX).unwrap();
            assert!(approx(r.x, 20.0), "dx={dx}: left moved to {}", r.x);
            assert!(r.is_valid(5.0));
        }
    }

    #[test]
    fn top_and_bottom_handles_anchor_opposite_edge() {
        let start = CropRect::new(10.0, 30.0, 50.0, 40.0);
        for dy in [-60.0, -10.0, 0.0, 20.0, 80.0] {
            let mut c = controller(start);
            c.begin(Point::ZERO, Some(CropHandle::N));
            let r = c.update(at(0.0, dy), BOX).unwrap();
            assert!(approx(r.bottom(), 70.0), "N dy={dy}: {r:?}");

            let mut c = controller(start);
            c.begin(Point::ZERO, Some(CropHandle::S));
            let r = c.update(at(0.0, dy), BOX).unwrap();
            assert!(approx(r.y, 30.0), "S dy={dy}: {r:?}");
        }
    }

    #[test]
    fn corner_resizes_both_axes() {
        let mut c = controller(CropRect::new(20.0, 20.0, 40.0, 40.0));
        c.begin(Point::ZERO, Some(CropHandle::Nw));
        let r = c.update(at(-10.0, -5.0), BOX).unwrap();
        assert!(approx(r.x, 10.0) && approx(r.width, 50.0));
        assert!(approx(r.y, 15.0) && approx(r.height, 45.0));

        let mut c = controller(CropRect::new(20.0, 20.0, 40.0, 40.0));
        c.begin(Point::ZERO, Some(CropHandle::Se));
        let r = c.update(at(10.0, 5.0), BOX).unwrap();
        assert!(approx(r.x, 20.0) && approx(r.width, 50.0));
        assert!(approx(r.y, 20.0) && approx(r.height, 45.0));
    }

    #[test]
    fn resize_never_inverts() {
        let mut c = controller(CropRect::new(40.0, 40.0, 20.0, 20.0));
        c.begin(Point::ZERO, Some(CropHandle::Se));
        let r = c.update(at(-100.0, -100.0), BOX).unwrap();
        assert!(approx(r.width, 5.0) && approx(r.height, 5.0));
        assert!(approx(r.x, 40.0) && approx(r.y, 40.0));
    }

    #[test]
    fn clamp_invariant_holds_for_gesture_sequences() {
        let deltas = [-150.0, -37.5, -5.0, -0.1, 0.0, 0.1, 3.3, 49.0, 120.0];
        let grabs: Vec<Option<CropHandle>> = std::iter::once(None)
            .chain(CropHandle::ALL.into_iter().map(Some))
            .collect();

        let mut c = controller(CropRect::new(10.0, 10.0, 80.0, 80.0));
        for (i, grab) in grabs.iter().cycle().take(90).enumerate() {
            c.begin(Point::ZERO, *grab);
            for (j, dx) in deltas.iter().enumerate() {
                let dy = deltas[(i + j) % deltas.len()];
                let r = c.update(at(*dx, dy), BOX).unwrap();
                assert!(r.is_valid(5.0), "grab={grab:?} dx={dx} dy={dy}: {r:?}");
            }
            c.end();
            assert!(c.rect().is_valid(5.0));
        }
    }

    #[test]
    fn zero_movement_is_idempotent() {
        let start = CropRect::new(12.5, 33.0, 41.0, 27.0);
        for grab in std::iter::once(None).chain(CropHandle::ALL.into_iter().map(Some)) {
            let mut c = controller(start);
            c.begin(Point::new(300.0, 200.0), grab);
            c.update(Point::new(900.0, -50.0), BOX);
            let r = c.update(Point::new(300.0, 200.0), BOX).unwrap();
            assert!(
                approx(r.x, start.x)
                    && approx(r.y, start.y)
                    && approx(r.width, start.width)
                    && approx(r.height, start.height),
                "grab={grab:?}: {r:?}"
            );
        }
    }

    #[test]
    fn end_clears_grab() {
        let mut c = CropController::default();
        c.begin(Point::ZERO, Some(CropHandle::Ne));
        assert_eq!(c.grab(), Some(CropGrab::Resize(CropHandle::Ne)));
        assert!(c.end());
        assert_eq!(c.grab(), None);
        assert!(!c.is_dragging());
        assert!(c.update(Point::new(5.0, 5.0), BOX).is_none());
    }

    #[test]
    fn clamped_orders_size_before_position() {
        // Too large and mispositioned at once.
        let r = CropRect::new(-20.0, 98.0, 130.0, 2.0).clamped(5.0);
        assert!(approx(r.width, 100.0) && approx(r.x, 0.0));
        assert!(approx(r.height, 5.0) && approx(r.y, 95.0));
    }

    #[test]
    fn set_rect_and_reset() {
        let mut c = CropController::default();
        c.set_rect(CropRect::new(90.0, 90.0, 50.0, 50.0));
        assert!(approx(c.rect().x, 50.0));
        c.reset();
        assert_eq!(c.rect(), CropRect::new(10.0, 10.0, 80.0, 80.0));
    }

    #[test]
    fn to_pixels_rounds_and_stays_inside() {
        let r = CropRect::new(10.0, 25.0, 50.0, 75.0);
        let px = r.to_pixels(Dimensions::new(1600, 800));
        assert_eq!(
            px,
            PixelCrop {
                x: 160,
                y: 200,
                width: 800,
                height: 600
            }
        );
        let tiny = CropRect::new(95.0, 95.0, 5.0, 5.0).to_pixels(Dimensions::new(3, 3));
        assert!(tiny.x + tiny.width <= 3 && tiny.y + tiny.height <= 3);
        assert!(tiny.width >= 1 && tiny.height >= 1);
    }

    #[test]
    fn handle_names_round_trip() {
        for h in CropHandle::ALL {
            assert_eq!(h.name().parse::<CropHandle>().unwrap(), h);
            assert_eq!(h.to_string(), h.name());
        }
        assert!("middle".parse::<CropHandle>().is_err());
    }

    #[test]
    fn handle_edges() {
        assert!(CropHandle::Nw.moves_left() && CropHandle::Nw.moves_top());
        assert!(!CropHandle::N.moves_left() && !CropHandle::N.moves_right());
        assert!(CropHandle::Se.moves_right() && CropHandle::Se.moves_bottom());
        assert!((CropRect::new(1.0, 2.0, 3.0, 4.0).bottom() - 6.0).abs() < EPS);
    }
}
