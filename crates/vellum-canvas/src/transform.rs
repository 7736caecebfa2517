//! Pan/zoom transform engine.
//!
//! All functions here are pure: the hosting view owns the current
//! [`Transform`] and [`FitMetrics`] and feeds them back in. The
//! transform maps image-box pixels (the letterboxed image at unit scale)
//! to container pixels:
//!
//! ```text
//! container = image * scale + (x, y)
//! ```

use serde::{Deserialize, Serialize};

use crate::drag::DragController;
use crate::types::{CanvasConfig, Point, Size};

/// Tolerance used when deciding whether a transform differs from the fit.
const TRANSFORM_EPSILON: f64 = 1e-9;

/// Scale plus translation, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Zoom factor, clamped to the configured range by [`zoom`].
    pub scale: f64,
    /// Horizontal translation in container pixels.
    pub x: f64,
    /// Vertical translation in container pixels.
    pub y: f64,
}

impl Transform {
    /// Unit scale, no translation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0);

    /// Create a new transform.
    #[must_use]
    pub const fn new(scale: f64, x: f64, y: f64) -> Self {
        Self { scale, x, y }
    }

    /// Map an image-box point to container space.
    #[must_use]
    pub fn image_to_container(self, p: Point) -> Point {
        Point::new(p.x.mul_add(self.scale, self.x), p.y.mul_add(self.scale, self.y))
    }

    /// Map a container-space point back to image-box space.
    #[must_use]
    pub fn container_to_image(self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Letterboxed size and position of an image inside its container at
/// unit scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Displayed width in container pixels.
    pub width: f64,
    /// Displayed height in container pixels.
    pub height: f64,
    /// Left offset that centres the image horizontally.
    pub initial_x: f64,
    /// Top offset; always `0.0` (the image is pinned to the top).
    pub initial_y: f64,
}

impl FitMetrics {
    /// The transform that shows the image exactly fitted.
    #[must_use]
    pub const fn fit_transform(&self) -> Transform {
        Transform::new(1.0, self.initial_x, self.initial_y)
    }

    /// Displayed size at unit scale.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `false` for the zero metrics produced by degenerate inputs.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        !self.size().is_empty()
    }
}

/// Fit an image of `natural` size into `container`.
///
/// When the container is wider (relative to its height) than the image,
/// the image fills the container height; otherwise it fills the width.
/// The image is centred horizontally and pinned to the top so tall
/// results are never pushed above the fold.
///
/// Degenerate inputs (any zero or non-finite side) produce zeroed metrics.
#[must_use]
pub fn compute_fit(natural: Size, container: Size) -> FitMetrics {
    if natural.is_empty() || container.is_empty() {
        return FitMetrics::default();
    }

    let container_ratio = container.width / container.height;
    let image_ratio = natural.width / natural.height;

    let (width, height) = if container_ratio > image_ratio {
        (container.height * image_ratio, container.height)
    } else {
        (container.width, container.width / image_ratio)
    };

    FitMetrics {
        width,
        height,
        initial_x: (container.width - width) / 2.0,
        initial_y: 0.0,
    }
}

/// Zoom toward `pointer` (container-relative) by a wheel delta.
///
/// The image-space point under the pointer stays under the pointer:
/// `(pointer - t) / scale` is identical before and after. Positive
/// deltas (scrolling down) zoom out. The new scale is clamped to
/// `[config.min_scale, config.max_scale]`.
#[must_use]
pub fn zoom(
    transform: Transform,
    pointer: Point,
    wheel_delta: f64,
    config: &CanvasConfig,
) -> Transform {
    let anchor = transform.container_to_image(pointer);
    let new_scale = wheel_delta
        .mul_add(-config.zoom_sensitivity, transform.scale)
        .clamp(config.min_scale, config.max_scale);

    Transform::new(
        new_scale,
        anchor.x.mul_add(-new_scale, pointer.x),
        anchor.y.mul_add(-new_scale, pointer.y),
    )
}

/// Translate the transform captured at gesture start by a pointer delta.
#[must_use]
pub fn pan(start: Transform, dx: f64, dy: f64) -> Transform {
    Transform::new(start.scale, start.x + dx, start.y + dy)
}

/// `true` when the view differs from the fitted view.
#[must_use]
pub fn is_transformed(transform: Transform, metrics: &FitMetrics) -> bool {
    (transform.scale - 1.0).abs() > TRANSFORM_EPSILON
        || (transform.x - metrics.initial_x).abs() > TRANSFORM_EPSILON
        || (transform.y - metrics.initial_y).abs() > TRANSFORM_EPSILON
}

/// A pan gesture in progress.
#[derive(Debug, Clone, Default)]
pub struct PanGesture {
    drag: DragController<Transform>,
}

impl PanGesture {
    /// An idle pan gesture.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            drag: DragController::new(),
        }
    }

    /// Start panning from `pointer` with the view at `transform`.
    pub fn begin(&mut self, pointer: Point, transform: Transform) {
        self.drag.begin(pointer, transform);
    }

    /// The panned transform for the current pointer position.
    #[must_use]
    pub fn update(&self, pointer: Point) -> Option<Transform> {
        self.drag
            .delta(pointer)
            .map(|(start, delta)| pan(*start, delta.x, delta.y))
    }

    /// Stop panning.
    pub fn end(&mut self) -> bool {
        self.drag.end()
    }

    /// Returns `true` while a pan is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.drag.is_dragging()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn fit_width_filled_for_wide_image() {
        let m = compute_fit(Size::new(1600.0, 800.0), Size::new(800.0, 600.0));
        assert!(approx(m.width, 800.0));
        assert!(approx(m.height, 400.0));
        assert!(approx(m.initial_x, 0.0));
        assert!(approx(m.initial_y, 0.0));
        assert_eq!(m.fit_transform(), Transform::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn fit_height_filled_and_centred_for_tall_image() {
        let m = compute_fit(Size::new(500.0, 1000.0), Size::new(800.0, 600.0));
        assert!(approx(m.height, 600.0));
        assert!(approx(m.width, 300.0));
        assert!(approx(m.initial_x, 250.0));
        assert!(approx(m.initial_y, 0.0), "tall images stay pinned to the top");
    }

    #[test]
    fn fit_equal_aspect_fills_exactly() {
        let m = compute_fit(Size::new(400.0, 300.0), Size::new(800.0, 600.0));
        assert!(approx(m.width, 800.0));
        assert!(approx(m.height, 600.0));
        assert!(approx(m.initial_x, 0.0));
    }

    #[test]
    fn fit_degenerate_inputs_are_zero() {
        assert!(!compute_fit(Size::new(0.0, 10.0), Size::new(800.0, 600.0)).is_measured());
        assert!(!compute_fit(Size::new(10.0, 10.0), Size::new(800.0, 0.0)).is_measured());
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let config = CanvasConfig::default();
        let transforms = [
            Transform::new(1.0, 0.0, 0.0),
            Transform::new(2.5, -120.0, 40.0),
            Transform::new(0.5, 300.0, -10.0),
            Transform::new(9.9, -4000.0, -2500.0),
        ];
        let pointers = [
            Point::new(0.0, 0.0),
            Point::new(400.0, 300.0),
            Point::new(799.0, 17.5),
        ];
        let deltas = [-500.0, -100.0, -3.0, 0.0, 3.0, 100.0, 2000.0];

        for t in transforms {
            for p in pointers {
                for d in deltas {
                    let before = t.container_to_image(p);
                    let z = zoom(t, p, d, &config);
                    let after = z.container_to_image(p);
                    assert!(
                        (before.x - after.x).abs() < 1e-6 && (before.y - after.y).abs() < 1e-6,
                        "anchor drifted for t={t:?} p={p:?} d={d}: {before:?} -> {after:?}"
                    );
                    assert!(z.scale >= config.min_scale && z.scale <= config.max_scale);
                }
            }
        }
    }

    #[test]
    fn zoom_direction_and_linearity() {
        let config = CanvasConfig::default();
        let t = Transform::IDENTITY;
        let z = zoom(t, Point::ZERO, -100.0, &config);
        assert!(approx(z.scale, 1.1), "negative delta zooms in, got {}", z.scale);
        let z = zoom(t, Point::ZERO, 100.0, &config);
        assert!(approx(z.scale, 0.9));
    }

    #[test]
    fn zoom_clamps_scale() {
        let config = CanvasConfig::default();
        let z = zoom(Transform::IDENTITY, Point::new(10.0, 10.0), 1e6, &config);
        assert!(approx(z.scale, 0.5));
        let z = zoom(Transform::IDENTITY, Point::new(10.0, 10.0), -1e6, &config);
        assert!(approx(z.scale, 10.0));
    }

    #[test]
    fn pan_translates_from_start() {
        let start = Transform::new(2.0, 10.0, 20.0);
        let t = pan(start, 5.0, -7.0);
        assert_eq!(t, Transform::new(2.0, 15.0, 13.0));
    }

    #[test]
    fn pan_gesture_uses_fixed_snapshot() {
        let mut g = PanGesture::new();
        assert!(g.update(Point::ZERO).is_none());
        g.begin(Point::new(100.0, 100.0), Transform::new(1.5, 0.0, 0.0));
        for _ in 0..1000 {
            let _ = g.update(Point::new(100.3, 99.7));
        }
        let t = g.update(Point::new(110.0, 90.0)).unwrap();
        assert!(approx(t.x, 10.0));
        assert!(approx(t.y, -10.0));
        assert!(approx(t.scale, 1.5));
        assert!(g.end());
        assert!(!g.is_active());
    }

    #[test]
    fn is_transformed_tracks_fit() {
        let m = compute_fit(Size::new(500.0, 1000.0), Size::new(800.0, 600.0));
        assert!(!is_transformed(m.fit_transform(), &m));
        assert!(is_transformed(Transform::new(1.0, 0.0, 0.0), &m));
        assert!(is_transformed(Transform::new(1.2, m.initial_x, 0.0), &m));
    }

    #[test]
    fn image_container_round_trip() {
        let t = Transform::new(3.0, 12.0, -4.0);
        let p = Point::new(7.0, 9.0);
        let back = t.container_to_image(t.image_to_container(p));
        assert!(approx(back.x, p.x) && approx(back.y, p.y));
    }
}
