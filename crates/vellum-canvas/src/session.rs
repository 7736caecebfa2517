//! The canvas host: one image, one transform, one active tool.
//!
//! [`CanvasSession`] owns every controller and the [`ToolMode`] that
//! selects which of them receives pointer input. A gesture starts on
//! [`pointer_down`](CanvasSession::pointer_down) over a [`HitTarget`],
//! acquires the pointer capture, and releases it on
//! [`pointer_up`](CanvasSession::pointer_up), on a tool switch, or when
//! the session is dropped.

use crate::comparator::Comparator;
use crate::crop::{CropController, CropHandle, CropRect, PixelCrop};
use crate::mask::{self, MaskState};
use crate::payload::ImagePayload;
use crate::pointer::{PointerCapture, PointerTracker, RawPointer, normalize_move, normalize_start};
use crate::text::{TextOverlay, TextOverlayState};
use crate::tool::ToolMode;
use crate::transform::{self, FitMetrics, PanGesture, Transform};
use crate::types::{CanvasConfig, CanvasError, Dimensions, Point, Rect, Size};

/// The element a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The image or empty container area.
    Canvas,
    /// The text label body.
    Text,
    /// The text label's delete button.
    TextDelete,
    /// The crop box body (`None`) or one of its handles.
    Crop(Option<CropHandle>),
    /// The comparator container.
    Comparator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Pan,
    Text,
    Crop(Option<CropHandle>),
    Slider,
}

/// Canvas interaction state for one displayed image.
pub struct CanvasSession<C: PointerCapture> {
    config: CanvasConfig,
    mode: ToolMode,
    container: Rect,
    comparator_box: Option<Rect>,
    natural: Option<Dimensions>,
    metrics: FitMetrics,
    transform: Transform,
    pan: PanGesture,
    text: TextOverlay,
    crop: CropController,
    comparator: Comparator,
    mask: MaskState,
    tracker: PointerTracker<C>,
    active: Option<Gesture>,
}

impl<C: PointerCapture> CanvasSession<C> {
    /// Create a session with no image and an unmeasured container.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] when `config` fails validation.
    pub fn new(config: CanvasConfig, surface: C) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::build(config, surface))
    }

    /// Create a session with the default configuration.
    pub fn with_default_config(surface: C) -> Self {
        Self::build(CanvasConfig::default(), surface)
    }

    fn build(config: CanvasConfig, surface: C) -> Self {
        Self {
            text: TextOverlay::new(TextOverlayState::from(&config.text)),
            crop: CropController::new(
                CropRect::from_array(config.default_crop),
                config.min_crop_size,
            ),
            mask: MaskState::new(config.default_brush_size),
            config,
            mode: ToolMode::None,
            container: Rect::default(),
            comparator_box: None,
            natural: None,
            metrics: FitMetrics::default(),
            transform: Transform::IDENTITY,
            pan: PanGesture::new(),
            comparator: Comparator::new(),
            tracker: PointerTracker::new(surface),
            active: None,
        }
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Current tool.
    #[must_use]
    pub const fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Current pan/zoom transform.
    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Current fit metrics.
    #[must_use]
    pub const fn metrics(&self) -> FitMetrics {
        self.metrics
    }

    /// Natural size of the loaded image.
    #[must_use]
    pub const fn natural(&self) -> Option<Dimensions> {
        self.natural
    }

    /// Client rectangle of the container.
    #[must_use]
    pub const fn container(&self) -> Rect {
        self.container
    }

    /// Returns `true` while a gesture holds the pointer capture.
    #[must_use]
    pub const fn is_gesture_active(&self) -> bool {
        self.active.is_some()
    }

    /// Text overlay state.
    #[must_use]
    pub const fn text(&self) -> &TextOverlay {
        &self.text
    }

    /// Mutable text overlay, for edits from the tool bar.
    pub const fn text_mut(&mut self) -> &mut TextOverlay {
        &mut self.text
    }

    /// Crop box controller.
    #[must_use]
    pub const fn crop(&self) -> &CropController {
        &self.crop
    }

    /// Comparator slider state.
    #[must_use]
    pub const fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Mutable comparator, for recording the result's dimensions.
    pub const fn comparator_mut(&mut self) -> &mut Comparator {
        &mut self.comparator
    }

    /// Mask state, shared with the external painter.
    #[must_use]
    pub const fn mask(&self) -> &MaskState {
        &self.mask
    }

    /// Mutable mask state for the painter and the tool bar.
    pub const fn mask_mut(&mut self) -> &mut MaskState {
        &mut self.mask
    }

    /// Record a new container rectangle.
    ///
    /// A size change refits the image and resets the view; a pure move
    /// only updates the origin used for client-to-local conversion.
    pub fn set_container(&mut self, rect: Rect) {
        let resized = rect.size() != self.container.size();
        self.container = rect;
        if resized {
            log::debug!("container resized to {}x{}", rect.width, rect.height);
            self.refit();
        }
    }

    /// Record the comparator's client rectangle when it differs from the
    /// container (the comparator keeps the "after" image's aspect ratio).
    pub const fn set_comparator_rect(&mut self, rect: Rect) {
        self.comparator_box = Some(rect);
    }

    fn slider_box(&self) -> Rect {
        self.comparator_box.unwrap_or(self.container)
    }

    /// Record the natural size of a newly displayed image and reset the view.
    pub fn set_image_dimensions(&mut self, natural: Dimensions) {
        self.natural = Some(natural);
        self.refit();
    }

    /// Decode `payload`'s header and display it.
    ///
    /// # Errors
    ///
    /// Returns the payload's decode error; the previous image stays.
    pub fn load_image(&mut self, payload: &ImagePayload) -> Result<Dimensions, CanvasError> {
        let natural = payload.dimensions()?;
        self.set_image_dimensions(natural);
        Ok(natural)
    }

    fn refit(&mut self) {
        let Some(natural) = self.natural else {
            return;
        };
        self.metrics = transform::compute_fit(Size::from(natural), self.container.size());
        self.transform = self.metrics.fit_transform();
    }

    /// Switch tools, ending any gesture first.
    pub fn set_tool(&mut self, mode: ToolMode) {
        if mode == self.mode {
            return;
        }
        self.pointer_up();
        log::debug!("tool: {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    /// The displayed image box in container-local pixels, after pan/zoom.
    #[must_use]
    pub fn image_box(&self) -> Rect {
        let t = self.transform;
        Rect::new(
            t.x,
            t.y,
            self.metrics.width * t.scale,
            self.metrics.height * t.scale,
        )
    }

    /// The displayed image box in client pixels.
    #[must_use]
    pub fn image_box_client(&self) -> Rect {
        let local = self.image_box();
        Rect::new(
            self.container.left + local.left,
            self.container.top + local.top,
            local.width,
            local.height,
        )
    }

    /// Handle an interaction start over `target`.
    ///
    /// Returns `Ok(true)` when a gesture started and holds the capture.
    /// Input that does not belong to the current tool, non-primary
    /// buttons, and presses while another gesture is active start
    /// nothing. The text delete button acts immediately and never drags.
    ///
    /// # Errors
    ///
    /// Propagates the capture surface's error; no gesture starts.
    pub fn pointer_down(&mut self, raw: &RawPointer, target: HitTarget) -> Result<bool, C::Error> {
        let Some(event) = normalize_start(raw) else {
            return Ok(false);
        };
        if self.active.is_some() {
            log::warn!("pointer down ignored: a gesture is already active");
            return Ok(false);
        }

        let gesture = match (self.mode, target) {
            (_, HitTarget::TextDelete) => {
                self.text.delete();
                return Ok(false);
            }
            (ToolMode::Pan, HitTarget::Canvas) => Gesture::Pan,
            (ToolMode::TextDrag, HitTarget::Text) if self.text.is_active() => Gesture::Text,
            (ToolMode::CropEdit, HitTarget::Crop(handle)) => Gesture::Crop(handle),
            (ToolMode::CompareSlider, HitTarget::Comparator | HitTarget::Canvas) => {
                Gesture::Slider
            }
            _ => return Ok(false),
        };

        if !self.tracker.begin(event)? {
            return Ok(false);
        }

        let pointer = event.position;
        match gesture {
            Gesture::Pan => self.pan.begin(pointer, self.transform),
            Gesture::Text => {
                self.text.begin_drag(pointer, self.image_box().size());
            }
            Gesture::Crop(handle) => self.crop.begin(pointer, handle),
            Gesture::Slider => {
                self.comparator.begin(pointer, self.slider_box());
            }
        }
        self.active = Some(gesture);
        Ok(true)
    }

    /// Feed a move to the active gesture. Returns `true` if state changed.
    pub fn pointer_move(&mut self, raw: &RawPointer) -> bool {
        let Some(gesture) = self.active else {
            return false;
        };
        let Some(pointer) = normalize_move(raw).and_then(|ev| self.tracker.track(ev)) else {
            return false;
        };
        match gesture {
            Gesture::Pan => {
                let Some(t) = self.pan.update(pointer) else {
                    return false;
                };
                self.transform = t;
                true
            }
            Gesture::Text => self.text.drag_to(pointer, self.image_box().size()).is_some(),
            Gesture::Crop(_) => self.crop.update(pointer, self.image_box().size()).is_some(),
            Gesture::Slider => self.comparator.update(pointer, self.slider_box()).is_some(),
        }
    }

    /// End whatever gesture is active and release the capture.
    ///
    /// Returns `true` if a gesture was active.
    pub fn pointer_up(&mut self) -> bool {
        let Some(gesture) = self.active.take() else {
            return false;
        };
        match gesture {
            Gesture::Pan => self.pan.end(),
            Gesture::Text => self.text.end_drag(),
            Gesture::Crop(_) => self.crop.end(),
            Gesture::Slider => self.comparator.end(),
        };
        self.tracker.end();
        log::debug!("gesture ended: {gesture:?}");
        true
    }

    /// Zoom toward a client-space pointer position.
    ///
    /// Returns the new transform, or `None` when zoom does not apply
    /// (comparator mode, nothing measured yet).
    pub fn wheel(&mut self, client: Point, delta: f64) -> Option<Transform> {
        if !self.mode.allows_zoom() || !self.metrics.is_measured() {
            return None;
        }
        let pointer = self.container.to_local(client);
        self.transform = transform::zoom(self.transform, pointer, delta, &self.config);
        Some(self.transform)
    }

    /// Return to the fitted view.
    pub fn reset_view(&mut self) {
        self.transform = self.metrics.fit_transform();
    }

    /// `true` when the view differs from the fitted view.
    #[must_use]
    pub fn is_transformed(&self) -> bool {
        transform::is_transformed(self.transform, &self.metrics)
    }

    /// Restore the default crop rectangle.
    pub fn reset_crop(&mut self) {
        if matches!(self.active, Some(Gesture::Crop(_))) {
            self.pointer_up();
        }
        self.crop.reset();
    }

    /// The crop rectangle in natural image pixels.
    #[must_use]
    pub fn pixel_crop(&self) -> Option<PixelCrop> {
        self.natural.map(|n| self.crop.rect().to_pixels(n))
    }

    /// Map a client point to natural image pixels for the mask painter.
    #[must_use]
    pub fn mask_point(&self, client: Point) -> Option<Point> {
        let natural = self.natural?;
        mask::mask_point(client, self.image_box_client(), natural)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::pointer::MouseButton;
    use crate::pointer::tests::CountingSurface;

    const EPS: f64 = 1e-9;

    fn press(x: f64, y: f64) -> RawPointer {
        RawPointer::Mouse {
            button: MouseButton::Primary,
            position: Point::new(x, y),
        }
    }

    fn session() -> (CanvasSession<CountingSurface>, CountingSurface) {
        let surface = CountingSurface::default();
        let mut s = CanvasSession::new(CanvasConfig::default(), surface.clone()).unwrap();
        s.set_container(Rect::new(0.0, 0.0, 800.0, 600.0));
        s.set_image_dimensions(Dimensions::new(1600, 800));
        (s, surface)
    }

    #[test]
    fn image_load_fits_and_resets() {
        let (s, _) = session();
        let m = s.metrics();
        assert!((m.width - 800.0).abs() < EPS);
        assert!((m.height - 400.0).abs() < EPS);
        assert_eq!(s.transform(), Transform::new(1.0, 0.0, 0.0));
        assert!(!s.is_transformed());
    }

    #[test]
    fn pan_only_in_pan_mode() {
        let (mut s, surface) = session();
        assert!(!s.pointer_down(&press(10.0, 10.0), HitTarget::Canvas).unwrap());
        assert_eq!(surface.live.get(), 0);

        s.set_tool(ToolMode::Pan);
        assert!(s.pointer_down(&press(10.0, 10.0), HitTarget::Canvas).unwrap());
        assert_eq!(surface.live.get(), 1);
        assert!(s.pointer_move(&press(40.0, 30.0)));
        assert_eq!(s.transform(), Transform::new(1.0, 30.0, 20.0));
        assert!(s.pointer_up());
        assert_eq!(surface.live.get(), 0);
        assert!(s.is_transformed());
        s.reset_view();
        assert!(!s.is_transformed());
    }

    #[test]
    fn second_press_is_rejected() {
        let (mut s, surface) = session();
        s.set_tool(ToolMode::Pan);
        assert!(s.pointer_down(&press(0.0, 0.0), HitTarget::Canvas).unwrap());
        assert!(!s.pointer_down(&press(5.0, 5.0), HitTarget::Canvas).unwrap());
        assert_eq!(surface.acquired.get(), 1);
    }

    #[test]
    fn switching_tool_ends_gesture() {
        let (mut s, surface) = session();
        s.set_tool(ToolMode::CropEdit);
        s.pointer_down(&press(100.0, 100.0), HitTarget::Crop(Some(CropHandle::Se)))
            .unwrap();
        assert!(s.crop().is_dragging());
        s.set_tool(ToolMode::Pan);
        assert!(!s.crop().is_dragging());
        assert!(!s.is_gesture_active());
        assert_eq!(surface.live.get(), 0);
    }

    #[test]
    fn crop_deltas_use_scaled_image_box() {
        let (mut s, _) = session();
        s.set_tool(ToolMode::CropEdit);
        s.pointer_down(&press(0.0, 0.0), HitTarget::Crop(None)).unwrap();
        // 80px of an 800px-wide box is 10%; 40px of 400px is 10%.
        s.pointer_move(&press(80.0, 40.0));
        let r = s.crop().rect();
        assert!((r.x - 20.0).abs() < EPS);
        assert!((r.y - 20.0).abs() < EPS);
        s.pointer_up();
    }

    #[test]
    fn text_drag_requires_active_label() {
        let (mut s, surface) = session();
        s.set_tool(ToolMode::TextDrag);
        assert!(!s.pointer_down(&press(0.0, 0.0), HitTarget::Text).unwrap());
        s.text_mut().set_text("hi");
        assert!(s.pointer_down(&press(0.0, 0.0), HitTarget::Text).unwrap());
        s.pointer_move(&press(80.0, 0.0));
        assert!((s.text().state().x - 60.0).abs() < EPS);
        s.pointer_up();
        assert_eq!(surface.live.get(), 0);
    }

    #[test]
    fn delete_button_never_drags() {
        let (mut s, surface) = session();
        s.set_tool(ToolMode::TextDrag);
        s.text_mut().set_text("hi");
        assert!(!s.pointer_down(&press(0.0, 0.0), HitTarget::TextDelete).unwrap());
        assert!(!s.text().is_active());
        assert_eq!(surface.acquired.get(), 0);
    }

    #[test]
    fn wheel_zoom_keeps_anchor_and_is_frozen_in_compare() {
        let (mut s, _) = session();
        s.set_container(Rect::new(100.0, 50.0, 800.0, 600.0));
        let before = s.transform().container_to_image(Point::new(200.0, 100.0));
        let t = s.wheel(Point::new(300.0, 150.0), -500.0).unwrap();
        assert!((t.scale - 1.5).abs() < EPS);
        let after = t.container_to_image(Point::new(200.0, 100.0));
        assert!((before.x - after.x).abs() < EPS);
        assert!((before.y - after.y).abs() < EPS);

        s.set_tool(ToolMode::CompareSlider);
        assert!(s.wheel(Point::new(300.0, 150.0), -500.0).is_none());
    }

    #[test]
    fn comparator_follows_container() {
        let (mut s, _) = session();
        s.set_tool(ToolMode::CompareSlider);
        s.pointer_down(&press(200.0, 10.0), HitTarget::Comparator).unwrap();
        assert!((s.comparator().position() - 25.0).abs() < EPS);
        s.pointer_move(&press(10_000.0, 10.0));
        assert!((s.comparator().position() - 100.0).abs() < EPS);
        s.pointer_up();
    }

    #[test]
    fn comparator_prefers_its_own_rect() {
        let (mut s, _) = session();
        s.set_comparator_rect(Rect::new(100.0, 0.0, 200.0, 150.0));
        s.set_tool(ToolMode::CompareSlider);
        s.pointer_down(&press(150.0, 10.0), HitTarget::Comparator).unwrap();
        assert!((s.comparator().position() - 25.0).abs() < EPS);
        s.pointer_up();
    }

    #[test]
    fn mask_mode_forwards_input() {
        let (mut s, surface) = session();
        s.set_tool(ToolMode::MaskPaint);
        assert!(!s.pointer_down(&press(10.0, 10.0), HitTarget::Canvas).unwrap());
        assert_eq!(surface.acquired.get(), 0);
        let p = s.mask_point(Point::new(400.0, 200.0)).unwrap();
        assert!((p.x - 800.0).abs() < EPS);
        assert!((p.y - 400.0).abs() < EPS);
    }

    #[test]
    fn container_move_without_resize_keeps_view() {
        let (mut s, _) = session();
        s.set_tool(ToolMode::Pan);
        s.pointer_down(&press(0.0, 0.0), HitTarget::Canvas).unwrap();
        s.pointer_move(&press(5.0, 5.0));
        s.pointer_up();
        s.set_container(Rect::new(20.0, 20.0, 800.0, 600.0));
        assert!(s.is_transformed());
        s.set_container(Rect::new(20.0, 20.0, 640.0, 600.0));
        assert!(!s.is_transformed());
    }

    #[test]
    fn scrolled_container_anchors_wheel_and_mask() {
        let (mut s, _) = session();
        s.set_container(Rect::new(0.0, 100.0, 800.0, 600.0));
        // Scrolled 200px without a size change.
        s.set_container(Rect::new(0.0, -100.0, 800.0, 600.0));
        assert!(!s.is_transformed());

        let local = Point::new(400.0, 400.0);
        let before = s.transform().container_to_image(local);
        let t = s.wheel(Point::new(400.0, 300.0), -500.0).unwrap();
        let after = t.container_to_image(local);
        assert!((before.x - after.x).abs() < EPS);
        assert!((before.y - after.y).abs() < EPS);

        s.reset_view();
        s.set_tool(ToolMode::MaskPaint);
        let p = s.mask_point(Point::new(400.0, 100.0)).unwrap();
        assert!((p.x - 800.0).abs() < EPS);
        assert!((p.y - 400.0).abs() < EPS);
    }

    #[test]
    fn pixel_crop_uses_natural_size() {
        let (s, _) = session();
        let px = s.pixel_crop().unwrap();
        assert_eq!((px.x, px.y, px.width, px.height), (160, 80, 1280, 640));
    }

    #[test]
    fn dropping_session_mid_gesture_releases_capture() {
        let surface = CountingSurface::default();
        let live = Rc::clone(&surface.live);
        {
            let mut s = CanvasSession::new(CanvasConfig::default(), surface).unwrap();
            s.set_tool(ToolMode::CompareSlider);
            s.pointer_down(&press(1.0, 1.0), HitTarget::Comparator).unwrap();
            assert_eq!(live.get(), 1);
        }
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CanvasConfig {
            min_scale: 0.0,
            ..CanvasConfig::default()
        };
        assert!(CanvasSession::new(config, CountingSurface::default()).is_err());
    }
}
