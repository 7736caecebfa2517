//! vellum-canvas: Image canvas interaction core (sans-IO).
//!
//! Lets a user pan/zoom a displayed raster image while operating one of
//! several mutually exclusive overlay tools:
//! text label -> crop box -> mask painter -> before/after comparator.
//! Tool state is kept in percent of the displayed image box (or of the
//! comparator container), so it survives container resizes and zoom.
//!
//! This crate has **no I/O dependencies**. Hosts feed it client-space
//! pointer positions and element rectangles and render from its state.
//! Global listener management lives behind the [`PointerCapture`]
//! trait; the browser implementation is in `vellum-io`.

pub mod comparator;
pub mod crop;
pub mod drag;
pub mod handoff;
pub mod mask;
pub mod payload;
pub mod pointer;
pub mod session;
pub mod text;
pub mod tool;
pub mod transform;
pub mod types;

pub use comparator::Comparator;
pub use crop::{CropController, CropGrab, CropHandle, CropRect, PixelCrop};
pub use drag::{DragController, DragSnapshot};
pub use handoff::{
    DragPayload, DropSource, INTERNAL_IMAGE_MIME, ResultAction, ResultHooks, classify_drop,
};
pub use mask::{MaskMode, MaskState};
pub use payload::ImagePayload;
pub use pointer::{
    MouseButton, PointerCapture, PointerEvent, PointerPhase, PointerSource, PointerTracker,
    RawPointer, normalize, normalize_move, normalize_start,
};
pub use session::{CanvasSession, HitTarget};
pub use text::{TextOverlay, TextOverlayState};
pub use tool::ToolMode;
pub use transform::{FitMetrics, PanGesture, Transform, compute_fit};
pub use types::{CanvasConfig, CanvasError, Dimensions, Point, Rect, Size, TextDefaults};
