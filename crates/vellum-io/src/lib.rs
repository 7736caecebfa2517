//! vellum-io: Browser I/O and Dioxus component library.
//!
//! Connects the sans-IO canvas core to the DOM: scoped event
//! listeners and window-level pointer capture, element geometry and
//! resize observation, Blob downloads, overlay encoding, a console
//! `log` backend, and the reusable UI components of the vellum web
//! application.

pub mod components;
pub mod download;
pub mod listeners;
pub mod logger;
pub mod raster;
pub mod resize;
pub mod session;

pub use components::{
    ComparatorView, CropOverlay, ExportModal, FileUpload, ImageCanvas, MaskOverlay,
    ResultThumbnail, TextLabel, ToolBar, Upload,
};
pub use listeners::{EventListener, GlobalPointer, ListenerError, WindowPointerCapture};
pub use session::{BrowserSession, CANVAS_ID, use_canvas_session};
