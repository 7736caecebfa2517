//! vellum-export: Rasterized export of canvas results (sans-IO).
//!
//! Scales a decoded image onto an off-screen `tiny-skia` surface and
//! encodes it as PNG or JPEG. Also carries the export modal state, the
//! single-flight guard, and the video link-download plan. Saving the
//! bytes is left to the host (`vellum-io` in the browser, the
//! filesystem in `vellum-cli`).

pub mod dialog;
pub mod error;
pub mod media;
pub mod options;
pub mod raster;
pub mod session;

pub use dialog::ExportDialog;
pub use error::{ErrorNotice, ExportError};
pub use media::{DownloadPlan, MediaResult, plan_download};
pub use options::{ExportFormat, ExportOptions, ExportScale};
pub use raster::{ExportOutput, export, export_image};
pub use session::{ExportSession, InFlight};
