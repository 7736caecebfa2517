//! Export modal state.
//!
//! Escape and backdrop clicks cancel with no side effects. A successful
//! export leaves the modal open so the user can export again at another
//! scale or format.

use crate::options::{ExportFormat, ExportOptions, ExportScale, snap_quality};

/// Export modal: visibility plus the options being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDialog {
    open: bool,
    options: ExportOptions,
}

impl ExportDialog {
    /// A closed dialog with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the modal is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The options being edited.
    #[must_use]
    pub const fn options(&self) -> ExportOptions {
        self.options
    }

    /// Show the modal. Options from the previous opening are kept.
    pub const fn open(&mut self) {
        self.open = true;
    }

    /// Hide the modal.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Close on the `Escape` key. Returns `true` if the key was handled.
    pub fn close_on_escape(&mut self, key: &str) -> bool {
        if self.open && key == "Escape" {
            self.open = false;
            return true;
        }
        false
    }

    /// Close after a click on the backdrop (outside the panel).
    pub const fn close_on_backdrop(&mut self) {
        self.close();
    }

    /// Choose the output scale.
    pub const fn set_scale(&mut self, scale: ExportScale) {
        self.options.scale = scale;
    }

    /// Choose the output format.
    pub const fn set_format(&mut self, format: ExportFormat) {
        self.options.format = format;
    }

    /// Set JPEG quality, snapping to the nearest step within range.
    pub fn set_quality(&mut self, requested: i32) {
        self.options.quality = snap_quality(requested);
    }

    /// The options to export with, while the modal is open.
    #[must_use]
    pub const fn request(&self) -> Option<ExportOptions> {
        if self.open {
            Some(self.options)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_only_while_open() {
        let mut d = ExportDialog::new();
        assert!(d.request().is_none());
        d.open();
        assert_eq!(d.request().unwrap(), ExportOptions::default());
    }

    #[test]
    fn escape_cancels_without_touching_options() {
        let mut d = ExportDialog::new();
        d.open();
        d.set_scale(ExportScale::X4);
        assert!(!d.close_on_escape("Enter"));
        assert!(d.is_open());
        assert!(d.close_on_escape("Escape"));
        assert!(!d.is_open());
        assert_eq!(d.options().scale, ExportScale::X4);
        assert!(!d.close_on_escape("Escape"));
    }

    #[test]
    fn backdrop_closes() {
        let mut d = ExportDialog::new();
        d.open();
        d.close_on_backdrop();
        assert!(!d.is_open());
    }

    #[test]
    fn quality_snaps_and_clamps() {
        let mut d = ExportDialog::new();
        d.set_quality(73);
        assert_eq!(d.options().quality, 75);
        d.set_quality(1);
        assert_eq!(d.options().quality, 10);
        d.set_format(ExportFormat::Jpeg);
        d.open();
        let o = d.request().unwrap();
        assert!(o.validate().is_ok());
        assert_eq!(o.format, ExportFormat::Jpeg);
    }

    #[test]
    fn stays_open_after_request() {
        let mut d = ExportDialog::new();
        d.open();
        let _ = d.request();
        assert!(d.is_open());
    }
}
