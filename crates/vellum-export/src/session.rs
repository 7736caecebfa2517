//! Single-flight export guard.
//!
//! Export is the one operation with real latency. While one is running
//! a second request is rejected, not queued. The in-flight flag is held
//! by an RAII [`InFlight`] token so it clears on success and error alike.

use std::cell::Cell;
use std::rc::Rc;

use vellum_canvas::ImagePayload;

use crate::error::ExportError;
use crate::options::ExportOptions;
use crate::raster::{self, ExportOutput};

/// Tracks whether an export is running.
#[derive(Debug, Clone, Default)]
pub struct ExportSession {
    processing: Rc<Cell<bool>>,
}

/// Proof that an export is in flight; clears the flag on drop.
#[derive(Debug)]
#[must_use = "the export is only in flight while this token lives"]
pub struct InFlight {
    processing: Rc<Cell<bool>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.processing.set(false);
    }
}

impl ExportSession {
    /// An idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while an export is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// Claim the session. Returns `None` when an export is already running.
    pub fn try_begin(&self) -> Option<InFlight> {
        if self.processing.replace(true) {
            log::warn!("export requested while another export is in flight");
            return None;
        }
        Some(InFlight {
            processing: Rc::clone(&self.processing),
        })
    }

    /// Run a synchronous export under the single-flight guard.
    ///
    /// Returns `Ok(None)` without doing any work when busy.
    ///
    /// # Errors
    ///
    /// Returns the exporter's error; the session is idle again afterwards.
    pub fn run(
        &self,
        payload: &ImagePayload,
        options: &ExportOptions,
    ) -> Result<Option<ExportOutput>, ExportError> {
        let Some(_token) = self.try_begin() else {
            return Ok(None);
        };
        raster::export(payload, options).map(Some)
    }
}
