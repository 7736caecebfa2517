//! Handoff to collaborators outside the canvas.
//!
//! Results are passed through untouched: the canvas only tags them so a
//! drop target can tell one of its own thumbnails from an arbitrary file,
//! and names the actions a host may wire to result buttons.

use serde::{Deserialize, Serialize};

use crate::payload::ImagePayload;

/// Data-transfer key marking an image dragged from inside the app.
pub const INTERNAL_IMAGE_MIME: &str = "application/x-vellum-image";

/// A thumbnail being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    /// The dragged image.
    pub image: ImagePayload,
}

impl DragPayload {
    /// Tag `image` for an internal drag.
    #[must_use]
    pub const fn new(image: ImagePayload) -> Self {
        Self { image }
    }

    /// Key/value pairs to place on the drag's data transfer.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 1] {
        [(INTERNAL_IMAGE_MIME, self.image.as_str())]
    }
}

/// Where dropped data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropSource {
    /// An image dragged from inside the app.
    Internal(DragPayload),
    /// Anything else, typically files from the OS.
    External,
}

/// Classify a drop by its data-transfer types.
///
/// `lookup` reads the data stored under a type key. The internal key
/// wins when present with non-empty data.
pub fn classify_drop<'a, I, F>(types: I, lookup: F) -> DropSource
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> Option<String>,
{
    let internal = types.into_iter().any(|t| t == INTERNAL_IMAGE_MIME);
    match internal.then(|| lookup(INTERNAL_IMAGE_MIME)).flatten() {
        Some(data) if !data.is_empty() => {
            DropSource::Internal(DragPayload::new(ImagePayload::new(data)))
        }
        _ => DropSource::External,
    }
}

/// Actions offered on a finished result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultAction {
    /// Replace the working image with the result.
    UseAsBase,
    /// Persist the result.
    Save,
    /// Show the gallery.
    OpenGallery,
    /// Discard everything and start over.
    StartNew,
}

impl ResultAction {
    /// All actions, in the order they are offered.
    pub const ALL: [Self; 4] = [Self::UseAsBase, Self::Save, Self::OpenGallery, Self::StartNew];

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UseAsBase => "Use as base",
            Self::Save => "Save",
            Self::OpenGallery => "Gallery",
            Self::StartNew => "Start new",
        }
    }
}

/// Host callbacks for result actions.
pub trait ResultHooks {
    /// Replace the working image.
    fn use_as_base(&mut self, image: &ImagePayload);
    /// Persist `image`.
    fn save(&mut self, image: &ImagePayload);
    /// Show the gallery.
    fn open_gallery(&mut self);
    /// Reset the workspace.
    fn start_new(&mut self);

    /// Route `action` on `image` to the matching hook.
    fn dispatch(&mut self, action: ResultAction, image: &ImagePayload) {
        log::debug!("result action: {action:?}");
        match action {
            ResultAction::UseAsBase => self.use_as_base(image),
            ResultAction::Save => self.save(image),
            ResultAction::OpenGallery => self.open_gallery(),
            ResultAction::StartNew => self.start_new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl ResultHooks for Recorder {
        fn use_as_base(&mut self, image: &ImagePayload) {
            self.0.push(format!("base:{}", image.as_str()));
        }
        fn save(&mut self, image: &ImagePayload) {
            self.0.push(format!("save:{}", image.as_str()));
        }
        fn open_gallery(&mut self) {
            self.0.push("gallery".into());
        }
        fn start_new(&mut self) {
            self.0.push("new".into());
        }
    }

    #[test]
    fn internal_drop_is_recognised() {
        let payload = DragPayload::new(ImagePayload::new("data:image/png;base64,AAAA"));
        let [(key, value)] = payload.entries();
        let stored = value.to_owned();
        let source = classify_drop(["text/plain", key], |k| {
            (k == INTERNAL_IMAGE_MIME).then(|| stored.clone())
        });
        assert_eq!(source, DropSource::Internal(payload));
    }

    #[test]
    fn file_drop_is_external() {
        let source = classify_drop(["Files"], |_| None);
        assert_eq!(source, DropSource::External);
    }

    #[test]
    fn empty_internal_data_is_external() {
        let source = classify_drop([INTERNAL_IMAGE_MIME], |_| Some(String::new()));
        assert_eq!(source, DropSource::External);
    }

    #[test]
    fn dispatch_passes_image_through() {
        let mut r = Recorder::default();
        let img = ImagePayload::new("X");
        r.dispatch(ResultAction::UseAsBase, &img);
        r.dispatch(ResultAction::Save, &img);
        r.dispatch(ResultAction::OpenGallery, &img);
        r.dispatch(ResultAction::StartNew, &img);
        assert_eq!(r.0, ["base:X", "save:X", "gallery", "new"]);
    }
}
