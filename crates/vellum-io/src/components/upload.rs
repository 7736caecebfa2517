//! Image intake: file picker, file drops, and internal result drops.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use vellum_canvas::{DragPayload, DropSource, INTERNAL_IMAGE_MIME, ImagePayload, classify_drop};

/// Allowed file extensions for image uploads, with their MIME types.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// The MIME type for a filename with an allowed image extension.
fn mime_for(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| allowed.eq_ignore_ascii_case(ext))
        .map(|&(_, mime)| mime)
}

/// An image that arrived through the upload zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    /// A file from the picker or the OS.
    File {
        /// Encoded file contents.
        image: ImagePayload,
        /// Original file name.
        name: String,
    },
    /// A result dragged in from elsewhere in the app.
    Internal(DragPayload),
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the image after a successful upload or drop.
    on_upload: EventHandler<Upload>,
}

/// A drag-and-drop zone with a file picker button.
///
/// Accepts PNG, JPEG, BMP, and WebP files, and results dragged from a
/// [`ResultThumbnail`](super::ResultThumbnail). Internal drops carry the
/// image inline, so no file is read for them.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut filename = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);

    let process_files = move |files: Vec<FileData>| async move {
        if let Some(file) = files.first() {
            let name = file.name();
            let Some(mime) = mime_for(&name) else {
                error.set(Some(format!("Unsupported file type: {name}")));
                return;
            };
            match file.read_bytes().await {
                Ok(bytes) => {
                    filename.set(Some(name.clone()));
                    error.set(None);
                    let image = ImagePayload::from_bytes(&bytes, mime);
                    props.on_upload.call(Upload::File { image, name });
                }
                Err(e) => {
                    error.set(Some(format!("Failed to read file: {e}")));
                }
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        let transfer = evt.data_transfer();
        match classify_drop([INTERNAL_IMAGE_MIME], |key| transfer.get_data(key)) {
            DropSource::Internal(payload) => {
                filename.set(None);
                error.set(None);
                props.on_upload.call(Upload::Internal(payload));
            }
            DropSource::External => process_files(evt.files()).await,
        }
    };

    let zone_class = if dragging() {
        "vellum-upload dragging"
    } else {
        "vellum-upload"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if let Some(ref name) = filename() {
                p { class: "vellum-success", "Loaded: {name}" }
            }

            if let Some(ref err) = error() {
                p { class: "vellum-error", "{err}" }
            }

            p { class: "vellum-muted", "Drop an image here or " }

            label { class: "vellum-primary",
                input {
                    r#type: "file",
                    accept: ".png,.jpg,.jpeg,.bmp,.webp",
                    class: "vellum-hidden",
                    onchange: handle_files,
                }
                "Choose File"
            }
        }
    }
}
