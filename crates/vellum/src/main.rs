use std::rc::Rc;

use dioxus::prelude::*;
use image::RgbaImage;
use vellum_canvas::{CanvasConfig, ImagePayload, Point, ResultAction, ResultHooks, ToolMode};
use vellum_export::{ErrorNotice, ExportDialog, MediaResult};
use vellum_io::session::BrowserSession;
use vellum_io::{
    ExportModal, FileUpload, ImageCanvas, ResultThumbnail, ToolBar, Upload, raster,
    use_canvas_session,
};

fn main() {
    console_error_panic_hook::set_once();
    vellum_io::logger::init(log::LevelFilter::Info);
    dioxus::launch(app);
}

/// Application state shared by the result actions.
#[derive(Clone, Copy)]
struct Workspace {
    session: Signal<BrowserSession>,
    image: Signal<Option<ImagePayload>>,
    result: Signal<Option<Rc<MediaResult>>>,
    gallery: Signal<Vec<ImagePayload>>,
    show_gallery: Signal<bool>,
    dialog: Signal<ExportDialog>,
    stencil: Signal<Option<RgbaImage>>,
    filename: Signal<String>,
    error: Signal<Option<String>>,
}

impl Workspace {
    /// Make `payload` the working image, discarding its mask.
    fn show(&mut self, payload: ImagePayload, name: String) {
        let loaded = self.session.write().load_image(&payload);
        match loaded {
            Ok(natural) => {
                log::info!("loaded {name}: {}x{}", natural.width, natural.height);
                self.session.write().mask_mut().clear();
                self.stencil.set(None);
                self.filename.set(name);
                self.image.set(Some(payload));
                self.error.set(None);
            }
            Err(e) => self.error.set(Some(ErrorNotice::new("Load", &e).to_string())),
        }
    }

    /// Cut the current crop out of the working image as a new result.
    fn apply_crop(&mut self) {
        let Some(source) = self.image.peek().clone() else {
            return;
        };
        let Some(crop) = self.session.peek().pixel_crop() else {
            return;
        };
        match raster::crop_payload(&source, crop) {
            Ok(cropped) => {
                if let Ok(d) = cropped.dimensions() {
                    self.session.write().comparator_mut().set_after_dimensions(d);
                }
                self.gallery.write().push(cropped.clone());
                self.result
                    .set(Some(Rc::new(MediaResult::Image { image: cropped })));
                self.error.set(None);
            }
            Err(e) => self.error.set(Some(ErrorNotice::new("Crop", &e).to_string())),
        }
    }

    /// Stamp the brush at `point` (natural pixels) into the mask.
    fn paint(&mut self, point: Point) {
        let Some(natural) = self.session.peek().natural() else {
            return;
        };
        let (brush, mode, display_width) = {
            let s = self.session.peek();
            (s.mask().brush_size, s.mask().mode, s.image_box().width)
        };
        if display_width <= 0.0 {
            return;
        }
        // The brush is sized in screen pixels.
        let diameter = brush * f64::from(natural.width) / display_width;

        let mut stencil = self.stencil.write();
        let stencil =
            stencil.get_or_insert_with(|| RgbaImage::new(natural.width, natural.height));
        if !raster::paint_dab(stencil, point, diameter, mode) {
            return;
        }
        match raster::rgba_to_payload(stencil) {
            Ok(payload) => self.session.write().mask_mut().image = Some(payload),
            Err(e) => log::warn!("mask encoding failed: {e}"),
        }
    }
}

impl ResultHooks for Workspace {
    fn use_as_base(&mut self, image: &ImagePayload) {
        let name = self.filename.peek().clone();
        self.show(image.clone(), name);
        self.result.set(None);
        self.session.write().set_tool(ToolMode::None);
    }

    fn save(&mut self, image: &ImagePayload) {
        self.result
            .set(Some(Rc::new(MediaResult::Image { image: image.clone() })));
        self.dialog.write().open();
    }

    fn open_gallery(&mut self) {
        self.show_gallery.set(true);
    }

    fn start_new(&mut self) {
        let mut session = self.session.write();
        session.set_tool(ToolMode::None);
        session.reset_crop();
        session.reset_view();
        session.mask_mut().clear();
        session.text_mut().delete();
        drop(session);
        self.image.set(None);
        self.result.set(None);
        self.stencil.set(None);
        self.show_gallery.set(false);
        self.dialog.write().close();
        self.filename.set(String::from("output"));
        self.error.set(None);
    }
}

/// Root application component.
///
/// Owns the canvas session and the working image, and wires together
/// the upload zone, tool bar, canvas, result thumbnails, gallery, and
/// export modal.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let session = use_canvas_session(CanvasConfig::default());
    let mut workspace = Workspace {
        session,
        image: use_signal(|| Option::<ImagePayload>::None),
        result: use_signal(|| Option::<Rc<MediaResult>>::None),
        gallery: use_signal(Vec::new),
        show_gallery: use_signal(|| false),
        dialog: use_signal(ExportDialog::new),
        stencil: use_signal(|| Option::<RgbaImage>::None),
        filename: use_signal(|| String::from("output")),
        error: use_signal(|| Option::<String>::None),
    };

    // The result if there is one, otherwise the working image itself.
    let export_target = use_memo(move || {
        (workspace.result)().or_else(|| {
            (workspace.image)().map(|image| Rc::new(MediaResult::Image { image }))
        })
    });

    let result_image = match (workspace.result)().as_deref() {
        Some(MediaResult::Image { image }) => Some(image.clone()),
        _ => None,
    };

    // --- Upload handler ---
    let on_upload = move |upload: Upload| {
        let (image, name) = match upload {
            Upload::File { image, name } => {
                // Strip extension for the export filename.
                let base = name
                    .rsplit_once('.')
                    .map_or(name.as_str(), |(base, _)| base)
                    .to_owned();
                (image, base)
            }
            Upload::Internal(payload) => (payload.image, String::from("result")),
        };
        workspace.result.set(None);
        workspace.show(image, name);
    };

    let mode = session.read().mode();

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/vellum.css") }

        div { class: "vellum-app",
            header { class: "vellum-header",
                h1 { class: "vellum-title", "vellum" }
                p { class: "vellum-muted",
                    "Pan, zoom, crop, label, and compare images"
                }
            }

            main { class: "vellum-main",
                div { class: "vellum-workspace",
                    if let Some(image) = (workspace.image)() {
                        ToolBar { session, can_compare: result_image.is_some() }

                        ImageCanvas {
                            session,
                            image,
                            after: result_image.clone(),
                            on_mask_point: move |p| workspace.paint(p),
                        }

                        div { class: "vellum-row",
                            if mode == ToolMode::CropEdit {
                                button {
                                    class: "vellum-primary",
                                    onclick: move |_| workspace.apply_crop(),
                                    "Apply crop"
                                }
                            }
                            button {
                                class: "vellum-tool",
                                onclick: move |_| workspace.dialog.write().open(),
                                "Export"
                            }
                        }
                    } else {
                        div { class: "vellum-placeholder",
                            p { "Upload an image to get started" }
                        }
                    }

                    if let Some(ref err) = (workspace.error)() {
                        div { class: "vellum-error-box",
                            p { class: "vellum-error", "{err}" }
                        }
                    }
                }

                aside { class: "vellum-sidebar",
                    if let Some(image) = result_image.clone() {
                        h3 { class: "vellum-heading", "Result" }
                        ResultThumbnail {
                            image: image.clone(),
                            on_action: move |action: ResultAction| workspace.dispatch(action, &image),
                        }
                    }

                    if (workspace.show_gallery)() {
                        div { class: "vellum-gallery",
                            div { class: "vellum-row",
                                h3 { class: "vellum-heading", "Gallery" }
                                button {
                                    class: "vellum-tool",
                                    onclick: move |_| workspace.show_gallery.set(false),
                                    "Close"
                                }
                            }
                            for (i, item) in (workspace.gallery)().into_iter().enumerate() {
                                ResultThumbnail {
                                    key: "{i}",
                                    image: item.clone(),
                                    on_action: move |action: ResultAction| workspace.dispatch(action, &item),
                                }
                            }
                        }
                    }
                }
            }

            div { class: "vellum-footer",
                FileUpload { on_upload }
            }

            ExportModal {
                dialog: workspace.dialog,
                result: export_target(),
                filename: (workspace.filename)(),
            }
        }
    }
}
