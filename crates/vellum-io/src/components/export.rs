//! Export modal with scale, format, and quality controls.

use std::rc::Rc;

use dioxus::prelude::*;
use vellum_export::options::{MAX_QUALITY, MIN_QUALITY, QUALITY_STEP};
use vellum_export::{
    DownloadPlan, ErrorNotice, ExportDialog, ExportFormat, ExportScale, ExportSession,
    MediaResult, plan_download,
};

use crate::download;

/// Props for the [`ExportModal`] component.
#[derive(Props, Clone)]
pub struct ExportModalProps {
    /// Visibility and the options being edited.
    dialog: Signal<ExportDialog>,
    /// The result to export. `None` disables the download button.
    /// Wrapped in `Rc` to avoid comparing payloads on each render.
    result: Option<Rc<MediaResult>>,
    /// Base filename (without extension) for downloads.
    filename: String,
}

impl PartialEq for ExportModalProps {
    fn eq(&self, other: &Self) -> bool {
        let results_eq = match (&self.result, &other.result) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        results_eq && self.dialog == other.dialog && self.filename == other.filename
    }
}

/// Modal dialog that downloads the current result.
///
/// Images are rasterized at the chosen scale; videos download by link.
/// Escape or a backdrop click closes the modal without exporting. A
/// second click while an export runs is ignored.
#[component]
pub fn ExportModal(props: ExportModalProps) -> Element {
    let mut dialog = props.dialog;
    let exporter = use_hook(ExportSession::new);
    let mut busy = use_signal(|| false);
    let mut notice = use_signal(|| Option::<ErrorNotice>::None);

    if !dialog.read().is_open() {
        return rsx! {};
    }
    let options = dialog.read().options();
    let has_result = props.result.is_some();

    let export_click = {
        let result = props.result.clone();
        let filename = props.filename.clone();
        move |_| {
            let Some(options) = dialog.read().request() else {
                return;
            };
            let Some(ref result) = result else {
                return;
            };
            match plan_download(result, &options, &filename) {
                plan @ DownloadPlan::Link { .. } => {
                    notice.set(
                        download::deliver_link(&plan)
                            .err()
                            .map(|e| ErrorNotice::new("Download", &e)),
                    );
                }
                DownloadPlan::Rasterize {
                    image,
                    options,
                    filename,
                } => {
                    let Some(token) = exporter.try_begin() else {
                        return;
                    };
                    busy.set(true);
                    notice.set(None);
                    spawn(async move {
                        // Yield so the "Exporting..." state paints before
                        // the synchronous rasterization blocks the thread.
                        gloo_timers::future::TimeoutFuture::new(0).await;

                        let outcome = vellum_export::export(&image, &options)
                            .map_err(|e| ErrorNotice::new("Export", &e))
                            .and_then(|output| {
                                download::trigger_download(&output, &filename)
                                    .map_err(|e| ErrorNotice::new("Download", &e))
                            });
                        drop(token);
                        busy.set(false);
                        if let Err(ref n) = outcome {
                            log::error!("{n}");
                        }
                        notice.set(outcome.err());
                    });
                }
            }
        }
    };

    let quality_min = MIN_QUALITY.to_string();
    let quality_max = MAX_QUALITY.to_string();
    let quality_step = QUALITY_STEP.to_string();

    rsx! {
        div {
            class: "vellum-backdrop",
            tabindex: "-1",
            onmounted: move |evt| async move {
                let _ = evt.set_focus(true).await;
            },
            onkeydown: move |evt| {
                if dialog.write().close_on_escape(&evt.key().to_string()) {
                    notice.set(None);
                }
            },
            onclick: move |_| {
                dialog.write().close_on_backdrop();
                notice.set(None);
            },

            div {
                class: "vellum-modal",
                role: "dialog",
                aria_modal: "true",
                onclick: move |evt| evt.stop_propagation(),

                h3 { class: "vellum-heading", "Export" }

                div { class: "vellum-row",
                    span { class: "vellum-label", "Scale" }
                    for scale in ExportScale::ALL {
                        button {
                            key: "{scale}",
                            class: if options.scale == scale { "vellum-tool active" } else { "vellum-tool" },
                            onclick: move |_| dialog.write().set_scale(scale),
                            "{scale}"
                        }
                    }
                }

                div { class: "vellum-row",
                    span { class: "vellum-label", "Format" }
                    for format in [ExportFormat::Png, ExportFormat::Jpeg] {
                        button {
                            key: "{format}",
                            class: if options.format == format { "vellum-tool active" } else { "vellum-tool" },
                            onclick: move |_| dialog.write().set_format(format),
                            "{format}"
                        }
                    }
                }

                if options.format.uses_quality() {
                    label { class: "vellum-row",
                        span { class: "vellum-label", "Quality {options.quality}" }
                        input {
                            r#type: "range",
                            min: "{quality_min}",
                            max: "{quality_max}",
                            step: "{quality_step}",
                            value: "{options.quality}",
                            oninput: move |evt| {
                                if let Ok(q) = evt.value().parse::<i32>() {
                                    dialog.write().set_quality(q);
                                }
                            },
                        }
                    }
                }

                if let Some(ref n) = notice() {
                    p { class: "vellum-error", "{n}" }
                }

                div { class: "vellum-row vellum-actions",
                    button {
                        class: "vellum-tool",
                        onclick: move |_| dialog.write().close(),
                        "Cancel"
                    }
                    button {
                        class: "vellum-primary",
                        disabled: !has_result || busy(),
                        onclick: export_click,
                        if busy() { "Exporting..." } else { "Download" }
                    }
                }
            }
        }
    }
}
