//! Deciding how a finished result is downloaded.
//!
//! Images are rasterized at the requested scale and format. Videos are
//! never re-encoded; the produced resource is downloaded by link.

use serde::{Deserialize, Serialize};
use vellum_canvas::ImagePayload;

use crate::options::ExportOptions;

/// Extensions recognised on video URLs.
const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "mov"];

/// A generation result handed to the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaResult {
    /// An inline raster image.
    Image {
        /// The image payload.
        image: ImagePayload,
    },
    /// A video hosted at `url`.
    Video {
        /// Resource URL.
        url: String,
    },
}

/// What the host should do to deliver a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPlan {
    /// Rasterize `image` with `options`, then save as `filename`.
    Rasterize {
        /// Source image.
        image: ImagePayload,
        /// Export options.
        options: ExportOptions,
        /// Suggested file name.
        filename: String,
    },
    /// Download the resource at `url` directly.
    Link {
        /// Resource URL.
        url: String,
        /// Suggested file name.
        filename: String,
    },
}

/// Plan the download of `result`, naming files after `base`.
#[must_use]
pub fn plan_download(result: &MediaResult, options: &ExportOptions, base: &str) -> DownloadPlan {
    match result {
        MediaResult::Image { image } => DownloadPlan::Rasterize {
            image: image.clone(),
            options: *options,
            filename: options.filename(base),
        },
        MediaResult::Video { url } => DownloadPlan::Link {
            url: url.clone(),
            filename: format!("{base}.{}", video_extension(url)),
        },
    }
}

fn video_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or("mp4")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ExportFormat, ExportScale};

    #[test]
    fn image_is_rasterized_with_scaled_name() {
        let options = ExportOptions {
            scale: ExportScale::X4,
            format: ExportFormat::Png,
            quality: 90,
        };
        let image = ImagePayload::new("AAAA");
        let plan = plan_download(&MediaResult::Image { image: image.clone() }, &options, "edit");
        assert_eq!(
            plan,
            DownloadPlan::Rasterize {
                image,
                options,
                filename: "edit-4x.png".into(),
            }
        );
    }

    #[test]
    fn video_is_linked() {
        let result = MediaResult::Video {
            url: "https://cdn.example.com/out/clip.webm?sig=abc".into(),
        };
        let plan = plan_download(&result, &ExportOptions::default(), "clip");
        assert_eq!(
            plan,
            DownloadPlan::Link {
                url: "https://cdn.example.com/out/clip.webm?sig=abc".into(),
                filename: "clip.webm".into(),
            }
        );
    }

    #[test]
    fn unknown_video_extension_defaults_to_mp4() {
        assert_eq!(video_extension("blob:https://app/1234-5678"), "mp4");
        assert_eq!(video_extension("https://x/y/video"), "mp4");
        assert_eq!(video_extension("https://x/y/v.MOV"), "MOV");
    }
}
