//! vellum-cli: headless access to the canvas and export cores.
//!
//! Useful for scripting and for checking behaviour without a browser:
//!
//! - `fit`: letterbox an image into a container and print the metrics
//! - `export`: rasterize an image at 1x/2x/4x as PNG or JPEG
//! - `crop`: clamp a percent crop rectangle, cut it out, and export it
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin vellum-cli -- <COMMAND> [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use vellum_canvas::{CanvasConfig, CropRect, Dimensions, ImagePayload, Size, compute_fit};
use vellum_export::options::DEFAULT_QUALITY;
use vellum_export::{ExportFormat, ExportOptions, ExportOutput, ExportScale};

/// Headless canvas geometry and rasterized export for vellum.
#[derive(Parser)]
#[command(name = "vellum-cli", version)]
struct Cli {
    /// Log level when `RUST_LOG` is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit an image into a container and print the fit metrics as JSON.
    Fit {
        /// Path to the input image (PNG, JPEG, BMP, WebP).
        image_path: PathBuf,

        /// Container size as `WIDTHxHEIGHT` in pixels.
        #[arg(long, value_parser = parse_size)]
        container: Size,
    },

    /// Rasterize an image at a chosen scale and format.
    Export {
        /// Path to the input image (PNG, JPEG, BMP, WebP).
        image_path: PathBuf,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Cut a crop rectangle out of an image and export the result.
    Crop {
        /// Path to the input image (PNG, JPEG, BMP, WebP).
        image_path: PathBuf,

        /// Crop rectangle in percent of the image: `X,Y,WIDTH,HEIGHT`.
        #[arg(long, value_parser = parse_rect, default_value = "10,10,80,80")]
        rect: CropRect,

        /// Minimum crop width/height in percent.
        #[arg(long, default_value_t = CanvasConfig::DEFAULT_MIN_CROP_SIZE)]
        min_size: f64,

        #[command(flatten)]
        export: ExportArgs,
    },
}

/// Options shared by the subcommands that write an image.
#[derive(clap::Args)]
struct ExportArgs {
    /// Output scale factor (1x, 2x, 4x).
    #[arg(long, default_value_t = ExportScale::default())]
    scale: ExportScale,

    /// Output format (png, jpeg).
    #[arg(long, default_value_t = ExportFormat::default())]
    format: ExportFormat,

    /// JPEG quality (10-100, step 5).
    #[arg(long, default_value_t = DEFAULT_QUALITY)]
    quality: u8,

    /// Full export options as a JSON string.
    ///
    /// When provided, `--scale`, `--format`, and `--quality` are ignored.
    #[arg(long)]
    options_json: Option<String>,

    /// Output path. Defaults to `<stem>-<scale>x.<ext>` next to the input.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    /// Build validated [`ExportOptions`] from the arguments.
    fn options(&self) -> Result<ExportOptions, String> {
        let options = match self.options_json {
            Some(ref json) => serde_json::from_str(json)
                .map_err(|e| format!("Error parsing --options-json: {e}"))?,
            None => ExportOptions {
                scale: self.scale,
                format: self.format,
                quality: self.quality,
            },
        };
        options.validate().map_err(|e| e.to_string())?;
        Ok(options)
    }

    /// Where to write the export of `input`.
    fn output_path(&self, input: &Path, options: &ExportOptions) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            input.with_file_name(options.filename(stem))
        })
    }
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension {v:?}: {e}"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

/// Parse `X,Y,WIDTH,HEIGHT` in percent.
fn parse_rect(s: &str) -> Result<CropRect, String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number {v:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values[..] {
        [x, y, width, height] => Ok(CropRect::new(x, y, width, height)),
        _ => Err(format!("expected X,Y,WIDTH,HEIGHT, got {s:?}")),
    }
}

fn load(path: &Path) -> Result<(ImagePayload, Dimensions), String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let mime = image::ImageFormat::from_path(path)
        .map_or("image/png", |format| format.to_mime_type());
    let payload = ImagePayload::from_bytes(&bytes, mime);
    let dimensions = payload
        .dimensions()
        .map_err(|e| format!("Error decoding {}: {e}", path.display()))?;
    log::info!(
        "loaded {} ({}x{}, {} bytes)",
        path.display(),
        dimensions.width,
        dimensions.height,
        bytes.len(),
    );
    Ok((payload, dimensions))
}

fn write_output(path: &Path, output: &ExportOutput) -> Result<(), String> {
    std::fs::write(path, &output.bytes)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    eprintln!(
        "{} written to {} ({}x{}, {} bytes)",
        output.format,
        path.display(),
        output.width,
        output.height,
        output.bytes.len(),
    );
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("Error serializing: {e}"))?;
    println!("{json}");
    Ok(())
}

fn run(cli: &Cli) -> Result<(), String> {
    match cli.command {
        Command::Fit {
            ref image_path,
            container,
        } => {
            let (_, natural) = load(image_path)?;
            let metrics = compute_fit(Size::from(natural), container);
            print_json(&serde_json::json!({
                "natural": natural,
                "container": container,
                "metrics": metrics,
                "transform": metrics.fit_transform(),
            }))
        }
        Command::Export {
            ref image_path,
            ref export,
        } => {
            let options = export.options()?;
            let (payload, _) = load(image_path)?;
            let output = vellum_export::export(&payload, &options)
                .map_err(|e| vellum_export::ErrorNotice::new("Export", &e).to_string())?;
            write_output(&export.output_path(image_path, &options), &output)
        }
        Command::Crop {
            ref image_path,
            rect,
            min_size,
            ref export,
        } => {
            let options = export.options()?;
            let (payload, natural) = load(image_path)?;
            let clamped = rect.clamped(min_size);
            let crop = clamped.to_pixels(natural);
            log::debug!("crop {rect:?} clamped to {clamped:?}");

            let source = payload.decode_image().map_err(|e| e.to_string())?;
            let cut = image::imageops::crop_imm(&source, crop.x, crop.y, crop.width, crop.height)
                .to_image();
            let output = vellum_export::export_image(&cut, &options)
                .map_err(|e| vellum_export::ErrorNotice::new("Export", &e).to_string())?;
            write_output(&export.output_path(image_path, &options), &output)?;
            print_json(&crop)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn size_parses_either_separator() {
        let s = parse_size("800x600").unwrap();
        assert!((s.width - 800.0).abs() < EPS);
        assert!((s.height - 600.0).abs() < EPS);
        assert!(parse_size("1024X768").is_ok());
        assert!(parse_size("800").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn rect_needs_four_numbers() {
        let r = parse_rect("5, 10, 50, 40").unwrap();
        assert_eq!(r, CropRect::new(5.0, 10.0, 50.0, 40.0));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("1,2,3,x").is_err());
    }

    #[test]
    fn cli_parses_export_flags() {
        let cli = Cli::try_parse_from([
            "vellum-cli",
            "export",
            "in.png",
            "--scale",
            "4x",
            "--format",
            "jpeg",
            "--quality",
            "75",
        ])
        .unwrap();
        let Command::Export { ref export, .. } = cli.command else {
            panic!("expected export");
        };
        let options = export.options().unwrap();
        assert_eq!(options.scale, ExportScale::X4);
        assert_eq!(options.format, ExportFormat::Jpeg);
        assert_eq!(options.quality, 75);
        assert_eq!(
            export.output_path(Path::new("dir/in.png"), &options),
            PathBuf::from("dir/in-4x.jpg")
        );
    }

    #[test]
    fn options_json_overrides_flags() {
        let cli = Cli::try_parse_from([
            "vellum-cli",
            "export",
            "in.png",
            "--scale",
            "4x",
            "--options-json",
            r#"{"scale":2,"format":"png","quality":90}"#,
        ])
        .unwrap();
        let Command::Export { ref export, .. } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(export.options().unwrap().scale, ExportScale::X2);
    }

    #[test]
    fn invalid_quality_is_rejected() {
        let cli =
            Cli::try_parse_from(["vellum-cli", "export", "in.png", "--quality", "7"]).unwrap();
        let Command::Export { ref export, .. } = cli.command else {
            panic!("expected export");
        };
        assert!(export.options().is_err());
    }

    #[test]
    fn crop_defaults_to_the_canvas_default() {
        let cli = Cli::try_parse_from(["vellum-cli", "crop", "in.png"]).unwrap();
        let Command::Crop { rect, min_size, .. } = cli.command else {
            panic!("expected crop");
        };
        assert_eq!(rect, CropRect::from_array(CanvasConfig::DEFAULT_CROP));
        assert!((min_size - CanvasConfig::DEFAULT_MIN_CROP_SIZE).abs() < EPS);
    }
}
