//! Export request options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Lowest accepted JPEG quality.
pub const MIN_QUALITY: u8 = 10;
/// Highest accepted JPEG quality.
pub const MAX_QUALITY: u8 = 100;
/// JPEG quality granularity.
pub const QUALITY_STEP: u8 = 5;
/// JPEG quality used when the user has not chosen one.
pub const DEFAULT_QUALITY: u8 = 90;

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy, opaque; transparency is flattened onto white.
    Jpeg,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Whether the quality setting affects this format.
    #[must_use]
    pub const fn uses_quality(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(ExportError::InvalidOptions(format!(
                "unknown format {other:?} (expected png or jpeg)"
            ))),
        }
    }
}

/// Output pixel multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ExportScale {
    /// Natural size.
    #[default]
    X1,
    /// Twice the natural size.
    X2,
    /// Four times the natural size.
    X4,
}

impl ExportScale {
    /// All scales, smallest first.
    pub const ALL: [Self; 3] = [Self::X1, Self::X2, Self::X4];

    /// The multiplier.
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
        }
    }
}

impl From<ExportScale> for u8 {
    fn from(scale: ExportScale) -> Self {
        match scale {
            ExportScale::X1 => 1,
            ExportScale::X2 => 2,
            ExportScale::X4 => 4,
        }
    }
}

impl TryFrom<u8> for ExportScale {
    type Error = ExportError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            other => Err(ExportError::InvalidOptions(format!(
                "scale must be 1, 2, or 4, got {other}"
            ))),
        }
    }
}

impl fmt::Display for ExportScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

impl FromStr for ExportScale {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches(['x', 'X']);
        let value: u8 = digits
            .parse()
            .map_err(|_| ExportError::InvalidOptions(format!("invalid scale {s:?}")))?;
        Self::try_from(value)
    }
}

/// A complete export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output pixel multiplier.
    pub scale: ExportScale,
    /// Output format.
    pub format: ExportFormat,
    /// JPEG quality in `[10, 100]`, step 5. Ignored for PNG.
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: ExportScale::X1,
            format: ExportFormat::Png,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ExportOptions {
    /// Check the quality setting.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidOptions`] when quality is outside
    /// `[10, 100]` or not a multiple of 5.
    pub fn validate(&self) -> Result<(), ExportError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ExportError::InvalidOptions(format!(
                "quality must be in [{MIN_QUALITY}, {MAX_QUALITY}], got {}",
                self.quality
            )));
        }
        if self.quality % QUALITY_STEP != 0 {
            return Err(ExportError::InvalidOptions(format!(
                "quality must be a multiple of {QUALITY_STEP}, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Suggested download name: `<base>-<scale>x.<ext>`.
    #[must_use]
    pub fn filename(&self, base: &str) -> String {
        format!(
            "{base}-{}x.{}",
            self.scale.factor(),
            self.format.extension()
        )
    }
}

/// Snap a requested quality to the nearest step and clamp it to range.
#[must_use]
pub fn snap_quality(requested: i32) -> u8 {
    let step = i32::from(QUALITY_STEP);
    let snapped = (requested + step / 2).div_euclid(step) * step;
    let clamped = snapped.clamp(i32::from(MIN_QUALITY), i32::from(MAX_QUALITY));
    u8::try_from(clamped).unwrap_or(DEFAULT_QUALITY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = ExportOptions::default();
        assert_eq!(o.scale, ExportScale::X1);
        assert_eq!(o.format, ExportFormat::Png);
        assert_eq!(o.quality, 90);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn quality_bounds_and_step() {
        let mut o = ExportOptions::default();
        for q in [10, 55, 100] {
            o.quality = q;
            assert!(o.validate().is_ok(), "{q}");
        }
        for q in [0, 5, 101, 92] {
            o.quality = q;
            assert!(o.validate().is_err(), "{q}");
        }
    }

    #[test]
    fn snapping() {
        assert_eq!(snap_quality(92), 90);
        assert_eq!(snap_quality(93), 95);
        assert_eq!(snap_quality(-40), 10);
        assert_eq!(snap_quality(7), 10);
        assert_eq!(snap_quality(250), 100);
    }

    #[test]
    fn scale_parsing() {
        assert_eq!("2".parse::<ExportScale>().unwrap(), ExportScale::X2);
        assert_eq!("4x".parse::<ExportScale>().unwrap(), ExportScale::X4);
        assert!("3".parse::<ExportScale>().is_err());
        assert!("big".parse::<ExportScale>().is_err());
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert!("gif".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn filename_and_mime() {
        let o = ExportOptions {
            scale: ExportScale::X2,
            format: ExportFormat::Jpeg,
            quality: 80,
        };
        assert_eq!(o.filename("result"), "result-2x.jpg");
        assert_eq!(o.format.mime_type(), "image/jpeg");
        assert!(o.format.uses_quality());
        assert!(!ExportFormat::Png.uses_quality());
    }

    #[test]
    fn serde_uses_plain_numbers() {
        let o = ExportOptions {
            scale: ExportScale::X4,
            ..ExportOptions::default()
        };
        let json = serde_json::to_string(&o).unwrap();
        assert_eq!(json, r#"{"scale":4,"format":"png","quality":90}"#);
        assert!(serde_json::from_str::<ExportOptions>(r#"{"scale":3}"#).is_err());
    }
}
