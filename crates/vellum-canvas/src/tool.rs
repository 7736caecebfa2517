//! The single active interaction tool.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which tool currently owns pointer input on the canvas.
///
/// Exactly one variant is active; controllers for other tools ignore
/// input until the host switches mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolMode {
    /// No tool; the image is shown but not interactive.
    #[default]
    None,
    /// Drag pans the image.
    Pan,
    /// Drag moves the text label.
    TextDrag,
    /// Drag moves or resizes the crop box.
    CropEdit,
    /// Pointer input belongs to the external mask painter.
    MaskPaint,
    /// Drag moves the before/after slider.
    CompareSlider,
}

impl ToolMode {
    /// All modes, in toolbar order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Pan,
        Self::TextDrag,
        Self::CropEdit,
        Self::MaskPaint,
        Self::CompareSlider,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Pan => "Pan",
            Self::TextDrag => "Text",
            Self::CropEdit => "Crop",
            Self::MaskPaint => "Mask",
            Self::CompareSlider => "Compare",
        }
    }

    /// Whether wheel zoom applies in this mode.
    ///
    /// The comparator shows two images side by side in their own
    /// container, so the pan/zoom transform is frozen there.
    #[must_use]
    pub const fn allows_zoom(self) -> bool {
        !matches!(self, Self::CompareSlider)
    }

    /// Whether the canvas draws the crop box.
    #[must_use]
    pub const fn shows_crop(self) -> bool {
        matches!(self, Self::CropEdit)
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_none() {
        assert_eq!(ToolMode::default(), ToolMode::None);
    }

    #[test]
    fn zoom_is_frozen_only_in_compare() {
        for mode in ToolMode::ALL {
            assert_eq!(mode.allows_zoom(), mode != ToolMode::CompareSlider);
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&ToolMode::CropEdit).unwrap(),
            "\"crop-edit\""
        );
        let m: ToolMode = serde_json::from_str("\"compare-slider\"").unwrap();
        assert_eq!(m, ToolMode::CompareSlider);
    }
}
