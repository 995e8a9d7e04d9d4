//! File extension → image format lookup.
//!
//! Resized variants are saved in the format implied by the extension of the
//! derived filename. Only three formats are recognised; anything else is
//! saved as JPEG.
//!
//! | Extension | Format | MIME type |
//! |-----------|--------|-----------|
//! | `png` | `PNG` | `image/png` |
//! | `jpe`, `jpeg`, `jpg` | `JPEG` | `image/jpeg` |
//! | `gif` | `GIF` | `image/gif` |
//!
//! Lookup is case-sensitive: `"PNG"` is an unknown extension and resolves
//! to JPEG.

use serde::{Deserialize, Serialize};

use crate::naming::split_extension;

/// A supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Resolve a lowercase extension (without the dot). Unknown → JPEG.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "png" => ImageFormat::Png,
            "jpe" | "jpeg" | "jpg" => ImageFormat::Jpeg,
            "gif" => ImageFormat::Gif,
            _ => ImageFormat::Jpeg,
        }
    }

    /// Resolve from the extension of a filename, using the same split as
    /// [`derive_filename`](crate::naming::derive_filename).
    pub fn from_filename(filename: &str) -> Self {
        let (_, ext) = split_extension(filename);
        Self::from_extension(ext)
    }

    /// Format name as used by image encoders (`"PNG"`, `"JPEG"`, `"GIF"`).
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve an extension to its `(format_name, mime_type)` pair.
pub fn resolve_format(extension: &str) -> (&'static str, &'static str) {
    let format = ImageFormat::from_extension(extension);
    (format.name(), format.mime_type())
}
