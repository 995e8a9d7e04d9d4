//! Derived filenames and paths for resized image variants.
//!
//! Every resized variant of a source image lives under a single top-level
//! directory, mirroring the folder layout of the originals:
//!
//! ```text
//! images/photo.jpg  →  __sized/images/photo-thumb-100x200.jpg
//!                              │      │     │     │
//!                              │      │     │     └ width x height
//!                              │      │     └ variant key
//!                              │      └ stem of the original
//!                              └ containing folder of the original
//! ```
//!
//! ## Determinism
//!
//! Paths are never stored. They are recomputed from the original path, the
//! dimensions and the variant key whenever they are needed, so the same inputs
//! always give the same string. Sources that do not exist share one
//! placeholder family: `__sized/GLOBAL-PLACEHOLDER/placeholder-<key>-<w>x<h>.jpg`.
//!
//! ## Cache keys
//!
//! The derived path doubles as a lookup key in external key-value caches,
//! several of which reject keys containing spaces. Spaces are therefore
//! removed from the final string (after URL encoding, when a base URL is
//! given, so spaces in the original path survive as `%20` while spaces in
//! the base URL itself disappear).

use crate::uri;

/// Top-level directory holding every resized variant.
pub const SIZED_DIRECTORY_NAME: &str = "__sized";

/// Filename used when there is no source image.
pub const PLACEHOLDER_FILENAME: &str = "placeholder.jpg";

/// Folder used when there is no source image.
pub const PLACEHOLDER_FOLDER: &str = "GLOBAL-PLACEHOLDER";

/// Extension given to filenames that have none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Dimensions plus the variant key identifying one resize of a source image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResizeKey {
    pub width: u32,
    pub height: u32,
    /// Caller-chosen name of the variant (e.g. `"thumb"`), used verbatim.
    pub filename_key: String,
}

impl ResizeKey {
    pub fn new(width: u32, height: u32, filename_key: impl Into<String>) -> Self {
        Self {
            width,
            height,
            filename_key: filename_key.into(),
        }
    }

    /// See [`derive_filename`].
    pub fn filename(&self, original_filename: &str) -> String {
        derive_filename(
            original_filename,
            self.width,
            self.height,
            &self.filename_key,
        )
    }

    /// See [`derive_path`].
    pub fn path(&self, original_path: Option<&str>, base_url: Option<&str>) -> String {
        derive_path(
            original_path,
            self.width,
            self.height,
            &self.filename_key,
            base_url,
        )
    }
}

/// Split a filename at its last dot into `(stem, extension)`.
///
/// Filenames without a dot get [`DEFAULT_EXTENSION`].
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (filename, DEFAULT_EXTENSION),
    }
}

/// Build the filename of a resized variant.
///
/// - `"photo.jpg"`, 100x200, `"thumb"` → `"photo-thumb-100x200.jpg"`
/// - `"archive.tar.gz"`, 1x2, `"k"` → `"archive.tar-k-1x2.gz"`
/// - `"README"`, 10x10, `"k"` → `"README-k-10x10.jpg"`
/// - `""`, 10x10, `"k"` → `"-k-10x10.jpg"`
pub fn derive_filename(
    original_filename: &str,
    width: u32,
    height: u32,
    variant_key: &str,
) -> String {
    let (stem, ext) = split_extension(original_filename);
    format!("{stem}-{variant_key}-{width}x{height}.{ext}")
}

/// Split a path at its last `/` into `(containing_folder, filename)`.
///
/// Trailing slashes are dropped from the folder unless the folder is made
/// of slashes only, so `"a//b.jpg"` gives `("a", "b.jpg")` and `"/b.jpg"`
/// gives `("/", "b.jpg")`.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => {
            let head = &path[..=pos];
            let trimmed = head.trim_end_matches('/');
            let folder = if trimmed.is_empty() { head } else { trimmed };
            (folder, &path[pos + 1..])
        }
        None => ("", path),
    }
}

/// Join path segments with `/`, skipping empty ones.
fn join_segments(segments: &[&str]) -> String {
    let mut joined = String::new();
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        if !joined.is_empty() && !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(segment);
    }
    joined
}

/// Build the path of a resized variant of `original_path`.
///
/// `None` and `Some("")` both mean "no source image" and produce the
/// placeholder path. When `base_url` is a non-empty string the path is
/// percent-encoded and resolved against it.
pub fn derive_path(
    original_path: Option<&str>,
    width: u32,
    height: u32,
    variant_key: &str,
    base_url: Option<&str>,
) -> String {
    let (containing_folder, filename) = match original_path {
        Some(path) if !path.is_empty() => split_path(path),
        _ => (PLACEHOLDER_FOLDER, PLACEHOLDER_FILENAME),
    };

    let resized_filename = derive_filename(filename, width, height, variant_key);
    let joined = join_segments(&[
        SIZED_DIRECTORY_NAME,
        containing_folder.trim_start_matches('/'),
        &resized_filename,
    ]);

    let path = match base_url {
        // Spaces in the base are dropped before joining; `url` would turn
        // them into `%20` and they would survive the final strip.
        Some(base) if !base.is_empty() => {
            uri::join(&base.replace(' ', ""), &uri::filepath_to_uri(&joined))
        }
        _ => joined,
    };
    path.replace(' ', "")
}
