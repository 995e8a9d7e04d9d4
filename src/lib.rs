//! # sized-image
//!
//! Support code for an image field that serves resized variants of uploaded
//! images. It does not resize anything itself; it answers three questions
//! the resizing layer keeps asking:
//!
//! 1. **Where does a variant live?** [`naming::derive_path`] maps an original
//!    path, target dimensions and a variant key to a deterministic path such
//!    as `__sized/images/photo-thumb-100x200.jpg`, optionally resolved
//!    against a base URL.
//! 2. **What format is it saved in?** [`format::resolve_format`] maps a file
//!    extension to an encoder format name and MIME type.
//! 3. **Which variants exist?** [`discover::autodiscover`] imports the
//!    optional `sizedimage` plugin of every installed app; plugins register
//!    named variants in a [`registry::SizedImageRegistry`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Derived filenames and paths for resized variants |
//! | [`uri`] | Percent-encoding and base-URL resolution for derived paths |
//! | [`format`] | Extension → image format table |
//! | [`registry`] | Variant registry with snapshot/rollback transactions |
//! | [`discover`] | Plugin auto-discovery over pluggable importers |
//! | [`config`] | `sized-image.toml` loading, merging, and validation |
//! | [`logging`] | `tracing` subscriber setup for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Paths Are Derived, Never Stored
//!
//! A variant's path is a pure function of its inputs. Nothing records which
//! variants were generated; callers recompute the path and check their
//! cache or storage. Missing sources all map to one placeholder family, so a
//! single placeholder image per size serves every empty field.
//!
//! ## Check Before Import
//!
//! Discovery asks whether a plugin exists before importing it instead of
//! importing and inspecting the failure. A plugin that is present but broken
//! can then never be mistaken for an absent one, whatever error it raises.
//!
//! ## Scoped Rollback
//!
//! Each plugin import runs in a [`registry::Transaction`] that restores the
//! registry on drop unless committed. Every early return rolls back without
//! any cleanup code on the error paths.

pub mod config;
pub mod discover;
pub mod format;
pub mod logging;
pub mod naming;
pub mod output;
pub mod registry;
pub mod uri;

#[cfg(test)]
pub(crate) mod test_helpers;
