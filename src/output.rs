//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and, where the binary needs one, a `print_*` wrapper writing to stdout.
//!
//! ## Discover
//!
//! ```text
//! Apps
//! 001 auth (no plugin)
//! 002 blog
//!
//! Variants
//! hero 1600x900
//! thumb 100x100
//!     Placeholder: __sized/GLOBAL-PLACEHOLDER/placeholder-thumb-100x100.jpg
//! ```

use serde::Serialize;

use crate::discover::Report;
use crate::format::ImageFormat;
use crate::registry::{SizedImageRegistry, Variant};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Lines for the `discover` command, apps listed in the order they ran.
pub fn format_discover_output(
    installed_apps: &[String],
    report: &Report,
    registry: &SizedImageRegistry,
    base_url: Option<&str>,
) -> Vec<String> {
    let mut lines = vec!["Apps".to_string()];
    if installed_apps.is_empty() {
        lines.push(format!("{}(none installed)", indent(1)));
    }
    for (i, app) in installed_apps.iter().enumerate() {
        let suffix = if report.skipped.contains(app) {
            " (no plugin)"
        } else {
            ""
        };
        lines.push(format!("{} {app}{suffix}", format_index(i + 1)));
    }

    lines.push(String::new());
    lines.push("Variants".to_string());
    if registry.is_empty() {
        lines.push(format!("{}(none registered)", indent(1)));
    }
    for variant in registry.iter() {
        lines.push(format!("{} {}x{}", variant.key, variant.width, variant.height));
        lines.push(format!(
            "{}Placeholder: {}",
            indent(1),
            variant.resize_key().path(None, base_url)
        ));
    }
    lines
}

pub fn print_discover_output(
    installed_apps: &[String],
    report: &Report,
    registry: &SizedImageRegistry,
    base_url: Option<&str>,
) {
    for line in format_discover_output(installed_apps, report, registry, base_url) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct DiscoverJson<'a> {
    #[serde(flatten)]
    report: &'a Report,
    variants: Vec<&'a Variant>,
}

/// JSON document for `discover --json`.
pub fn discover_json(
    report: &Report,
    registry: &SizedImageRegistry,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DiscoverJson {
        report,
        variants: registry.iter().collect(),
    })
}

/// Line for the `format` command: `png → PNG image/png`.
pub fn format_format_output(extension: &str, format: ImageFormat) -> String {
    format!("{extension} → {} {}", format.name(), format.mime_type())
}
