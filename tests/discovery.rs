//! End-to-end: settings file → plugin discovery → derived variant paths.
//!
//! Run with: cargo test --test discovery

use std::fs;
use std::path::Path;

use sized_image::config;
use sized_image::discover::{DirImporter, DiscoverError, autodiscover};
use sized_image::format::{ImageFormat, resolve_format};
use sized_image::naming::derive_path;
use sized_image::registry::SizedImageRegistry;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "sized-image.toml",
        r#"
installed_apps = ["auth", "blog", "shop.catalog"]
apps_dir = "apps"
media_url = "https://cdn.example.com/media/"
"#,
    );
    fs::create_dir_all(tmp.path().join("apps/auth")).unwrap();
    write(
        tmp.path(),
        "apps/blog/sizedimage.toml",
        r#"
[[variant]]
key = "thumb"
width = 100
height = 100

[[variant]]
key = "hero"
width = 1600
height = 900
"#,
    );
    write(
        tmp.path(),
        "apps/shop/catalog/sizedimage.toml",
        r#"
[[variant]]
key = "product"
width = 600
height = 600
"#,
    );
    tmp
}

#[test]
fn discovers_plugins_and_derives_paths() {
    let tmp = site();
    let settings = config::load_config(&tmp.path().join("sized-image.toml")).unwrap();
    let importer = DirImporter::new(settings.resolve_apps_dir(tmp.path()));
    let mut registry = SizedImageRegistry::new();

    let report = autodiscover(&settings.installed_apps, &importer, &mut registry).unwrap();

    assert_eq!(report.loaded, ["blog", "shop.catalog"]);
    assert_eq!(report.skipped, ["auth"]);
    assert_eq!(registry.len(), 3);

    let product = registry.get("product").unwrap().resize_key();
    assert_eq!(
        product.path(Some("uploads/red shoe.png"), settings.base_url()),
        "https://cdn.example.com/media/__sized/uploads/red%20shoe-product-600x600.png"
    );
    assert_eq!(
        product.path(None, None),
        "__sized/GLOBAL-PLACEHOLDER/placeholder-product-600x600.jpg"
    );
    assert_eq!(
        ImageFormat::from_filename(&product.filename("red shoe.png")),
        ImageFormat::Png
    );
}

#[test]
fn broken_plugin_stops_discovery_and_keeps_earlier_variants() {
    let tmp = site();
    write(
        tmp.path(),
        "apps/shop/catalog/sizedimage.toml",
        "[[variant]]\nkey = \"product\"\nwidth = 600\nheight = 600\n\n\
         [[variant]]\nkey = \"thumb\"\nwidth = 1\nheight = 1\n",
    );
    let settings = config::load_config(&tmp.path().join("sized-image.toml")).unwrap();
    let importer = DirImporter::new(settings.resolve_apps_dir(tmp.path()));
    let mut registry = SizedImageRegistry::new();

    let err = autodiscover(&settings.installed_apps, &importer, &mut registry).unwrap_err();

    assert!(matches!(err, DiscoverError::Plugin { ref app, .. } if app == "shop.catalog"));
    let keys: Vec<&str> = registry.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(keys, ["hero", "thumb"]);
}

#[test]
fn path_and_format_examples() {
    assert_eq!(
        derive_path(Some("images/photo.jpg"), 100, 200, "thumb", None),
        "__sized/images/photo-thumb-100x200.jpg"
    );
    assert_eq!(resolve_format("png"), ("PNG", "image/png"));
    assert_eq!(resolve_format("PNG"), ("JPEG", "image/jpeg"));
    assert_eq!(resolve_format("bmp"), ("JPEG", "image/jpeg"));
}
