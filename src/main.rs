use clap::{Parser, Subcommand};
use sized_image::discover::{DirImporter, autodiscover};
use sized_image::format::ImageFormat;
use sized_image::registry::SizedImageRegistry;
use sized_image::{config, logging, naming, output};
use std::path::{Path, PathBuf};

/// Dimensions and variant key shared by the path commands.
#[derive(clap::Args, Clone)]
struct ResizeArgs {
    /// Target width in pixels
    #[arg(long)]
    width: u32,
    /// Target height in pixels
    #[arg(long)]
    height: u32,
    /// Variant key embedded in the filename (e.g. "thumb")
    #[arg(long)]
    key: String,
}

impl ResizeArgs {
    fn resize_key(&self) -> naming::ResizeKey {
        naming::ResizeKey::new(self.width, self.height, self.key.clone())
    }
}

#[derive(Parser)]
#[command(name = "sized-image")]
#[command(version)]
#[command(about = "Paths, formats and plugin discovery for resized image variants")]
#[command(long_about = "\
Paths, formats and plugin discovery for resized image variants

Resized variants live under a single __sized/ directory that mirrors the
folders of the originals:

  images/photo.jpg  →  __sized/images/photo-thumb-100x200.jpg

Apps listed in the settings file may declare variants in a
sizedimage.toml plugin file:

  apps/
  ├── auth/                        # No plugin: skipped
  └── blog/
      └── sizedimage.toml          # [[variant]] key/width/height

Run 'sized-image gen-config' to print a documented settings file.")]
struct Cli {
    /// Settings file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the derived path of a resized variant
    Path {
        /// Path of the original image; omit for the placeholder path
        original: Option<String>,
        #[command(flatten)]
        resize: ResizeArgs,
        /// Base URL to resolve against (defaults to media_url from settings)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Print the derived filename of a resized variant
    Filename {
        /// Filename of the original image
        original: String,
        #[command(flatten)]
        resize: ResizeArgs,
    },
    /// Print the image format and MIME type for a file extension
    Format {
        /// Extension without the dot (case-sensitive)
        extension: String,
    },
    /// Load sizedimage plugins of all installed apps and list the variants
    Discover {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock settings file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Path {
            original,
            resize,
            base_url,
        } => {
            let settings = config::load_config(&cli.config)?;
            let base_url = base_url.as_deref().or(settings.base_url());
            println!("{}", resize.resize_key().path(original.as_deref(), base_url));
        }
        Command::Filename { original, resize } => {
            println!("{}", resize.resize_key().filename(&original));
        }
        Command::Format { extension } => {
            let format = ImageFormat::from_extension(&extension);
            println!("{}", output::format_format_output(&extension, format));
        }
        Command::Discover { json } => {
            let settings = config::load_config(&cli.config)?;
            let apps_dir = settings.resolve_apps_dir(config_dir(&cli.config));
            let importer = DirImporter::new(apps_dir);
            let mut registry = SizedImageRegistry::new();
            let report = autodiscover(&settings.installed_apps, &importer, &mut registry)?;
            if json {
                println!("{}", output::discover_json(&report, &registry)?);
            } else {
                output::print_discover_output(
                    &settings.installed_apps,
                    &report,
                    &registry,
                    settings.base_url(),
                );
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Directory the settings file lives in, for resolving relative paths.
fn config_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
