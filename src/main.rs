//! # labelrender CLI
//!
//! Command-line interface for rendering label documents.
//!
//! ## Usage
//!
//! ```bash
//! # Render a JSON element tree as EPL to stdout
//! labelrender render label.json
//!
//! # Render for a known printer, rotated, into a file
//! labelrender render label.json --profile gk420d --rotation 90 -o label.zpl
//!
//! # Use a JSON render configuration, overriding its backend
//! labelrender render label.json --config render.json --backend fingerprint
//!
//! # List printer presets
//! labelrender profiles
//!
//! # Trace the tree walk and image cache
//! RUST_LOG=labelrender=debug labelrender render label.json
//! ```

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use labelrender::{
    Backend, RenderConfig, RenderError, Renderer,
    config::{ImageMode, PrinterProfile},
    document::Document,
    geometry::ViewRotation,
    raster::EmbeddedImageSource,
};

/// labelrender - Vector label to printer command renderer
#[derive(Parser, Debug)]
#[command(name = "labelrender")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a JSON element tree into printer commands
    Render {
        /// Document file (JSON element tree)
        document: PathBuf,

        /// Render configuration file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Printer preset to start from (see `labelrender profiles`)
        #[arg(long, conflicts_with = "config")]
        profile: Option<String>,

        /// Printer command language
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Page rotation in degrees (0, 90, 180 or 270)
        #[arg(long)]
        rotation: Option<u16>,

        /// How images reach the printer
        #[arg(long, value_enum)]
        image_mode: Option<ImageMode>,

        /// Number of copies to print
        #[arg(long)]
        copies: Option<u32>,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the printer presets
    Profiles,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RenderError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            document,
            config,
            profile,
            backend,
            rotation,
            image_mode,
            copies,
            output,
        } => {
            let mut render_config = match (config, profile) {
                (Some(path), _) => RenderConfig::load(path)?,
                (None, Some(id)) => PrinterProfile::find(&id)
                    .ok_or_else(|| RenderError::Config(format!("unknown printer profile '{}'", id)))?
                    .config(),
                (None, None) => RenderConfig::default(),
            };
            if let Some(backend) = backend {
                render_config.backend = backend;
            }
            if let Some(degrees) = rotation {
                render_config.rotation = ViewRotation::try_from(degrees)?;
            }
            if let Some(mode) = image_mode {
                render_config.image_mode = mode;
            }
            if let Some(copies) = copies {
                render_config.copies = copies;
            }

            let doc: Document = serde_json::from_str(&std::fs::read_to_string(&document)?)?;
            log::info!(
                "rendering '{}' ({} top-level elements) as {}",
                document.display(),
                doc.children.len(),
                render_config.backend
            );

            let renderer = Renderer::for_config(&render_config)?;
            let bytes = renderer.render(&doc, &EmbeddedImageSource::new())?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    println!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Profiles => {
            println!("Available printer profiles:");
            for profile in PrinterProfile::ALL {
                println!(
                    "  {:<10} {:<24} {:<12} {} dpi, {}x{} dots",
                    profile.id,
                    profile.name,
                    profile.backend.to_string(),
                    profile.dpi,
                    profile.width_dots,
                    profile.height_dots
                );
            }
        }
    }

    Ok(())
}
