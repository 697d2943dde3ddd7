// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Command line front end: open a base image, place it, export the region.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};

use noctua_export::app::{EditorEvent, EditorSession, Outcome};
use noctua_export::config::{AppConfig, Theme};
use noctua_export::constant::EXPORT_SUFFIX;
use noctua_export::domain::document::open_document;
use noctua_export::domain::export::ExportFormat;
use noctua_export::domain::geometry::DisplayTransform;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// Export the region locked to a base image's original size.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Base image to open.
    pub file: PathBuf,

    /// Output file (defaults to `<stem>-export.<ext>` in the pictures directory).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the output extension, then PNG).
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// JPEG quality (1-100).
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Display scale of the base layer.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Horizontal translation of the base layer.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub translate_x: f32,

    /// Vertical translation of the base layer.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub translate_y: f32,

    /// Additional images layered on top of the base, centered on the canvas.
    #[arg(short, long)]
    pub layer: Vec<PathBuf>,

    /// Also write the editing preview (canvas with dimmed overlay).
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Theme for the preview mask.
    #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::default();
    config.theme = args.theme.into();
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality;
    }

    let mut session = EditorSession::new(config);

    let base = open_document(&args.file)?;
    session.handle(EditorEvent::LoadBase {
        image: base,
        path: Some(args.file.clone()),
    })?;

    let transform = DisplayTransform::new(args.scale, args.translate_x, args.translate_y);
    session.handle(EditorEvent::TransformChanged(transform))?;

    for path in &args.layer {
        let image = open_document(path)?;
        if let Outcome::Ignored = session.handle(EditorEvent::AddLayer { image })? {
            log::warn!("Layer {} was not added", path.display());
        }
    }

    let format = resolve_format(&args, session.config());
    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output(&args.file, session.config(), format),
    };

    session
        .export_to(&output, format)
        .with_context(|| format!("Failed to export {}", output.display()))?;

    if let Some(preview_path) = &args.preview {
        let preview = session.render_preview()?;
        preview
            .save(preview_path)
            .with_context(|| format!("Failed to write preview {}", preview_path.display()))?;
        log::info!("Wrote preview {}", preview_path.display());
    }

    Ok(())
}

fn resolve_format(args: &Args, config: &AppConfig) -> ExportFormat {
    match args.format {
        Some(FormatArg::Png) => ExportFormat::Png,
        Some(FormatArg::Jpg) => ExportFormat::jpeg(config.jpeg_quality),
        None => args
            .output
            .as_deref()
            .and_then(|p| ExportFormat::from_path(p, config.jpeg_quality))
            .unwrap_or(ExportFormat::Png),
    }
}

fn default_output(input: &Path, config: &AppConfig, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let name = format!("{stem}-{EXPORT_SUFFIX}.{}", format.extension());

    match &config.default_export_dir {
        Some(dir) if dir.is_dir() => dir.join(name),
        _ => input.with_file_name(name),
    }
}
