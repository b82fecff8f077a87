use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use snapscribe::{Config, Editor, Script, export};

#[derive(Parser, Debug)]
#[command(name = "snapscribe")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SNAPSCRIBE_GIT_HASH"), ")"),
    about = "Annotate a screenshot and export the flattened image"
)]
struct Cli {
    /// Screenshot to annotate (PNG)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the exported PNG here instead of the configured save directory
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Replay the editing steps in this TOML script before exporting
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Device pixel ratio the screenshot was captured at
    #[arg(long, default_value_t = 1.0, value_name = "RATIO")]
    scale: f64,

    /// Print the export as a PNG data URL instead of saving a file
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "output")]
    data_url: bool,

    /// Use this config file instead of ~/.config/snapscribe/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let background = load_png(&cli.input)?;
    log::info!(
        "Opened {} ({}x{})",
        cli.input.display(),
        background.width(),
        background.height()
    );

    let mut editor = Editor::open(background, cli.scale, config.editor_options())
        .context("Failed to open the image for editing")?;

    if let Some(script_path) = &cli.script {
        let script = Script::load(script_path)?;
        let applied = script.run(&mut editor)?;
        log::info!("Applied {} script steps", applied);
    }
    // Closes any live text editors so their text lands in the export
    editor.exit_edit_mode();

    if cli.data_url {
        println!("{}", editor.export_png_image_to_data_url()?);
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let png = rt.block_on(editor.export_png_image())?;

    let saved = match &cli.output {
        Some(path) => export::save_image_to(path, &png)?,
        None => export::save_image(&png, &config.file_save_config())?,
    };
    println!("{}", saved.display());

    Ok(())
}

fn load_png(path: &Path) -> Result<cairo::ImageSurface> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    cairo::ImageSurface::create_from_png(&mut file)
        .with_context(|| format!("Failed to decode PNG {}", path.display()))
}
