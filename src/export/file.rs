//! Writing exported PNGs to disk.

use super::types::ExportError;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Where and under which name exports are saved when the caller gives no
/// explicit path.
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    pub save_directory: PathBuf,
    /// chrono format string; the extension is appended
    pub filename_template: String,
    pub format: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self {
            save_directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Snapscribe"),
            filename_template: "snapscribe_%Y-%m-%d_%H%M%S".to_string(),
            format: "png".to_string(),
        }
    }
}

impl FileSaveConfig {
    /// Path for an export taken at `now`. Never names an existing file: a
    /// clash gets a `-2`, `-3`, ... suffix, since templates only resolve to
    /// the second.
    pub fn path_for(&self, now: DateTime<Local>) -> PathBuf {
        let stem = now.format(&self.filename_template).to_string();
        let candidate = self.save_directory.join(format!("{}.{}", stem, self.format));
        if !candidate.exists() {
            return candidate;
        }
        (2u32..)
            .map(|n| {
                self.save_directory
                    .join(format!("{}-{}.{}", stem, n, self.format))
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

/// Expands a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Saves PNG bytes under a generated name in the configured directory.
pub fn save_image(image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
    if !config.save_directory.exists() {
        log::info!("Creating export directory: {}", config.save_directory.display());
        fs::create_dir_all(&config.save_directory)?;
    }
    save_image_to(&config.path_for(Local::now()), image_data)
}

/// Saves PNG bytes to an explicit path, readable by the owner only.
///
/// Missing parent directories are created. An empty payload is refused
/// rather than written as a zero-byte image.
pub fn save_image_to(file_path: &Path, image_data: &[u8]) -> Result<PathBuf, ExportError> {
    if image_data.is_empty() {
        return Err(ExportError::EmptyImage);
    }
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(file_path, image_data)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(file_path, Permissions::from_mode(0o600))?;
    }

    log::info!(
        "Saved {} bytes to {}",
        image_data.len(),
        file_path.display()
    );
    Ok(file_path.to_path_buf())
}
