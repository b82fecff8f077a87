//! Flattened raster export.
//!
//! This module turns a composited snapshot into:
//! - PNG bytes (synchronously or on a blocking worker)
//! - A `data:` URL for previews
//! - A timestamped file in the configured save directory

pub mod encode;
pub mod file;
pub mod types;

pub use encode::{encode_png, encode_png_async, to_data_url};
pub use file::{FileSaveConfig, save_image, save_image_to};
pub use types::ExportError;
