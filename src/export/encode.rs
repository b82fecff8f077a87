//! PNG and data-URL encoding of composited snapshots.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::task;

use super::types::ExportError;
use crate::draw::effects::PixelBlock;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes a snapshot as PNG bytes.
///
/// An encoder that yields nothing is reported as [`ExportError::EmptyImage`]
/// rather than handed back as an empty image.
pub fn encode_png(snapshot: &PixelBlock) -> Result<Vec<u8>, ExportError> {
    let surface = snapshot
        .to_surface()
        .map_err(crate::draw::RenderError::from)?;
    let mut png = Vec::new();
    surface.write_to_png(&mut png)?;
    if png.is_empty() {
        return Err(ExportError::EmptyImage);
    }
    log::debug!(
        "Encoded {}x{} snapshot as {} PNG bytes",
        snapshot.width,
        snapshot.height,
        png.len()
    );
    Ok(png)
}

/// Encodes on Tokio's blocking pool so the input thread keeps running.
pub async fn encode_png_async(snapshot: PixelBlock) -> Result<Vec<u8>, ExportError> {
    task::spawn_blocking(move || encode_png(&snapshot))
        .await
        .map_err(|e| ExportError::Task(format!("Encode task failed: {}", e)))?
}

/// Wraps PNG bytes in a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn snapshot() -> PixelBlock {
        let mut block = PixelBlock::new(3, 2);
        block.set_pixel(1, 1, [10, 20, 30, 255]);
        block
    }

    #[test]
    fn png_has_magic_header() {
        let png = encode_png(&snapshot()).expect("encode");
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn data_url_round_trips_through_base64() {
        let png = encode_png(&snapshot()).expect("encode");
        let url = to_data_url(&png);

        let payload = url
            .strip_prefix("data:image/png;base64,")
            .expect("data url prefix");
        assert_eq!(STANDARD.decode(payload).expect("valid base64"), png);
    }

    #[tokio::test]
    async fn async_encoding_matches_sync() {
        let sync = encode_png(&snapshot()).expect("sync encode");
        let from_worker = encode_png_async(snapshot()).await.expect("async encode");
        assert_eq!(sync, from_worker);
    }
}
