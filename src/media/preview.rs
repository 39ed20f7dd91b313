/// Preview generation for the selected image
/// Decodes the payload off the UI thread into a displayable handle
use iced::widget::image::Handle;
use std::sync::Arc;

/// A displayable rendition of the selected image
#[derive(Debug, Clone)]
pub struct Preview {
    pub handle: Handle,
    /// Pixel dimensions, when the payload could be decoded here
    pub dimensions: Option<(u32, u32)>,
}

/// Derive a preview from the raw image bytes
///
/// Never fails: payloads the `image` crate cannot decode are handed to
/// iced as-is and rendered (or not) by the widget.
pub async fn generate_preview(bytes: Arc<[u8]>) -> Preview {
    let fallback = Arc::clone(&bytes);

    // Spawn blocking task for CPU-bound work
    match tokio::task::spawn_blocking(move || decode_preview_blocking(&bytes)).await {
        Ok(Ok(preview)) => preview,
        Ok(Err(reason)) => {
            tracing::debug!(%reason, "preview decode failed, using encoded bytes");
            encoded_preview(&fallback)
        }
        Err(e) => {
            tracing::warn!(error = %e, "preview task join error");
            encoded_preview(&fallback)
        }
    }
}

/// Blocking version of preview generation
fn decode_preview_blocking(bytes: &[u8]) -> Result<Preview, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    tracing::debug!(width, height, "decoded preview");

    Ok(Preview {
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
        dimensions: Some((width, height)),
    })
}

fn encoded_preview(bytes: &[u8]) -> Preview {
    Preview {
        handle: Handle::from_bytes(bytes.to_vec()),
        dimensions: None,
    }
}
