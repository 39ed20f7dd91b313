/// Picked and dropped file loader
///
/// Turns a filesystem path into a `PickedFile`. The declared media type
/// is guessed from the extension; files outside the image category are
/// rejected before any bytes are read.

use std::path::Path;
use std::sync::Arc;

use crate::state::data::{is_image_media_type, PickedFile};
use crate::state::error::{LoadError, ValidationError};

/// Extensions offered by the picker's image filter
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Guess the declared media type of a file from its extension
pub fn declared_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Load a file for acquisition
///
/// # Returns
/// * `Ok(PickedFile)` - an image-typed file with its contents
/// * `Err(LoadError::Invalid)` - the declared type is not an image
/// * `Err(LoadError::Read)` - the file could not be read
pub async fn load_file(path: &Path) -> Result<PickedFile, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let media_type = declared_media_type(path);
    if !is_image_media_type(&media_type) {
        tracing::warn!(file = %name, %media_type, "rejected non-image file");
        return Err(ValidationError::NotAnImage.into());
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| LoadError::Read {
        name: name.clone(),
        reason: e.to_string(),
    })?;

    tracing::debug!(file = %name, %media_type, len = bytes.len(), "loaded image file");

    Ok(PickedFile {
        name,
        media_type,
        bytes: Arc::from(bytes),
    })
}
