//! Saving traced images to disk.

use std::path::Path;

use image::RgbaImage;
use tracing::info;

/// Save an image; the format follows the file extension.
pub fn save_image(image: &RgbaImage, path: impl AsRef<Path>) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    image
        .save(path)
        .map_err(|e| ScreenshotError::SaveFailed(e.to_string()))?;

    info!("Image saved: {}", path.display());
    Ok(())
}

/// Errors that can occur while saving an image.
#[derive(Debug)]
pub enum ScreenshotError {
    /// Failed to encode or write the file.
    SaveFailed(String),
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SaveFailed(e) => write!(f, "Failed to save image: {e}"),
        }
    }
}

impl std::error::Error for ScreenshotError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_roundtrip() {
        let path = std::env::temp_dir().join(format!("voxelcast_roundtrip_{}.png", std::process::id()));
        let data: Vec<u8> = (0..2 * 3 * 4).map(|i| (i * 10) as u8).collect();
        let image = RgbaImage::from_raw(2, 3, data.clone()).unwrap();
        save_image(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.dimensions(), (2, 3));
        assert_eq!(loaded.into_raw(), data);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unknown_extension_fails_to_save() {
        let path = std::env::temp_dir().join("voxelcast_image.unknownext");
        let err = save_image(&RgbaImage::new(1, 1), &path).unwrap_err();
        assert!(matches!(err, ScreenshotError::SaveFailed(_)));
        assert!(err.to_string().starts_with("Failed to save image"));
    }
}
