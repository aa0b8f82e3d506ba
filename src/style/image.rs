use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::error::{QuoteError, QuoteResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// How the preview references its background image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Uploaded and embedded as a `data:` URL.
    Embedded { data_url: String },
    /// Referenced by path, not embedded. Skipped by snapshots in `CrossOrigin::Anonymous` mode.
    Linked { path: PathBuf },
}

/// Decoded background image ready for rasterization.
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    pub origin: ImageOrigin,
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl BackgroundImage {
    /// Read an uploaded image file and embed it as a data URL.
    pub fn load(path: &Path) -> QuoteResult<Self> {
        let bytes = read_image_file(path)?;
        Self::from_upload(&bytes)
    }

    /// Decode in-memory upload bytes and embed them as a data URL.
    pub fn from_upload(bytes: &[u8]) -> QuoteResult<Self> {
        let data_url = to_data_url(bytes)?;
        let (width, height, rgba8_premul) = decode_premul(bytes)?;
        Ok(Self {
            origin: ImageOrigin::Embedded { data_url },
            width,
            height,
            rgba8_premul,
        })
    }

    /// Reference an image file without embedding it.
    pub fn link(path: &Path) -> QuoteResult<Self> {
        let bytes = read_image_file(path)?;
        let (width, height, rgba8_premul) = decode_premul(&bytes)?;
        Ok(Self {
            origin: ImageOrigin::Linked {
                path: path.to_path_buf(),
            },
            width,
            height,
            rgba8_premul,
        })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.origin, ImageOrigin::Embedded { .. })
    }

    pub fn data_url(&self) -> Option<&str> {
        match &self.origin {
            ImageOrigin::Embedded { data_url } => Some(data_url),
            ImageOrigin::Linked { .. } => None,
        }
    }
}

fn read_image_file(path: &Path) -> QuoteResult<Vec<u8>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image '{}'", path.display()))?;
    Ok(bytes)
}

/// Encode image bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(bytes: &[u8]) -> QuoteResult<String> {
    let format = image::guess_format(bytes)
        .map_err(|e| QuoteError::validation(format!("unrecognized image format: {e}")))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

fn decode_premul(bytes: &[u8]) -> QuoteResult<(u32, u32, Arc<Vec<u8>>)> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(QuoteError::validation("background image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok((width, height, Arc::new(rgba8_premul)))
}

#[cfg(test)]
#[path = "../../tests/unit/style/image.rs"]
mod tests;
