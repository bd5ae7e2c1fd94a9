//! Turning uploaded image files into image elements.

use crate::element::{DEFAULT_POSITION, Element, ElementId, ImageFormat, ImageProps, fit_within};
use std::io::Cursor;
use thiserror::Error;

/// Why a single file was not imported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("{0} is not an image type")]
    NotAnImage(String),
    #[error("Cannot decode image: {0}")]
    Decode(String),
}

/// A file handed to the importer.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Guess the MIME type from the file extension.
    pub fn from_path_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = std::path::Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .map_or("application/octet-stream", |f| f.mime_type());
        Self::new(name, mime, bytes)
    }
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<ElementId>,
    pub rejected: Vec<(String, ImportError)>,
}

/// Read the pixel dimensions from the image header.
pub fn natural_size(bytes: &[u8]) -> Result<(u32, u32), ImportError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImportError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImportError::Decode(e.to_string()))
}

/// Build the element for the `index`-th file of a batch.
///
/// The natural size is fitted inside `max_size` and rounded to whole units. The element is staggered
/// 20 units per index from the default position.
pub fn image_element(file: &ImportFile, index: usize, max_size: (f64, f64)) -> Result<Element, ImportError> {
    if !file.mime.starts_with("image/") {
        return Err(ImportError::NotAnImage(file.mime.clone()));
    }
    let (w, h) = natural_size(&file.bytes)?;
    let (width, height) = fit_within(w as f64, h as f64, max_size.0, max_size.1);
    let (width, height) = (width.round(), height.round());
    let step = 20.0 * index as f64;
    let props = ImageProps::from_bytes(&file.mime, &file.bytes, file.name.clone());
    Ok(Element::image(props, width, height).at(DEFAULT_POSITION.x + step, DEFAULT_POSITION.y + step))
}
