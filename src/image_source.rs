use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use reqwest::blocking::Client;
use std::fmt;
use std::io::{BufRead, Cursor, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::point::ImageDimensions;

/// Where to get a training image from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Url(String),
}

impl ImageSource {
    /// Interpret free-form user input: anything with a scheme is a URL, the rest is a path
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.contains("://") {
            Some(ImageSource::Url(trimmed.to_string()))
        } else {
            Some(ImageSource::File(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(p) => write!(f, "{}", p.display()),
            ImageSource::Url(u) => write!(f, "{u}"),
        }
    }
}

/// An acquired image: its native size plus the pixels the view draws from
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: ImageSource,
    pub dimensions: ImageDimensions,
    pub pixels: DynamicImage,
}

impl LoadedImage {
    pub fn new(source: ImageSource, pixels: DynamicImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            source,
            dimensions: ImageDimensions::new(width, height),
            pixels,
        }
    }
}

#[derive(Debug)]
pub enum ImageLoadError {
    /// The source kind cannot be fetched by this loader
    UnsupportedSource(String),
    /// Decodable, but not a PNG or JPEG
    UnsupportedFormat(String),
    /// Image has a zero width or height
    Empty,
    Io(std::io::Error),
    Decode(image::ImageError),
    /// Request failed or the server answered with an error status
    Http(reqwest::Error),
}

impl fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageLoadError::UnsupportedSource(s) => write!(f, "cannot load images from {s}"),
            ImageLoadError::UnsupportedFormat(s) => {
                write!(f, "unsupported image format {s} (expected PNG or JPEG)")
            }
            ImageLoadError::Empty => write!(f, "image has no pixels"),
            ImageLoadError::Io(e) => write!(f, "IO error: {e}"),
            ImageLoadError::Decode(e) => write!(f, "decode error: {e}"),
            ImageLoadError::Http(e) => write!(f, "download failed: {e}"),
        }
    }
}

impl std::error::Error for ImageLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageLoadError::Io(e) => Some(e),
            ImageLoadError::Decode(e) => Some(e),
            ImageLoadError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImageLoadError {
    fn from(e: std::io::Error) -> Self {
        ImageLoadError::Io(e)
    }
}

impl From<image::ImageError> for ImageLoadError {
    fn from(e: image::ImageError) -> Self {
        ImageLoadError::Decode(e)
    }
}

impl From<reqwest::Error> for ImageLoadError {
    fn from(e: reqwest::Error) -> Self {
        ImageLoadError::Http(e)
    }
}

/// Capability that turns a source into a loaded image, or fails once
pub trait ImageLoader {
    fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImageLoadError>;
}

/// Whole-request timeout for downloads
pub const FETCH_TIMEOUT_SECS: u64 = 20;

/// Loads PNG and JPEG images from local paths, `file://` URLs and http(s) URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceImageLoader;

impl SourceImageLoader {
    fn load_path(&self, path: &Path) -> Result<DynamicImage, ImageLoadError> {
        decode(ImageReader::open(path)?)
    }

    fn fetch(&self, url: &str) -> Result<DynamicImage, ImageLoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
        tracing::debug!(url, len = bytes.len(), "downloaded image");
        decode_bytes(&bytes)
    }
}

/// Decode an in-memory PNG or JPEG
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, ImageLoadError> {
    decode(ImageReader::new(Cursor::new(bytes)))
}

fn decode<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<DynamicImage, ImageLoadError> {
    let reader = reader.with_guessed_format()?;
    match reader.format() {
        Some(ImageFormat::Png) | Some(ImageFormat::Jpeg) => {}
        Some(other) => return Err(ImageLoadError::UnsupportedFormat(format!("{other:?}"))),
        None => return Err(ImageLoadError::UnsupportedFormat("unknown".to_string())),
    }
    Ok(reader.decode()?)
}

impl ImageLoader for SourceImageLoader {
    fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImageLoadError> {
        let pixels = match source {
            ImageSource::File(path) => self.load_path(path)?,
            ImageSource::Url(url) => {
                let (scheme, rest) = url.split_once("://").unwrap_or((url.as_str(), ""));
                match scheme.to_ascii_lowercase().as_str() {
                    "http" | "https" => self.fetch(url)?,
                    "file" => self.load_path(Path::new(rest))?,
                    other => {
                        return Err(ImageLoadError::UnsupportedSource(format!("{other} URLs")))
                    }
                }
            }
        };

        let loaded = LoadedImage::new(source.clone(), pixels);
        if loaded.dimensions.width == 0 || loaded.dimensions.height == 0 {
            return Err(ImageLoadError::Empty);
        }
        Ok(loaded)
    }
}
