use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Default bounding box for generated thumbnails (width, height)
pub const THUMBNAIL_MAX_SIZE: (u32, u32) = (300, 300);

/// Name of the thumbnail directory created next to each catalog directory
pub const THUMBNAIL_DIR_NAME: &str = "thumbnails";

/// Prefix added to the original filename
const THUMBNAIL_PREFIX: &str = "thumb_";

/// JPEG quality used when the thumbnail is written as JPEG
const JPEG_QUALITY: u8 = 85;

/// Why a thumbnail could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThumbnailError {
    #[error("source image not found: {0}")]
    SourceMissing(PathBuf),
    #[error("source path has no file name: {0}")]
    NoFileName(PathBuf),
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Result of asking for a thumbnail.
///
/// A fallback still carries a usable path (the original image), but the
/// caller can tell it apart from a real thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Ready(PathBuf),
    Fallback {
        original: PathBuf,
        reason: ThumbnailError,
    },
}

impl ThumbnailOutcome {
    /// The path to display: the thumbnail, or the original on fallback
    pub fn path(&self) -> &Path {
        match self {
            ThumbnailOutcome::Ready(path) => path,
            ThumbnailOutcome::Fallback { original, .. } => original,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ThumbnailOutcome::Ready(_))
    }
}

/// Where and how large thumbnails are generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSettings {
    pub max_size: (u32, u32),
    /// Alternate output directory; `None` means `<source dir>/thumbnails`
    pub output_dir: Option<PathBuf>,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            max_size: THUMBNAIL_MAX_SIZE,
            output_dir: None,
        }
    }
}

/// Get the thumbnail path for a source image (doesn't generate, just returns the expected path)
pub fn get_thumbnail_path(source: &Path, output_dir: Option<&Path>) -> Option<PathBuf> {
    let filename = source.file_name()?;
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(THUMBNAIL_DIR_NAME),
    };

    let mut name = std::ffi::OsString::from(THUMBNAIL_PREFIX);
    name.push(filename);
    Some(dir.join(name))
}

/// Make sure a thumbnail exists for `source` and return where it is.
///
/// Never fails: any error is logged and turned into a fallback pointing at
/// the original image.
pub fn ensure_thumbnail(source: &Path, settings: &ThumbnailSettings) -> ThumbnailOutcome {
    match try_ensure_thumbnail(source, settings) {
        Ok(path) => ThumbnailOutcome::Ready(path),
        Err(reason) => {
            warn!("⚠️  Thumbnail unavailable, using original: {}", reason);
            ThumbnailOutcome::Fallback {
                original: source.to_path_buf(),
                reason,
            }
        }
    }
}

fn try_ensure_thumbnail(
    source: &Path,
    settings: &ThumbnailSettings,
) -> Result<PathBuf, ThumbnailError> {
    if !source.is_file() {
        return Err(ThumbnailError::SourceMissing(source.to_path_buf()));
    }

    let thumbnail_path = get_thumbnail_path(source, settings.output_dir.as_deref())
        .ok_or_else(|| ThumbnailError::NoFileName(source.to_path_buf()))?;

    // Existing thumbnails are trusted as-is; there is no staleness check
    // against the source's modification time.
    if thumbnail_path.exists() {
        debug!("Thumbnail cache hit: {}", thumbnail_path.display());
        return Ok(thumbnail_path);
    }

    if let Some(parent) = thumbnail_path.parent() {
        fs::create_dir_all(parent).map_err(|e| ThumbnailError::Write {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    let img = open_image(source).map_err(|e| ThumbnailError::Decode {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let (max_width, max_height) = settings.max_size;
    let thumbnail = fit_within(img, max_width, max_height);

    save_thumbnail(&thumbnail, &thumbnail_path).map_err(|message| ThumbnailError::Write {
        path: thumbnail_path.clone(),
        message,
    })?;

    debug!("📸 Generated thumbnail: {}", thumbnail_path.display());
    Ok(thumbnail_path)
}

/// Decode by content rather than by extension, so a PNG saved as `.jpg`
/// still opens
fn open_image(source: &Path) -> image::ImageResult<DynamicImage> {
    ImageReader::open(source)?.with_guessed_format()?.decode()
}

/// Scale down to fit the bounding box, keeping aspect ratio. Never upscales.
fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() <= max_width && img.height() <= max_height {
        return img;
    }
    img.thumbnail(max_width.max(1), max_height.max(1))
}

/// Encode into a temporary file next to `path`, then rename it into place.
///
/// A failed encode drops the temporary file, so `path` either holds a
/// complete thumbnail or doesn't exist.
fn save_thumbnail(img: &DynamicImage, path: &Path) -> Result<(), String> {
    let format = ImageFormat::from_path(path).map_err(|e| e.to_string())?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| e.to_string())?;
    encode_into(img, format, staged.as_file_mut()).map_err(|e| e.to_string())?;
    staged.persist(path).map_err(|e| e.error.to_string())?;
    Ok(())
}

fn encode_into(
    img: &DynamicImage,
    format: ImageFormat,
    file: &mut File,
) -> image::ImageResult<()> {
    let mut writer = BufWriter::new(file);
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            // JPEG has no alpha channel
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
        }
        format => img.write_to(&mut writer, format)?,
    }
    writer.flush()?;
    Ok(())
}
