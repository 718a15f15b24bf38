//! Merging the two layers into one image and handing it to a download target.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::config::DEFAULT_FILENAME;
use crate::error::{SketchError, SketchResult};
use crate::surface::{PixelSurface, blend_over};

/// Shown before exporting a sketch nobody has touched since the last export
pub const CONFIRM_PROMPT: &str = "No changes detected. Do you still want to download?";

/// Image format of exported sketches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
        }
    }

    pub fn encode(&self, image: &RgbaImage) -> SketchResult<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, self.image_format())?;
        Ok(bytes.into_inner())
    }
}

/// An encoded image ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// Asks the user a yes/no question and blocks until answered
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Something that turns an artifact into a file the user can keep
pub trait Download {
    fn deliver(&mut self, artifact: &ExportArtifact) -> SketchResult<()>;
}

/// Keeps artifacts in memory
impl Download for Vec<ExportArtifact> {
    fn deliver(&mut self, artifact: &ExportArtifact) -> SketchResult<()> {
        self.push(artifact.clone());
        Ok(())
    }
}

/// Writes artifacts into a directory on disk
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileDownload {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileDownload {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where an artifact named `filename` ends up. Directory components are dropped.
    pub fn target_path(&self, filename: &str) -> SketchResult<std::path::PathBuf> {
        let name = std::path::Path::new(filename)
            .file_name()
            .ok_or_else(|| SketchError::Download(format!("not a file name: {filename:?}")))?;
        Ok(self.dir.join(name))
    }

    /// Like [`FileDownload::target_path`], but never an existing file: `sketch.png` becomes
    /// `sketch (1).png`, `sketch (2).png` and so on, the way browsers rename downloads.
    pub fn available_path(&self, filename: &str) -> SketchResult<std::path::PathBuf> {
        let path = self.target_path(filename)?;
        if !path.exists() {
            return Ok(path);
        }

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        (1..=MAX_RENAMES)
            .map(|n| self.dir.join(format!("{stem} ({n}){extension}")))
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| SketchError::Download(format!("no free name for {filename:?}")))
    }
}

/// Numbered variants tried before giving up on a name
#[cfg(not(target_arch = "wasm32"))]
const MAX_RENAMES: u32 = 9999;

#[cfg(not(target_arch = "wasm32"))]
impl Download for FileDownload {
    fn deliver(&mut self, artifact: &ExportArtifact) -> SketchResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.available_path(&artifact.filename)?;
        std::fs::write(&path, &artifact.bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(())
    }
}

/// Triggers a browser download through a temporary object URL
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct BrowserDownload;

#[cfg(target_arch = "wasm32")]
impl Download for BrowserDownload {
    fn deliver(&mut self, artifact: &ExportArtifact) -> SketchResult<()> {
        use eframe::wasm_bindgen::JsCast as _;

        let js_err = |err: eframe::wasm_bindgen::JsValue| SketchError::Download(format!("{err:?}"));

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| SketchError::Download("no document".to_owned()))?;

        let bytes = js_sys::Uint8Array::from(artifact.bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(artifact.format.mime_type());
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_err)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let anchor = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| SketchError::Download("<a> is not an anchor".to_owned()))?;
        anchor.set_href(&url);
        anchor.set_download(&artifact.filename);
        anchor.click();

        web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
        log::info!("Downloaded {} ({} bytes)", artifact.filename, artifact.bytes.len());
        Ok(())
    }
}

/// `name` trimmed, or `default` if empty, with the format's extension appended.
/// A blank `default` falls back to [`DEFAULT_FILENAME`].
pub fn export_filename(name: &str, default: &str, format: ExportFormat) -> String {
    let stem = [name.trim(), default.trim()]
        .into_iter()
        .find(|stem| !stem.is_empty())
        .unwrap_or(DEFAULT_FILENAME);
    format!("{}.{}", stem, format.extension())
}

/// Background first, drawing on top, at the drawing layer's size
pub fn compose(background: &PixelSurface, drawing: &PixelSurface) -> RgbaImage {
    let mut merged = RgbaImage::new(drawing.image().width(), drawing.image().height());
    draw_image(&mut merged, background.image());
    draw_image(&mut merged, drawing.image());
    merged
}

fn draw_image(target: &mut RgbaImage, source: &RgbaImage) {
    let width = target.width().min(source.width());
    let height = target.height().min(source.height());
    for y in 0..height {
        for x in 0..width {
            let dst = target.get_pixel_mut(x, y);
            dst.0 = blend_over(dst.0, source.get_pixel(x, y).0, 1.0);
        }
    }
}
