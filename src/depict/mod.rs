//! Two-dimensional depiction of canonical structures.
//!
//! [`Renderer::render`] computes a deterministic 2D layout for a molecule,
//! draws its bonds and heteroatom discs onto a white RGB canvas, and saves
//! the result as a JPEG under the image directory. A failed depiction never
//! affects the rest of a compound's record; callers log it and move on.

mod error;
mod layout;
mod raster;

pub use error::Error;

use crate::export::safe_file_stem;
use crate::model::molecule::Molecule;
use crate::perceive::rings::RingInfo;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Writes one JPEG per compound into a fixed image directory.
#[derive(Debug, Clone)]
pub struct Renderer {
    image_dir: PathBuf,
    config: RenderConfig,
}

impl Renderer {
    pub fn new(image_dir: impl Into<PathBuf>, config: RenderConfig) -> Self {
        Self {
            image_dir: image_dir.into(),
            config,
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// `<image dir>/<safe identifier>.jpg`
    pub fn image_path(&self, identifier: &str) -> PathBuf {
        self.image_dir
            .join(format!("{}.jpg", safe_file_stem(identifier)))
    }

    /// Renders `molecule` and returns the path of the written JPEG.
    pub fn render(&self, molecule: &Molecule, identifier: &str) -> Result<PathBuf, Error> {
        let canvas = rasterize(molecule, &self.config)?;
        let path = self.image_path(identifier);
        save_jpeg(&canvas, &path, self.config.jpeg_quality)?;
        tracing::debug!(identifier, path = %path.display(), "rendered structure image");
        Ok(path)
    }
}

/// Lays out and draws `molecule` without touching the filesystem.
pub fn rasterize(molecule: &Molecule, config: &RenderConfig) -> Result<RgbImage, Error> {
    if molecule.is_empty() {
        return Err(Error::EmptyMolecule);
    }
    if config.width == 0 || config.height == 0 {
        return Err(Error::InvalidCanvas {
            width: config.width,
            height: config.height,
        });
    }

    let rings = RingInfo::new(molecule);
    let coords = layout::compute(molecule, &rings);
    Ok(raster::draw(molecule, &rings, &coords, config))
}

fn save_jpeg(canvas: &RgbImage, path: &Path, quality: u8) -> Result<(), Error> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100))
        .encode_image(canvas)
        .map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(io_error)
}
