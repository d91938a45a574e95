use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Clockwise rotation the view applies so the artwork appears upright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Maps an EXIF orientation tag; mirrored orientations keep their rotation only.
    pub fn from_exif(orientation: u32) -> Self {
        match orientation {
            3 | 4 => Rotation::Deg180,
            5 | 6 => Rotation::Deg90,
            7 | 8 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Reads the EXIF orientation of `path`.
///
/// Files without usable EXIF data are treated as upright; only a file that
/// cannot be opened is an error.
pub fn read_rotation(path: &Path) -> Result<Rotation> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut buf) {
        Ok(exif) => exif,
        Err(err) => {
            debug!("no exif data in {}: {err}", path.display());
            return Ok(Rotation::Deg0);
        }
    };
    let orientation = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1);
    debug!("exif orientation {} for {}", orientation, path.display());
    Ok(Rotation::from_exif(orientation))
}

/// Runs [`read_rotation`] on the blocking pool; await the result from the UI task.
pub async fn read_rotation_blocking(path: PathBuf) -> Result<Rotation> {
    tokio::task::spawn_blocking(move || read_rotation(&path))
        .await
        .context("orientation task panicked")?
}
