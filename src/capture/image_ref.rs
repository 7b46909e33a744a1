// src/capture/image_ref.rs
use anyhow::{anyhow, Result};
use image::ImageFormat;
use log::{info, warn};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Handle to a menu photo on local storage.
///
/// The upload always declares it as `menu.jpg` / `image/jpeg`, whatever the
/// file is called on disk. Serializes as its `uri()`, so paths that are not
/// valid UTF-8 still hand off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    pub const MIME_TYPE: &'static str = "image/jpeg";
    pub const FILE_NAME: &'static str = "menu.jpg";

    /// Wrap a path without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The pick action: the path must be an existing file. The format is
    /// sniffed only to warn; nothing is converted.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(anyhow!("No image found at {}", path.display()));
        }

        let format = image::io::Reader::open(path)?
            .with_guessed_format()?
            .format();
        match format {
            Some(ImageFormat::Jpeg) => info!("Picked menu photo: {}", path.display()),
            Some(other) => warn!(
                "{} looks like {:?}; it will still be uploaded as {}",
                path.display(),
                other,
                Self::MIME_TYPE
            ),
            None => warn!(
                "Could not recognise the image format of {}; uploading as {} anyway",
                path.display(),
                Self::MIME_TYPE
            ),
        }

        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The uri handed to the results view.
    pub fn uri(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path.to_string_lossy())
    }
}
