use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use path_abs::{PathAbs, PathInfo};
use tracing::debug;

use crate::{
    error::{InputKind, StillcastError},
    resolution::{self, Dimensions, ResolutionKey},
};

/// Suffix appended to the audio file stem when no output path is given.
pub const DERIVED_OUTPUT_SUFFIX: &str = "_video.mp4";

/// One still-image-plus-audio conversion, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub image_path:  PathBuf,
    pub audio_path:  PathBuf,
    pub output_path: Option<PathBuf>,
    /// Preset key name. Anything outside the preset table resolves to 1080p.
    pub resolution:  String,
}

/// A request whose inputs exist and whose paths are all absolute.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub image:      PathBuf,
    pub audio:      PathBuf,
    pub output:     PathBuf,
    pub resolution: String,
    pub dimensions: Dimensions,
}

impl InvocationRequest {
    #[inline]
    pub fn new(image_path: impl Into<PathBuf>, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path:  image_path.into(),
            audio_path:  audio_path.into(),
            output_path: None,
            resolution:  ResolutionKey::default().name().to_owned(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        resolution::lookup(&self.resolution)
    }

    /// Validates against the process working directory.
    #[inline]
    pub fn validate(&self) -> Result<ValidatedRequest, StillcastError> {
        let cwd = std::env::current_dir().map_err(StillcastError::CurrentDir)?;
        self.validate_in(&cwd)
    }

    /// Makes every path absolute relative to `cwd`, checks that the image and
    /// then the audio file exist, and derives the output path if needed.
    #[inline]
    pub fn validate_in(&self, cwd: &Path) -> Result<ValidatedRequest, StillcastError> {
        let image = absolutize(cwd, &self.image_path)?;
        let audio = absolutize(cwd, &self.audio_path)?;

        ensure_file(InputKind::Image, &image)?;
        ensure_file(InputKind::Audio, &audio)?;

        let output = match &self.output_path {
            Some(path) => absolutize(cwd, path)?,
            None => absolutize(cwd, &derive_output_name(&audio))?,
        };
        debug!(image = %image.display(), audio = %audio.display(), output = %output.display(), "validated request");

        Ok(ValidatedRequest {
            image,
            audio,
            output,
            resolution: self.resolution.clone(),
            dimensions: self.dimensions(),
        })
    }
}

/// `<audio stem>_video.mp4`, whatever the audio extension was.
#[inline]
pub fn derive_output_name(audio: &Path) -> PathBuf {
    let mut name = audio.file_stem().map_or_else(|| OsString::from("output"), ToOwned::to_owned);
    name.push(DERIVED_OUTPUT_SUFFIX);
    PathBuf::from(name)
}

fn absolutize(cwd: &Path, path: &Path) -> Result<PathBuf, StillcastError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    PathAbs::new(&joined)
        .map(|abs| abs.as_path().to_path_buf())
        .map_err(|source| StillcastError::InvalidPath {
            path: joined,
            source,
        })
}

fn ensure_file(kind: InputKind, path: &Path) -> Result<(), StillcastError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StillcastError::NotFound {
            kind,
            path: path.to_path_buf(),
        })
    }
}
