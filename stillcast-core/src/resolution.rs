use std::{collections::BTreeMap, fmt, sync::LazyLock};

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Used whenever a resolution key is not in the preset table.
pub const FALLBACK_DIMENSIONS: Dimensions = Dimensions::new(1920, 1080);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width:  u32,
    pub height: u32,
}

impl Dimensions {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
        }
    }
}

/// Formats as `width:height`, the form ffmpeg's `scale` and `pad` filters take.
impl fmt::Display for Dimensions {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum ResolutionKey {
    #[strum(serialize = "480p")]
    P480,
    #[strum(serialize = "720p")]
    P720,
    #[default]
    #[strum(serialize = "1080p")]
    P1080,
}

impl ResolutionKey {
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Every key name, smallest preset first.
    #[inline]
    pub fn names() -> Vec<&'static str> {
        Self::iter().map(Self::name).collect()
    }

    #[inline]
    pub const fn dimensions(self) -> Dimensions {
        match self {
            ResolutionKey::P480 => Dimensions::new(854, 480),
            ResolutionKey::P720 => Dimensions::new(1280, 720),
            ResolutionKey::P1080 => Dimensions::new(1920, 1080),
        }
    }
}

static PRESETS: LazyLock<BTreeMap<&'static str, Dimensions>> =
    LazyLock::new(|| ResolutionKey::iter().map(|key| (key.name(), key.dimensions())).collect());

/// Looks up a preset by key name, falling back to 1920x1080 for anything
/// outside the table.
#[inline]
pub fn lookup(key: &str) -> Dimensions {
    PRESETS.get(key).copied().unwrap_or(FALLBACK_DIMENSIONS)
}
