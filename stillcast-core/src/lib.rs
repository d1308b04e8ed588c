//! Build and run the `ffmpeg` invocation that loops a still image over an
//! audio track, scaled and padded to a fixed resolution preset.

pub mod command;
pub mod error;
pub mod request;
pub mod resolution;
pub mod runner;
pub mod video;

pub use crate::{
    command::{EncodeCommand, EncodeSettings},
    error::{InputKind, StillcastError},
    request::{InvocationRequest, ValidatedRequest},
    resolution::{Dimensions, ResolutionKey},
    runner::{CapturedOutput, ProcessRunner, SystemRunner},
    video::{check_dependency, create_video, InvocationResult},
};

/// Executable used when no override is given.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";
