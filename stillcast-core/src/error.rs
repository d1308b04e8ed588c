use std::{io, path::PathBuf};

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Which of the two required inputs a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum InputKind {
    #[strum(serialize = "Image")]
    Image,
    #[strum(serialize = "Audio")]
    Audio,
}

#[derive(Debug, Error)]
pub enum StillcastError {
    #[error("{kind} file not found: {}", .path.display())]
    NotFound { kind: InputKind, path: PathBuf },
    #[error("{program} is not installed or not in PATH: {reason}")]
    MissingDependency { program: String, reason: String },
    #[error(
        "{} exited with {}",
        .command.first().map_or("encoder", String::as_str),
        display_status(*.status)
    )]
    CommandFailed {
        status:  Option<i32>,
        stderr:  String,
        command: Vec<String>,
    },
    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source:  io::Error,
    },
    #[error("Cannot make {} absolute", .path.display())]
    InvalidPath {
        path:   PathBuf,
        #[source]
        source: path_abs::Error,
    },
    #[error("Failed to read the current working directory")]
    CurrentDir(#[source] io::Error),
}

impl StillcastError {
    /// Captured error stream of a failed encoder run.
    #[inline]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            StillcastError::CommandFailed {
                stderr, ..
            } => Some(stderr),
            _ => None,
        }
    }
}

fn display_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_owned(),
    }
}
