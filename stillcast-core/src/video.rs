use std::{ffi::OsStr, path::PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::{
    command::{EncodeCommand, EncodeSettings},
    error::StillcastError,
    request::{InvocationRequest, ValidatedRequest},
    runner::ProcessRunner,
};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Outcome of one encoder run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationResult {
    pub output_path: PathBuf,
    pub succeeded:   bool,
    /// Set only when the output file was found on disk after a successful run.
    pub size_bytes:  Option<u64>,
    /// The encoder's captured error stream when the run failed.
    pub diagnostic:  Option<String>,
}

impl InvocationResult {
    /// Report for a failed encoder run. `None` when `error` did not come from
    /// the encoder itself (validation, preflight or spawn errors).
    #[inline]
    pub fn from_failure(output_path: PathBuf, error: &StillcastError) -> Option<Self> {
        let diagnostic = error.diagnostic()?;
        Some(Self {
            output_path,
            succeeded: false,
            size_bytes: None,
            diagnostic: Some(diagnostic.to_owned()),
        })
    }

    /// Size in binary megabytes (bytes / 1 048 576).
    #[inline]
    pub fn size_megabytes(&self) -> Option<f64> {
        self.size_bytes.map(|bytes| bytes as f64 / BYTES_PER_MEGABYTE)
    }
}

/// Confirms `program` can be started at all by asking it for its version.
#[inline]
#[instrument(skip(runner))]
pub fn check_dependency(runner: &impl ProcessRunner, program: &str) -> Result<(), StillcastError> {
    let missing = |reason: String| StillcastError::MissingDependency {
        program: program.to_owned(),
        reason,
    };

    let output = runner
        .run(OsStr::new(program), &["-version".to_owned()])
        .map_err(|e| missing(e.to_string()))?;
    if !output.success {
        return Err(missing(match output.code {
            Some(code) => format!("`{program} -version` exited with code {code}"),
            None => format!("`{program} -version` was terminated"),
        }));
    }

    debug!(version = output.stdout.lines().next().unwrap_or_default(), "found encoder");
    Ok(())
}

/// Validates `request`, then encodes the still image and audio into an MP4.
///
/// Nothing is spawned unless both inputs exist.
#[inline]
pub fn create_video(
    request: &InvocationRequest,
    program: &str,
    runner: &impl ProcessRunner,
) -> Result<InvocationResult, StillcastError> {
    let validated = request.validate()?;
    encode(&validated, program, runner)
}

/// Runs the encoder for an already validated request.
#[inline]
#[instrument(skip_all, fields(output = %request.output.display()))]
pub fn encode(
    request: &ValidatedRequest,
    program: &str,
    runner: &impl ProcessRunner,
) -> Result<InvocationResult, StillcastError> {
    let command = EncodeCommand::new(program, request, &EncodeSettings::default());
    debug!(command = %command, "running encoder");

    let output =
        runner.run(command.program(), command.args()).map_err(|source| StillcastError::Spawn {
            program: program.to_owned(),
            source,
        })?;

    if !output.success {
        error!(code = ?output.code, "encoder failed");
        return Err(StillcastError::CommandFailed {
            status:  output.code,
            stderr:  output.stderr,
            command: command.tokens(),
        });
    }

    // The file is only measured here; its presence never decides success.
    let size_bytes = std::fs::metadata(&request.output)
        .ok()
        .filter(std::fs::Metadata::is_file)
        .map(|metadata| metadata.len());
    info!(size_bytes, "encoder finished");

    Ok(InvocationResult {
        output_path: request.output.clone(),
        succeeded: true,
        size_bytes,
        diagnostic: None,
    })
}
