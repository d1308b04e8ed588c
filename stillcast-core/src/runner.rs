use std::{
    ffi::OsStr,
    io,
    process::{Command, Output, Stdio},
};

use tracing::trace;

/// Exit status and both streams of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code:    Option<i32>,
    pub stdout:  String,
    pub stderr:  String,
}

impl CapturedOutput {
    #[inline]
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Self::default()
        }
    }

    #[inline]
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl From<Output> for CapturedOutput {
    #[inline]
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code:    output.status.code(),
            stdout:  String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr:  String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs an external program to completion and hands back everything it wrote.
pub trait ProcessRunner {
    /// Blocks until the program exits. An `Err` means it could not be started
    /// at all; a nonzero exit is reported through [`CapturedOutput`].
    fn run(&self, program: &OsStr, args: &[String]) -> io::Result<CapturedOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    #[inline]
    fn run(&self, program: &OsStr, args: &[String]) -> io::Result<CapturedOutput> {
        (**self).run(program, args)
    }
}

/// Spawns real processes, resolving the program through `PATH` first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    #[inline]
    fn run(&self, program: &OsStr, args: &[String]) -> io::Result<CapturedOutput> {
        let executable = which::which(program).map_err(|e| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: {e}", program.to_string_lossy()),
            )
        })?;
        trace!(executable = %executable.display(), ?args, "spawning");

        // output() drains and closes both pipes whether or not the process succeeds.
        let output = Command::new(&executable)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(output.into())
    }
}
