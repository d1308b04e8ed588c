use std::io::{self, Write};

use stillcast_core::{command::join_for_shell, InvocationResult, StillcastError, ValidatedRequest};

const RULE_WIDTH: usize = 60;

pub fn write_plan(out: &mut impl Write, request: &ValidatedRequest) -> io::Result<()> {
    writeln!(out, "Creating video: {}", request.output.display())?;
    writeln!(out, "Image: {}", request.image.display())?;
    writeln!(out, "Audio: {}", request.audio.display())?;
    writeln!(out, "Resolution: {} ({})", request.resolution, request.dimensions)?;
    writeln!(out, "\nProcessing...")
}

pub fn write_success(out: &mut impl Write, result: &InvocationResult) -> io::Result<()> {
    writeln!(out, "\n✓ Video created successfully: {}", result.output_path.display())?;
    if let Some(size) = result.size_megabytes() {
        writeln!(out, "  File size: {:.2} MB", size)?;
    }
    Ok(())
}

/// Human-readable description of a failed run, written to stderr by the caller.
pub fn write_failure(err: &mut impl Write, error: &anyhow::Error) -> io::Result<()> {
    match error.downcast_ref::<StillcastError>() {
        Some(StillcastError::MissingDependency {
            program,
            reason,
        }) => {
            writeln!(err, "Error: {program} is not installed or not in PATH")?;
            writeln!(err, "  {reason}")
        },
        Some(StillcastError::CommandFailed {
            stderr,
            command,
            ..
        }) => {
            let rule = "=".repeat(RULE_WIDTH);
            writeln!(err, "\n✗ Error creating video")?;
            writeln!(err, "\nffmpeg error output:")?;
            writeln!(err, "{rule}")?;
            writeln!(err, "{stderr}")?;
            writeln!(err, "{rule}")?;
            writeln!(err, "\nCommand:")?;
            writeln!(err, "{}", join_for_shell(command))?;
            writeln!(err, "\nError: {error}")
        },
        _ => writeln!(err, "\nError: {error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use anyhow::Context;
    use stillcast_core::{resolution::lookup, InputKind};

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn plan_lists_paths_and_resolution() {
        let request = ValidatedRequest {
            image:      PathBuf::from("/in/cover.png"),
            audio:      PathBuf::from("/in/song.mp3"),
            output:     PathBuf::from("/out/song_video.mp4"),
            resolution: "720p".to_owned(),
            dimensions: lookup("720p"),
        };

        let text = render(|out| write_plan(out, &request));

        assert_eq!(
            text,
            "Creating video: /out/song_video.mp4\nImage: /in/cover.png\nAudio: /in/song.mp3\n\
             Resolution: 720p (1280:720)\n\nProcessing...\n"
        );
    }

    #[test]
    fn success_shows_size_with_two_decimals() {
        let result = InvocationResult {
            output_path: PathBuf::from("/out/song_video.mp4"),
            succeeded:   true,
            size_bytes:  Some(2_097_152),
            diagnostic:  None,
        };

        let text = render(|out| write_success(out, &result));

        assert!(text.contains("✓ Video created successfully: /out/song_video.mp4"));
        assert!(text.ends_with("  File size: 2.00 MB\n"));
    }

    #[test]
    fn success_without_size_omits_size_line() {
        let result = InvocationResult {
            output_path: PathBuf::from("/out/song_video.mp4"),
            succeeded:   true,
            size_bytes:  None,
            diagnostic:  None,
        };

        assert!(!render(|out| write_success(out, &result)).contains("File size"));
    }

    #[test]
    fn command_failure_shows_diagnostic_and_command() {
        let error = StillcastError::CommandFailed {
            status:  Some(1),
            stderr:  "X\n".to_owned(),
            command: vec!["ffmpeg".to_owned(), "-i".to_owned(), "my song.mp3".to_owned()],
        };

        let text = render(|out| write_failure(out, &error.into()));
        let rule = "=".repeat(RULE_WIDTH);

        assert!(text.contains(&format!("{rule}\nX\n\n{rule}\n")));
        assert!(text.contains("Command:\nffmpeg -i "));
        assert!(text.contains("my song.mp3"));
        assert!(text.ends_with("Error: ffmpeg exited with exit code 1\n"));
    }

    #[test]
    fn missing_dependency_is_reported_distinctly() {
        let error = StillcastError::MissingDependency {
            program: "ffmpeg".to_owned(),
            reason:  "ffmpeg: cannot find binary path".to_owned(),
        };

        let text = render(|out| write_failure(out, &error.into()));

        assert!(text.starts_with("Error: ffmpeg is not installed or not in PATH\n"));
        assert!(!text.contains("Error creating video"));
    }

    #[test]
    fn not_found_names_the_missing_file() {
        let error = StillcastError::NotFound {
            kind: InputKind::Image,
            path: PathBuf::from("/in/missing.png"),
        };

        assert_eq!(
            render(|out| write_failure(out, &error.into())),
            "\nError: Image file not found: /in/missing.png\n"
        );
    }

    #[test]
    fn encoder_output_is_printed_verbatim() {
        let stderr = "  frame=  1 fps=0.0  \n\tInvalid data found\n\n";
        let error = StillcastError::CommandFailed {
            status:  Some(1),
            stderr:  stderr.to_owned(),
            command: vec!["ffmpeg".to_owned()],
        };

        let text = render(|out| write_failure(out, &error.into()));
        let rule = "=".repeat(RULE_WIDTH);

        assert!(text.contains(&format!("{rule}\n{stderr}\n{rule}\n")), "{text}");
    }

    #[test]
    fn other_errors_list_every_cause() {
        let spawn = anyhow::Error::from(StillcastError::Spawn {
            program: "ffmpeg".to_owned(),
            source:  io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        });
        assert_eq!(
            render(|out| write_failure(out, &spawn)),
            "\nError: Failed to run ffmpeg: access denied\n"
        );

        let setup = Err::<(), _>(io::Error::other("disk full"))
            .context("Failed to open log file")
            .unwrap_err();
        assert_eq!(
            render(|out| write_failure(out, &setup)),
            "\nError: Failed to open log file: disk full\n"
        );
    }
}
