use std::{
    ffi::OsStr,
    fmt::{self, Write},
    path::Path,
};

use crate::{request::ValidatedRequest, resolution::Dimensions};

/// Codec and quality knobs passed to ffmpeg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub video_codec:   String,
    pub preset:        String,
    pub pixel_format:  String,
    pub audio_codec:   String,
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    #[inline]
    fn default() -> Self {
        Self {
            video_codec:   "libx264".to_owned(),
            preset:        "medium".to_owned(),
            pixel_format:  "yuv420p".to_owned(),
            audio_codec:   "aac".to_owned(),
            audio_bitrate: "192k".to_owned(),
        }
    }
}

/// Scales to fit inside `dimensions` (never larger, aspect ratio kept), then
/// pads to exactly `dimensions` with the picture centered.
#[inline]
pub fn scale_pad_filter(dimensions: Dimensions) -> String {
    let mut filter = String::with_capacity(80);
    // Writing into a String cannot fail.
    let _ = write!(
        &mut filter,
        "scale={dimensions}:force_original_aspect_ratio=decrease,pad={dimensions}:(ow-iw)/2:(oh-ih)/2"
    );
    filter
}

/// A complete ffmpeg invocation: executable plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeCommand {
    program: String,
    args:    Vec<String>,
}

impl EncodeCommand {
    #[inline]
    pub fn new(program: &str, request: &ValidatedRequest, settings: &EncodeSettings) -> Self {
        let mut args: Vec<String> = Vec::with_capacity(26);
        // Repeat the single image as a video stream; -shortest cuts it at the audio's end.
        args.extend(["-loop".to_owned(), "1".to_owned(), "-i".to_owned(), lossy(&request.image)]);
        args.extend(["-i".to_owned(), lossy(&request.audio)]);
        args.extend(["-vf".to_owned(), scale_pad_filter(request.dimensions)]);
        args.extend(["-c:v".to_owned(), settings.video_codec.clone()]);
        args.extend(["-preset".to_owned(), settings.preset.clone()]);
        args.extend(["-pix_fmt".to_owned(), settings.pixel_format.clone()]);
        args.extend(["-c:a".to_owned(), settings.audio_codec.clone()]);
        args.extend(["-b:a".to_owned(), settings.audio_bitrate.clone()]);
        args.push("-shortest".to_owned());
        args.extend(["-movflags".to_owned(), "+faststart".to_owned()]);
        args.push("-y".to_owned());
        args.push(lossy(&request.output));

        Self {
            program: program.to_owned(),
            args,
        }
    }

    #[inline]
    pub fn program(&self) -> &OsStr {
        OsStr::new(&self.program)
    }

    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by every argument, exactly as executed.
    #[inline]
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(self.program.clone()).chain(self.args.iter().cloned()).collect()
    }

    /// The filter argument following `-vf`.
    #[inline]
    pub fn filter(&self) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == "-vf")
            .and_then(|index| self.args.get(index + 1))
            .map(String::as_str)
    }

    /// Shell-quoted form that can be pasted into a terminal.
    #[inline]
    pub fn to_shell_string(&self) -> String {
        join_for_shell(&self.tokens())
    }
}

impl fmt::Display for EncodeCommand {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Quotes each token for a POSIX shell. Tokens shlex refuses (interior NUL)
/// are printed as-is.
#[inline]
pub fn join_for_shell(tokens: &[String]) -> String {
    shlex::try_join(tokens.iter().map(String::as_str)).unwrap_or_else(|_| tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::resolution::{lookup, ResolutionKey};

    fn request(resolution: &str) -> ValidatedRequest {
        ValidatedRequest {
            image:      PathBuf::from("/media/cover art.png"),
            audio:      PathBuf::from("/media/track.mp3"),
            output:     PathBuf::from("/out/track_video.mp4"),
            resolution: resolution.to_owned(),
            dimensions: lookup(resolution),
        }
    }

    #[test]
    fn tokens_have_fixed_order() {
        let command = EncodeCommand::new("ffmpeg", &request("1080p"), &EncodeSettings::default());

        assert_eq!(command.tokens(), [
            "ffmpeg",
            "-loop",
            "1",
            "-i",
            "/media/cover art.png",
            "-i",
            "/media/track.mp3",
            "-vf",
            "scale=1920:1080:force_original_aspect_ratio=decrease,pad=1920:1080:(ow-iw)/2:(oh-ih)/2",
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-b:a",
            "192k",
            "-shortest",
            "-movflags",
            "+faststart",
            "-y",
            "/out/track_video.mp4",
        ]);
    }

    #[test]
    fn filter_uses_exactly_the_preset_pair() {
        for key in ResolutionKey::names() {
            let command = EncodeCommand::new("ffmpeg", &request(key), &EncodeSettings::default());
            let filter = command.filter().unwrap();
            let pair = lookup(key).to_string();

            assert_eq!(filter.matches(&pair).count(), 2, "{key}: {filter}");
            for other in ResolutionKey::names().into_iter().filter(|other| *other != key) {
                assert!(!filter.contains(&lookup(other).to_string()), "{key}: {filter}");
            }
        }
    }

    #[test]
    fn unknown_key_builds_1080p_filter() {
        let command = EncodeCommand::new("ffmpeg", &request("huge"), &EncodeSettings::default());
        assert!(command.filter().unwrap().starts_with("scale=1920:1080:"));
    }

    #[test]
    fn shell_string_quotes_paths_with_spaces() {
        let command = EncodeCommand::new("ffmpeg", &request("480p"), &EncodeSettings::default());
        let shell = command.to_shell_string();

        assert!(shell.starts_with("ffmpeg -loop 1 -i "));
        assert_eq!(command.to_string(), shell);
        assert_eq!(shlex::split(&shell).unwrap(), command.tokens());
    }
}
