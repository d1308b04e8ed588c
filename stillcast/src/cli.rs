use std::path::PathBuf;

use clap::{builder::PossibleValuesParser, ArgAction, Parser};
use stillcast_core::{ResolutionKey, DEFAULT_FFMPEG};

#[derive(Parser, Debug)]
#[command(
    name = "stillcast",
    version,
    about = "Create an MP4 video from a still image and an audio track, scaled to a standard \
             resolution."
)]
pub struct StillcastCli {
    /// Path to the image file
    pub image: PathBuf,

    /// Path to the audio file
    pub audio: PathBuf,

    /// Output video filename. Defaults to `<audio name>_video.mp4` in the
    /// current directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Video resolution
    #[arg(
        short,
        long,
        default_value = "1080p",
        value_parser = PossibleValuesParser::new(ResolutionKey::names())
    )]
    pub resolution: String,

    /// ffmpeg executable to run
    #[arg(long, env = "STILLCAST_FFMPEG", default_value = DEFAULT_FFMPEG)]
    pub ffmpeg: String,

    /// Print the result as JSON once the video is written
    #[arg(long)]
    pub json: bool,

    /// Increase console log verbosity (-v info, -vv debug). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write a debug log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
