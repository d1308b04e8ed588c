use std::{
    io::{self, Write},
    panic,
    process::{self, ExitCode},
};

use anyhow::{Context, Result};
use clap::Parser;
use stillcast_core::{check_dependency, video::encode, InvocationRequest, InvocationResult, SystemRunner};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    cli::StillcastCli,
    logging::{console_level, init_logging},
};

mod cli;
mod logging;
mod report;

fn main() -> ExitCode {
    let orig_hook = panic::take_hook();
    // A panic anywhere is a failed run
    panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        process::exit(1);
    }));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = report::write_failure(&mut io::stderr().lock(), &error);
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<()> {
    let cli = StillcastCli::parse();
    let _log_guard =
        init_logging(console_level(cli.verbose), cli.log_file.as_deref(), LevelFilter::DEBUG)?;
    debug!(?cli, "parsed arguments");

    let runner = SystemRunner;
    // Fails before any input is looked at, so a missing encoder is never
    // mistaken for a bad input.
    check_dependency(&runner, &cli.ffmpeg)?;

    let mut request = InvocationRequest::new(cli.image, cli.audio).with_resolution(cli.resolution);
    request.output_path = cli.output;
    let validated = request.validate()?;

    let mut stdout = io::stdout().lock();
    // With --json, stdout carries nothing but the result document.
    if !cli.json {
        report::write_plan(&mut stdout, &validated)?;
        stdout.flush()?;
    }

    let result = match encode(&validated, &cli.ffmpeg, &runner) {
        Ok(result) => result,
        Err(error) => {
            if cli.json {
                if let Some(failed) = InvocationResult::from_failure(validated.output, &error) {
                    write_json(&mut stdout, &failed)?;
                }
            }
            return Err(error.into());
        },
    };

    if cli.json {
        write_json(&mut stdout, &result)
    } else {
        report::write_success(&mut stdout, &result)?;
        Ok(())
    }
}

fn write_json(out: &mut impl Write, result: &InvocationResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
    writeln!(out, "{json}")?;
    Ok(())
}
