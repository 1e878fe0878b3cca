mod config;
mod error;
mod media;
mod offset;
mod parser;
mod pipeline;
mod script;
mod serialiser;
mod srt;
mod timeline;
mod timing;

use crate::config::{Config, Overrides};
use crate::media::Ffmpeg;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser as ClapParser;
use log::LevelFilter;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Burn a plain-text script as timed subtitles into a slice of a video")]
struct Cli {
    #[arg(value_name = "VIDEO", help = "The video to take a slice from.")]
    video: PathBuf,
    #[arg(
        value_name = "TEXT",
        help = "The script to turn into subtitles, one caption per line."
    )]
    text: PathBuf,
    #[arg(
        short,
        long,
        value_name = "SECS",
        help = "Where in the video to start. If not supplied, a random position is picked."
    )]
    start: Option<u64>,
    #[arg(
        short,
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Length of the slice. Defaults to the time the subtitles need."
    )]
    duration: Option<u64>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Read settings from this JSON file instead of subburn.json in the base directory."
    )]
    config: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Directory holding the table, fonts and output directories."
    )]
    base_dir: Option<PathBuf>,
    #[arg(long, value_name = "SECS", help = "Silence before and between captions.")]
    gap: Option<f64>,
    #[arg(long, value_name = "SECS", help = "Display time per character.")]
    weight: Option<f64>,
    #[arg(long, value_name = "SECS", help = "Shortest time a caption stays on screen.")]
    min_line: Option<f64>,
    #[arg(long, help = "Drop blank script lines instead of showing empty captions.")]
    skip_blank_lines: bool,
    #[arg(long, help = "Only write the subtitle file, do not render a video.")]
    srt_only: bool,
    #[arg(long, help = "Read the subtitle file back and verify it after writing.")]
    check: bool,
    #[arg(short, long, conflicts_with = "quiet", help = "Log more detail.")]
    verbose: bool,
    #[arg(short, long, help = "Only log warnings and errors.")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let overrides = Overrides {
        base_dir: cli.base_dir.clone(),
        gap_seconds: cli.gap,
        weight_seconds_per_char: cli.weight,
        min_line_seconds: cli.min_line,
        skip_blank_lines: cli.skip_blank_lines,
    };
    Config::resolve(cli.config.as_deref(), &overrides)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let time_start = Instant::now();
    let config = load_config(&cli)?;
    let media = Ffmpeg::new(&config.ffmpeg, &config.ffprobe, &config.style);
    let req = pipeline::Request {
        video: cli.video,
        text: cli.text,
        start: cli.start,
        duration: cli.duration,
        srt_only: cli.srt_only,
        check: cli.check,
    };
    let now = chrono::Utc::now().timestamp();

    let outcome = pipeline::run(&config, &req, &media, &mut rand::thread_rng(), now)?;

    log::debug!(
        "{} captions in '{}'",
        outcome.captions,
        outcome.subtitles.display()
    );
    if let Some(output) = &outcome.output {
        println!("Output: {}", output.display());
    }
    println!("Start: {} seconds", outcome.start);
    println!("Duration: {} seconds", outcome.duration);
    println!("Done in {} seconds", time_start.elapsed().as_secs());
    Ok(())
}
