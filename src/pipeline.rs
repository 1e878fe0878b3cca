use crate::config::Config;
use crate::error::SubburnError;
use crate::media::{CompositeJob, MediaTool};
use crate::srt::Timeline;
use crate::{offset, parser, script, serialiser, timeline};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub video: PathBuf,
    pub text: PathBuf,
    pub start: Option<u64>,
    pub duration: Option<u64>,
    /// Write the subtitle file only, without compositing.
    pub srt_only: bool,
    /// Re-read the written subtitle file and compare it to the timeline.
    pub check: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub start: u64,
    pub duration: u64,
    pub captions: usize,
    pub subtitles: PathBuf,
    pub output: Option<PathBuf>,
}

pub fn run<M, R>(config: &Config, req: &Request, media: &M, rng: &mut R, now: i64) -> Result<Outcome>
where
    M: MediaTool + ?Sized,
    R: Rng + ?Sized,
{
    ensure_exists("video", &req.video)?;
    ensure_exists("text", &req.text)?;
    config.validate()?;

    let lines = script::load(&req.text, config.keep_blank_lines)?;
    let estimated = config.timing.estimate(&lines);
    let duration = match req.duration {
        Some(duration) if duration < estimated => {
            log::warn!(
                "Requested duration of {} seconds is shorter than the {} seconds the subtitles need; the last captions will be cut",
                duration,
                estimated
            );
            duration
        }
        Some(duration) => duration,
        None => estimated,
    };

    let start = match req.start {
        Some(start) if req.srt_only => {
            // Without a probe nothing else bounds the start, so the last
            // caption's end must still fit in a Duration.
            let span = config.timing.total_duration(&lines);
            if Duration::from_secs(start).checked_add(span).is_none() {
                return Err(SubburnError::StartOutOfRange {
                    start,
                    duration,
                    available: u64::MAX,
                }
                .into());
            }
            start
        }
        _ => {
            let available = media.probe_duration(&req.video)?;
            log::debug!("'{}' is {} seconds long", req.video.display(), available);
            offset::resolve(rng, req.start, duration, available)?
        }
    };
    log::info!("Start: {} seconds, duration: {} seconds", start, duration);

    let timeline = timeline::build(&config.timing, &lines, Duration::from_secs(start));
    let subtitles = config.subtitle_path();
    serialiser::serialise(&timeline, &subtitles)?;
    log::info!(
        "Wrote {} captions to '{}'",
        timeline.len(),
        subtitles.display()
    );

    if req.check {
        check_written(&subtitles, &timeline)?;
    }

    let output = if req.srt_only {
        None
    } else {
        let dir = config.output_path();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: '{}'", dir.display()))?;
        let output = dir.join(output_name(&req.video, now));
        media.composite(&CompositeJob {
            video: req.video.clone(),
            subtitles: subtitles.clone(),
            fonts: config.fonts_path(),
            start,
            duration,
            output: output.clone(),
        })?;
        log::info!("Wrote '{}'", output.display());
        Some(output)
    };

    Ok(Outcome {
        start,
        duration,
        captions: timeline.len(),
        subtitles,
        output,
    })
}

fn ensure_exists(kind: &'static str, path: &Path) -> Result<(), SubburnError> {
    if path.exists() {
        Ok(())
    } else {
        Err(SubburnError::InvalidInput {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn check_written(path: &Path, expected: &Timeline) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read back '{}'", path.display()))?;
    let parsed = parser::parse(&data)?;
    if &parsed != expected {
        return Err(SubburnError::Parse(format!(
            "'{}' does not match the generated timeline",
            path.display()
        ))
        .into());
    }
    log::debug!("Verified '{}'", path.display());
    Ok(())
}

/// `<first 10 alphanumerics of the stem>_<unix seconds><ext>`.
pub fn output_name(video: &Path, now: i64) -> String {
    let stem: String = video
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(10)
        .collect();
    let stem = if stem.is_empty() { "output".to_string() } else { stem };
    match video.extension() {
        Some(ext) => format!("{}_{}.{}", stem, now, ext.to_string_lossy()),
        None => format!("{}_{}", stem, now),
    }
}
