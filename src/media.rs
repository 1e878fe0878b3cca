use crate::error::SubburnError;

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// Burns `subtitles` into the `[start, start + duration)` slice of `video`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeJob {
    pub video: PathBuf,
    pub subtitles: PathBuf,
    pub fonts: PathBuf,
    pub start: u64,
    pub duration: u64,
    pub output: PathBuf,
}

/// The external transcoder.
pub trait MediaTool {
    /// Total length of the media file in whole seconds.
    fn probe_duration(&self, path: &Path) -> Result<u64>;

    fn composite(&self, job: &CompositeJob) -> Result<()>;
}

pub struct Ffmpeg {
    ffmpeg: String,
    ffprobe: String,
    style: String,
}

impl Ffmpeg {
    pub fn new(ffmpeg: &str, ffprobe: &str, style: &str) -> Self {
        Self {
            ffmpeg: ffmpeg.to_string(),
            ffprobe: ffprobe.to_string(),
            style: style.to_string(),
        }
    }

    fn filter(&self, job: &CompositeJob) -> String {
        format!(
            "subtitles={}:fontsdir={}:force_style='{}'",
            escape_filter_path(&job.subtitles),
            escape_filter_path(&job.fonts),
            self.style
        )
    }

    fn composite_command(&self, job: &CompositeJob) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(&job.video)
            .arg("-filter_complex")
            .arg(self.filter(job))
            .args(["-ss", &job.start.to_string(), "-t", &job.duration.to_string()])
            .arg(&job.output);
        cmd
    }
}

impl MediaTool for Ffmpeg {
    fn probe_duration(&self, path: &Path) -> Result<u64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .map_err(|e| SubburnError::ExternalTool {
                tool: self.ffprobe.clone(),
                message: e.to_string(),
            })
            .with_context(|| format!("Failed to run ffprobe for '{}'", path.display()))?;

        if !output.status.success() {
            return Err(SubburnError::ExternalTool {
                tool: self.ffprobe.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
            .with_context(|| format!("Failed to probe '{}'", path.display()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&stdout)
            .with_context(|| format!("Failed to read duration of '{}'", path.display()))
    }

    fn composite(&self, job: &CompositeJob) -> Result<()> {
        let mut cmd = self.composite_command(job);
        log::debug!("Running {:?}", cmd);
        let output = cmd.output().map_err(|e| SubburnError::ExternalTool {
            tool: self.ffmpeg.clone(),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(SubburnError::ExternalTool {
                tool: self.ffmpeg.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
            .with_context(|| format!("Failed to write '{}'", job.output.display()));
        }
        Ok(())
    }
}

fn parse_probe_output(stdout: &str) -> Result<u64, SubburnError> {
    let value = stdout.trim();
    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds.trunc() as u64),
        _ => Err(SubburnError::ExternalTool {
            tool: "ffprobe".to_string(),
            message: format!("unexpected duration '{}'", value),
        }),
    }
}

// Paths are escaped once for the filter option and once more for the
// filtergraph around it.
fn escape_filter_path(path: &Path) -> String {
    let path = path.to_string_lossy();
    let option = escape(&path, &['\\', '\'', ':']);
    escape(&option, &['\\', '\'', ',', ';', '[', ']'])
}

fn escape(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
