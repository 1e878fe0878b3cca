use crate::srt::Caption;

use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Writes the captions to `output`. The file is replaced atomically, so it is
/// either fully written or left untouched.
pub fn serialise<P: AsRef<Path>>(subs: &[Caption], output: P) -> Result<()> {
    let output = output.as_ref();
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: '{}'", dir.display()))?;

    let tmp = NamedTempFile::new_in(dir).context("Failed to create file!")?;
    let mut writer = BufWriter::new(tmp);
    write_subs(&mut writer, subs).context("Failed to write to output file.")?;
    let tmp = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to write to output file.")?;
    tmp.persist(output)
        .with_context(|| format!("Failed to save subtitles to '{}'", output.display()))?;
    Ok(())
}

#[cfg(test)]
pub fn to_string(subs: &[Caption]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_subs(&mut buf, subs);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_subs<W: Write>(buf: &mut W, subs: &[Caption]) -> Result<()> {
    for (i, sub) in subs.iter().enumerate() {
        if i > 0 {
            writeln!(buf)?;
        }
        write_sub(buf, sub)?;
    }
    Ok(())
}

fn write_sub<W: Write>(buf: &mut W, sub: &Caption) -> Result<()> {
    writeln!(buf, "{}", sub.index)?;
    write_ts(buf, sub.start)?;
    write!(buf, " --> ")?;
    write_ts(buf, sub.end)?;
    writeln!(buf)?;
    writeln!(buf, "{}", sub.text)?;
    Ok(())
}

fn write_ts<W: Write>(buf: &mut W, timestamp: Duration) -> Result<()> {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.subsec_millis();
    write!(
        buf,
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, seconds, millis
    )?;
    Ok(())
}
