use crate::error::SubburnError;
use crate::script::Line;

use std::time::Duration;

use serde::Deserialize;

/// Tuning constants shared by the estimator and the timeline builder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Silence before the first caption and between consecutive captions.
    pub gap_seconds: f64,
    /// Display time per character. Higher means longer captions.
    pub weight_seconds_per_char: f64,
    /// Shortest time any caption stays on screen.
    pub min_line_seconds: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            gap_seconds: 0.5,
            weight_seconds_per_char: 0.088,
            min_line_seconds: 1.0,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<(), SubburnError> {
        let check = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(SubburnError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )))
            }
        };
        check("gap_seconds", self.gap_seconds)?;
        check("weight_seconds_per_char", self.weight_seconds_per_char)?;
        check("min_line_seconds", self.min_line_seconds)?;
        if self.min_line_seconds < 0.001 {
            return Err(SubburnError::InvalidConfig(
                "min_line_seconds must be at least one millisecond".to_string(),
            ));
        }
        Ok(())
    }

    pub fn gap(&self) -> Duration {
        to_millis(self.gap_seconds)
    }

    /// How long a line stays on screen: its weighted length, but never less
    /// than the floor.
    pub fn line_duration(&self, line: &Line) -> Duration {
        let weighted = line.char_len() as f64 * self.weight_seconds_per_char;
        to_millis(weighted.max(self.min_line_seconds))
    }

    /// Time from the start offset to the end of the last caption.
    pub fn total_duration(&self, lines: &[Line]) -> Duration {
        let gap = self.gap();
        let mut total = gap;
        for (i, line) in lines.iter().enumerate() {
            total += self.line_duration(line);
            if i + 1 < lines.len() {
                total += gap;
            }
        }
        total
    }

    /// Whole seconds needed to show every line, rounded up.
    ///
    /// The unrounded sum is used, so weights finer than a millisecond per
    /// character still push the estimate up. The result also covers the
    /// millisecond-rounded span the timeline builder lays out.
    pub fn estimate(&self, lines: &[Line]) -> u64 {
        let mut seconds = self.gap_seconds;
        for (i, line) in lines.iter().enumerate() {
            let weighted = line.char_len() as f64 * self.weight_seconds_per_char;
            seconds += weighted.max(self.min_line_seconds);
            if i + 1 < lines.len() {
                seconds += self.gap_seconds;
            }
        }
        let total = self.total_duration(lines);
        let rounded = if total.subsec_nanos() > 0 {
            total.as_secs() + 1
        } else {
            total.as_secs()
        };
        rounded.max(seconds.ceil() as u64)
    }
}

// Captions are timed at millisecond resolution, so every offset lands
// exactly on a value the serialiser can represent.
fn to_millis(seconds: f64) -> Duration {
    Duration::from_millis((seconds * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::split_lines;

    fn weighted(weight: f64) -> TimingConfig {
        TimingConfig {
            weight_seconds_per_char: weight,
            ..TimingConfig::default()
        }
    }

    #[test]
    fn empty_script_is_just_the_gap() {
        assert_eq!(TimingConfig::default().estimate(&[]), 1);
        let cfg = TimingConfig {
            gap_seconds: 2.0,
            ..TimingConfig::default()
        };
        assert_eq!(cfg.estimate(&[]), 2);
    }

    #[test]
    fn two_lines() {
        let lines = split_lines("Hello world\nSecond line\n");
        let cfg = weighted(0.1);
        assert_eq!(cfg.line_duration(&lines[0]), Duration::from_millis(1200));
        assert_eq!(cfg.total_duration(&lines), Duration::from_millis(3400));
        assert_eq!(cfg.estimate(&lines), 4);
    }

    #[test]
    fn short_lines_get_the_floor() {
        let cfg = weighted(0.1);
        assert_eq!(cfg.line_duration(&Line::new("\n")), Duration::from_secs(1));
        assert_eq!(cfg.line_duration(&Line::new("")), Duration::from_secs(1));
        assert_eq!(cfg.line_duration(&Line::new("hi\n")), Duration::from_secs(1));
    }

    #[test]
    fn blank_line_is_visible() {
        let lines = vec![Line::new("\n")];
        assert_eq!(weighted(0.1).estimate(&lines), 2);
    }

    #[test]
    fn exact_seconds_are_not_rounded_up() {
        let cfg = TimingConfig {
            gap_seconds: 1.0,
            weight_seconds_per_char: 0.5,
            min_line_seconds: 1.0,
        };
        let lines = split_lines("abc\n");
        assert_eq!(cfg.estimate(&lines), 3);
    }

    #[test]
    fn sub_millisecond_weights_round_up() {
        let lines = vec![Line::new(format!("{}\n", "a".repeat(37)))];
        let cfg = weighted(0.0658);
        assert_eq!(cfg.total_duration(&lines), Duration::from_millis(3000));
        assert_eq!(cfg.estimate(&lines), 4);
    }

    #[test]
    fn monotonic_in_line_count() {
        let cfg = TimingConfig::default();
        let lines = split_lines("a\nsome longer line here\n\nx\nfinal words of the script\n");
        let mut previous = cfg.estimate(&[]);
        for n in 1..=lines.len() {
            let estimate = cfg.estimate(&lines[..n]);
            assert!(estimate >= previous);
            previous = estimate;
        }
    }

    #[test]
    fn rejects_bad_values() {
        assert!(TimingConfig::default().validate().is_ok());
        assert!(weighted(-0.1).validate().is_err());
        assert!(weighted(f64::NAN).validate().is_err());
        let zero_floor = TimingConfig {
            min_line_seconds: 0.0,
            ..TimingConfig::default()
        };
        assert!(zero_floor.validate().is_err());
    }
}
