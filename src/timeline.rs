use crate::script::Line;
use crate::srt::{Caption, Timeline};
use crate::timing::TimingConfig;

use std::time::Duration;

/// Lays the lines out one after another, starting one gap after `start`.
pub fn build(config: &TimingConfig, lines: &[Line], start: Duration) -> Timeline {
    let gap = config.gap();
    let mut cursor = start + gap;
    let mut captions = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let duration = config.line_duration(line);
        captions.push(Caption {
            index: i + 1,
            start: cursor,
            end: cursor + duration,
            text: line.text().to_string(),
        });
        cursor += duration;
        if i + 1 < lines.len() {
            cursor += gap;
        }
    }
    captions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::split_lines;

    fn script() -> Vec<Line> {
        split_lines("Hello world\nSecond line\n\nA somewhat longer third line, for reading.\nok\n")
    }

    #[test]
    fn two_lines() {
        let cfg = TimingConfig {
            weight_seconds_per_char: 0.1,
            ..TimingConfig::default()
        };
        let timeline = build(&cfg, &split_lines("Hello world\nSecond line\n"), Duration::ZERO);
        assert_eq!(
            timeline,
            vec![
                Caption {
                    index: 1,
                    start: Duration::from_millis(500),
                    end: Duration::from_millis(1700),
                    text: "Hello world".to_string(),
                },
                Caption {
                    index: 2,
                    start: Duration::from_millis(2200),
                    end: Duration::from_millis(3400),
                    text: "Second line".to_string(),
                },
            ]
        );
    }

    #[test]
    fn empty_script() {
        assert!(build(&TimingConfig::default(), &[], Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn captions_are_gapped() {
        let cfg = TimingConfig::default();
        let timeline = build(&cfg, &script(), Duration::from_secs(3));
        assert_eq!(timeline[0].start, Duration::from_millis(3500));
        for (i, caption) in timeline.iter().enumerate() {
            assert_eq!(caption.index, i + 1);
            assert!(caption.end > caption.start);
        }
        for pair in timeline.windows(2) {
            assert!(pair[1].start >= pair[0].end + cfg.gap());
        }
    }

    #[test]
    fn shift_invariant() {
        let cfg = TimingConfig::default();
        let early = build(&cfg, &script(), Duration::from_secs(2));
        let late = build(&cfg, &script(), Duration::from_secs(75));
        let shift = Duration::from_secs(73);
        for (a, b) in early.iter().zip(late.iter()) {
            assert_eq!(a.start + shift, b.start);
            assert_eq!(a.end + shift, b.end);
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn ends_within_estimate() {
        let cfg = TimingConfig::default();
        let lines = script();
        let start = Duration::from_secs(12);
        let timeline = build(&cfg, &lines, start);
        let last = timeline.last().unwrap();
        assert_eq!(last.end - start, cfg.total_duration(&lines));
        assert!(last.end <= start + Duration::from_secs(cfg.estimate(&lines)));
    }

    #[test]
    fn blank_lines_become_empty_captions() {
        let timeline = build(&TimingConfig::default(), &script(), Duration::ZERO);
        assert_eq!(timeline[2].text, "");
        assert_eq!(timeline[2].end - timeline[2].start, Duration::from_secs(1));
    }
}
