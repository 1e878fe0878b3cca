use std::time::Duration;

/// A single timed subtitle entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub(crate) index: usize,
    pub(crate) start: Duration,
    pub(crate) end: Duration,
    pub(crate) text: String,
}

/// All captions of one run, ordered by index and start time.
pub type Timeline = Vec<Caption>;
