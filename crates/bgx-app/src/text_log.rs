//! Text stream multiplexer.
//!
//! Merges locally typed messages and data received from the peripheral into
//! one append-only display log of attributed runs:
//!
//! - Local text always starts a new run, prefixed by a line break and `>`.
//! - Remote text starts a new run prefixed by a line break and `<` only when
//!   the previous append was not remote. Otherwise it continues the current
//!   remote run with no separator.
//!
//! Clearing empties the displayed runs but keeps the last source, so a remote
//! chunk right after a clear continues without a marker.

use bgx_core::{Origin, TextSource};

/// Marker starting a local run.
pub const LOCAL_MARKER: &str = "\n>";
/// Marker starting a remote run.
pub const REMOTE_MARKER: &str = "\n<";

/// A contiguous single-origin span of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRun {
    /// Producer of every chunk in this run. Selects the display style.
    pub origin: Origin,
    /// Run text, including its leading marker when it has one.
    pub text: String,
}

impl LogRun {
    /// Whether the run starts with its origin's marker.
    pub fn has_marker(&self) -> bool {
        let marker = match self.origin {
            Origin::Local => LOCAL_MARKER,
            Origin::Remote => REMOTE_MARKER,
        };
        self.text.starts_with(marker)
    }
}

/// Append-only attributed log.
#[derive(Debug, Clone, Default)]
pub struct TextLog {
    runs: Vec<LogRun>,
    last_source: TextSource,
}

impl TextLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of text from the given producer.
    pub fn append(&mut self, text: &str, origin: Origin) {
        match origin {
            Origin::Local => self.push_run(origin, LOCAL_MARKER, text),
            Origin::Remote if self.last_source == TextSource::Remote => {
                match self.runs.last_mut() {
                    Some(run) if run.origin == Origin::Remote => run.text.push_str(text),
                    // Cleared mid-stream: continue without a marker
                    _ => self.push_run(origin, "", text),
                }
            },
            Origin::Remote => self.push_run(origin, REMOTE_MARKER, text),
        }

        self.last_source = origin.into();
    }

    /// Clear the displayed runs. The last source is kept.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Runs in display order.
    pub fn runs(&self) -> &[LogRun] {
        &self.runs
    }

    /// Producer of the most recent append.
    pub fn last_source(&self) -> TextSource {
        self.last_source
    }

    /// Concatenated display text.
    pub fn contents(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push_run(&mut self, origin: Origin, marker: &str, text: &str) {
        let mut run_text = String::with_capacity(marker.len() + text.len());
        run_text.push_str(marker);
        run_text.push_str(text);
        self.runs.push(LogRun { origin, text: run_text });
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn markers(log: &TextLog) -> Vec<&str> {
        log.runs().iter().map(|run| &run.text[..2]).collect()
    }

    #[test]
    fn consecutive_remote_chunks_share_one_run() {
        let mut log = TextLog::new();
        log.append("x", Origin::Remote);
        log.append("y", Origin::Remote);

        assert_eq!(log.runs(), [LogRun { origin: Origin::Remote, text: "\n<xy".into() }]);
    }

    #[test]
    fn interleaved_sources_split_runs() {
        let mut log = TextLog::new();
        log.append("x", Origin::Remote);
        log.append("y", Origin::Local);
        log.append("z", Origin::Remote);

        assert_eq!(log.runs().len(), 3);
        assert_eq!(markers(&log), ["\n<", "\n>", "\n<"]);
        assert_eq!(log.contents(), "\n<x\n>y\n<z");
    }

    #[test]
    fn local_messages_are_always_prefixed() {
        let mut log = TextLog::new();
        log.append("AT", Origin::Local);
        log.append("AT", Origin::Local);

        assert_eq!(log.contents(), "\n>AT\n>AT");
        assert_eq!(log.last_source(), TextSource::Local);
    }

    #[test]
    fn clear_keeps_last_source() {
        let mut log = TextLog::new();
        log.append("boot", Origin::Remote);
        log.clear();

        assert!(log.is_empty());
        assert_eq!(log.last_source(), TextSource::Remote);

        log.append("ed", Origin::Remote);
        assert_eq!(log.contents(), "ed");
        assert!(!log.runs()[0].has_marker());
    }

    #[test]
    fn first_remote_chunk_is_prefixed() {
        let mut log = TextLog::new();
        assert_eq!(log.last_source(), TextSource::Unknown);

        log.append("hello", Origin::Remote);
        assert!(log.runs()[0].has_marker());
    }

    fn origin_strategy() -> impl Strategy<Value = Origin> {
        prop_oneof![Just(Origin::Local), Just(Origin::Remote)]
    }

    proptest! {
        #[test]
        fn contents_preserve_every_chunk(
            chunks in prop::collection::vec(("[a-z]{0,6}", origin_strategy()), 0..30),
        ) {
            let mut log = TextLog::new();
            let mut expected = String::new();
            let mut previous = TextSource::Unknown;

            for (text, origin) in &chunks {
                match origin {
                    Origin::Local => expected.push_str(LOCAL_MARKER),
                    Origin::Remote if previous != TextSource::Remote => {
                        expected.push_str(REMOTE_MARKER);
                    },
                    Origin::Remote => {},
                }
                expected.push_str(text);
                previous = (*origin).into();
                log.append(text, *origin);
            }

            prop_assert_eq!(log.contents(), expected);
        }

        #[test]
        fn remote_runs_never_adjacent(
            chunks in prop::collection::vec(("[a-z]{1,4}", origin_strategy()), 0..30),
        ) {
            let mut log = TextLog::new();
            for (text, origin) in &chunks {
                log.append(text, *origin);
            }

            for pair in log.runs().windows(2) {
                prop_assert!(!(pair[0].origin == Origin::Remote && pair[1].origin == Origin::Remote));
                prop_assert!(pair[1].has_marker());
            }
        }
    }
}
