//! Line sinks for engine output
//!
//! Report lines (diff results) and progress lines (per-file sync and import
//! actions) travel on separate channels; the CLI maps them to stdout and
//! stderr.

/// Receives engine output as it is produced.
pub trait Output {
    /// A report line, such as one diff record.
    fn report(&mut self, line: &str);

    /// A progress line, such as `wrote <path>`.
    fn progress(&mut self, line: &str);
}

/// Output that keeps every line, for tests and previews.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recorder {
    pub report: Vec<String>,
    pub progress: Vec<String>,
}

impl Output for Recorder {
    fn report(&mut self, line: &str) {
        self.report.push(line.to_string());
    }

    fn progress(&mut self, line: &str) {
        self.progress.push(line.to_string());
    }
}

/// Output that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Output for Discard {
    fn report(&mut self, _line: &str) {}

    fn progress(&mut self, _line: &str) {}
}
