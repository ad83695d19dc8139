//! Console output: report lines on stdout, progress on stderr

use bb_core::Output;
use colored::Colorize;

/// Prints report lines to stdout with a colored marker and progress lines
/// to stderr.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn report(&mut self, line: &str) {
        println!("{}", colorize_marker(line));
    }

    fn progress(&mut self, line: &str) {
        eprintln!("{line}");
    }
}

/// Color the leading diff marker of a report line.
pub fn colorize_marker(line: &str) -> String {
    let Some((marker, rest)) = line.split_at_checked(1) else {
        return line.to_string();
    };
    let marker = match marker {
        "~" => marker.yellow(),
        "+" => marker.green(),
        "-" => marker.red(),
        "?" => marker.cyan(),
        _ => return line.to_string(),
    };
    format!("{marker}{rest}")
}
