//! Terminal output for `pterosync`
//!
//! Commands print through an [`OutputFormatter`]. The human formatter writes
//! one marked line per server or file outcome; the JSON formatter stays
//! silent except for the final document, so `--json` output is parseable.

use pterosync_sync::TargetStatus;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Result of one server, folder or file, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed,
    Skipped,
}

impl Outcome {
    fn marker(self) -> &'static str {
        match self {
            Outcome::Ok => "\u{2713}",
            Outcome::Failed => "\u{2717}",
            Outcome::Skipped => "-",
        }
    }
}

/// Formats CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    /// Section title above a list of outcomes
    fn heading(&self, title: &str);
    /// One line per server or file: marker, subject, detail
    fn outcome(&self, outcome: Outcome, subject: &str, detail: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output with outcome markers and indentation
pub struct HumanFormatter {
    /// Suppress informational lines and successful outcomes
    quiet: bool,
}

impl HumanFormatter {
    /// Renders an outcome line, or `None` when `quiet` hides it
    fn outcome_line(&self, outcome: Outcome, subject: &str, detail: &str) -> Option<String> {
        if self.quiet && outcome != Outcome::Failed {
            return None;
        }
        Some(if detail.is_empty() {
            format!("  {} {}", outcome.marker(), subject)
        } else {
            format!("  {} {}: {}", outcome.marker(), subject, detail)
        })
    }
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
    fn heading(&self, title: &str) {
        if !self.quiet {
            println!();
            println!("{title}");
        }
    }
    fn outcome(&self, outcome: Outcome, subject: &str, detail: &str) {
        if let Some(line) = self.outcome_line(outcome, subject, detail) {
            println!("{line}");
        }
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// JSON output formatter
///
/// Only messages that end a command and the final document are printed.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn heading(&self, _title: &str) {}
    fn outcome(&self, _outcome: Outcome, _subject: &str, _detail: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(json: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter { quiet })
    }
}

/// Maps a server's final state onto an outcome and its detail text
pub fn target_outcome(status: &TargetStatus) -> (Outcome, String) {
    match status {
        TargetStatus::Completed => (Outcome::Ok, String::new()),
        TargetStatus::FolderCreationFailed { directory, error } => (
            Outcome::Failed,
            format!("could not create {directory}: {error}"),
        ),
        TargetStatus::Cancelled => (Outcome::Skipped, "cancelled".to_string()),
    }
}

/// `"1 file"`, `"2 files"`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Milliseconds as `850ms` or `1.2s`
pub fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}
