//! Leveled console output with an optional append-only log file.
//!
//! Console lines are colored and prefixed with `HH:MM:SS`. File lines use
//! `<YYYY-MM-DD HH:MM:SS> [<LEVEL>] <message>`. Debug lines are dropped unless
//! the reporter is verbose. Write failures on either sink are ignored so that
//! reporting never aborts a run.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
    Debug,
    Progress,
    Header,
}

impl Level {
    fn color(self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
            Self::Debug => Color::Magenta,
            Self::Progress | Self::Header => Color::White,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
            Self::Progress => "PROGRESS",
            Self::Header => "HEADER",
        };
        f.write_str(name)
    }
}

pub struct Reporter {
    verbose: bool,
    console: Box<dyn Write + Send>,
    log_file: Option<File>,
    log_path: Option<PathBuf>,
    interactive: bool,
}

impl Reporter {
    /// Reporter writing to standard output, appending to `log_path` when given.
    pub fn new(verbose: bool, log_path: Option<&Path>) -> io::Result<Self> {
        let mut reporter = Self::with_console(verbose, log_path, Box::new(io::stdout()))?;
        reporter.interactive = atty::is(atty::Stream::Stdout);
        Ok(reporter)
    }

    /// Reporter writing console output to `console`. Spinners are never drawn.
    pub fn with_console(
        verbose: bool,
        log_path: Option<&Path>,
        console: Box<dyn Write + Send>,
    ) -> io::Result<Self> {
        let log_file = match log_path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        io::Error::new(
                            e.kind(),
                            format!("failed to open log file {}: {e}", path.display()),
                        )
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            verbose,
            console,
            log_file,
            log_path: log_path.map(Path::to_path_buf),
            interactive: false,
        })
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Info, message.as_ref());
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Success, message.as_ref());
    }

    pub fn warning(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Warning, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Error, message.as_ref());
    }

    /// Only emitted in verbose mode, on both sinks.
    pub fn debug(&mut self, message: impl AsRef<str>) {
        if self.verbose {
            self.emit(Level::Debug, message.as_ref());
        }
    }

    pub fn progress(&mut self, step: usize, total: usize, message: impl AsRef<str>) {
        let line = format!("[{step}/{total}] {}", message.as_ref());
        let _ = writeln!(
            self.console,
            "{} {}",
            Local::now().format("%H:%M:%S").to_string().cyan(),
            line.color(Level::Progress.color())
        );
        self.write_to_file(Level::Progress, &line);
    }

    pub fn header(&mut self, title: impl AsRef<str>) {
        let rule = "================================".white().bold();
        let _ = writeln!(self.console);
        let _ = writeln!(self.console, "{rule}");
        let _ = writeln!(self.console, "{}", title.as_ref().white().bold());
        let _ = writeln!(self.console, "{rule}");
        self.write_to_file(Level::Header, title.as_ref());
    }

    pub fn separator(&mut self) {
        let _ = writeln!(self.console, "{}", "--------------------------------".white());
    }

    /// Plain console line, not written to the log file.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.console, "{}", text.as_ref());
    }

    /// Spinner shown while a slow call runs. Hidden unless stdout is a terminal.
    pub fn spinner(&self, message: impl Into<String>) -> ProgressBar {
        if !self.interactive {
            return ProgressBar::hidden();
        }
        let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") else {
            return ProgressBar::hidden();
        };
        let spinner = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn emit(&mut self, level: Level, message: &str) {
        let _ = writeln!(
            self.console,
            "{} {}",
            Local::now().format("%H:%M:%S").to_string().cyan(),
            format!("[{level}] {message}").color(level.color())
        );
        self.write_to_file(level, message);
    }

    fn write_to_file(&mut self, level: Level, message: &str) {
        if let Some(file) = self.log_file.as_mut() {
            let _ = writeln!(
                file,
                "{} [{level}] {message}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("verbose", &self.verbose)
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_file_lines_have_timestamp_and_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clone.log");
        let mut reporter =
            Reporter::with_console(false, Some(path.as_path()), Box::new(io::sink())).unwrap();

        reporter.info("Step 1: Profile Configuration and Validation");
        reporter.warning("Source and destination are the same AWS account");
        reporter.progress(1, 3, "Cloning: dev_a → prod_a");
        reporter.header("IAM Role Cloning Wizard");
        drop(reporter);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("[INFO] Step 1: Profile Configuration and Validation"));
        assert!(lines[1].ends_with("[WARNING] Source and destination are the same AWS account"));
        assert!(lines[2].ends_with("[PROGRESS] [1/3] Cloning: dev_a → prod_a"));
        assert!(lines[3].ends_with("[HEADER] IAM Role Cloning Wizard"));

        // "YYYY-MM-DD HH:MM:SS " prefix
        let prefix = &lines[0][..20];
        assert_eq!(prefix.as_bytes()[4], b'-');
        assert_eq!(prefix.as_bytes()[10], b' ');
        assert_eq!(prefix.as_bytes()[13], b':');
    }

    #[test]
    fn test_debug_only_when_verbose() {
        let dir = TempDir::new().unwrap();
        let quiet_path = dir.path().join("quiet.log");
        let loud_path = dir.path().join("loud.log");

        let capture = Capture::default();
        let mut quiet =
            Reporter::with_console(false, Some(quiet_path.as_path()), Box::new(capture.clone())).unwrap();
        quiet.debug("hidden detail");
        assert!(!capture.text().contains("hidden detail"));

        let mut loud =
            Reporter::with_console(true, Some(loud_path.as_path()), Box::new(io::sink())).unwrap();
        loud.debug("visible detail");
        drop(quiet);
        drop(loud);

        assert_eq!(std::fs::read_to_string(&quiet_path).unwrap(), "");
        assert!(std::fs::read_to_string(&loud_path)
            .unwrap()
            .contains("[DEBUG] visible detail"));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("append.log");
        std::fs::write(&path, "existing line\n").unwrap();

        let mut reporter =
            Reporter::with_console(false, Some(path.as_path()), Box::new(io::sink())).unwrap();
        reporter.success("done");
        drop(reporter);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("existing line\n"));
        assert!(contents.contains("[SUCCESS] done"));
    }

    #[test]
    fn test_plain_lines_are_console_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.log");
        let capture = Capture::default();
        let mut reporter =
            Reporter::with_console(false, Some(path.as_path()), Box::new(capture.clone())).unwrap();

        reporter.line("  1. dev_a → prod_a");
        reporter.separator();
        drop(reporter);

        assert!(capture.text().contains("  1. dev_a → prod_a"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_unwritable_log_path_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("clone.log");
        let err = Reporter::with_console(false, Some(path.as_path()), Box::new(io::sink())).unwrap_err();
        assert!(err.to_string().contains("failed to open log file"));
    }
}
