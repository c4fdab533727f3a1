//! Terminal presentation: headers, colored status lines and per-file progress.
//!
//! Width and color are decided once in [`Printer::new`] and passed around
//! explicitly; nothing here is global.

use console::{Style, Term};
use dirsum_core::progress::{HashProgress, Observer};
use dirsum_core::verify::{EntryStatus, ManifestReport, WalkFailure};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Width assumed when stdout is not a terminal.
const DEFAULT_WIDTH: usize = 80;
/// No percentage is drawn for a file before this much time has passed.
const FIRST_DRAW_DELAY: Duration = Duration::from_millis(250);
const REDRAW_INTERVAL: Duration = Duration::from_millis(150);

pub struct Printer {
    term: Term,
    interactive: bool,
    width: usize,
    colors: bool,
}

impl Printer {
    /// Detect the terminal on stdout. Colors are used only when `colors` is
    /// set and stdout is a terminal.
    pub fn new(colors: bool) -> Self {
        let term = Term::stdout();
        let interactive = term.is_term();
        let width = if interactive {
            usize::from(term.size().1).max(10)
        } else {
            DEFAULT_WIDTH
        };
        Self {
            term,
            interactive,
            width,
            colors: colors && interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Blank line, title, then a rule across the terminal.
    pub fn header(&self, title: &str) {
        let inner = self.width.saturating_sub(2);
        let text = format!("\n {}\n {}", ellipsize(title, inner), "-".repeat(inner));
        let _ = self.term.write_line(&text);
    }

    pub fn line(&self, text: &str) {
        self.emit(text, None);
    }

    pub fn success(&self, text: &str) {
        self.emit(text, Some(Style::new().green()));
    }

    pub fn failure(&self, text: &str) {
        self.emit(text, Some(Style::new().red()));
    }

    pub fn blank(&self) {
        let _ = self.term.write_line("");
    }

    /// Overwrite the current line with a transient status.
    fn progress(&self, text: &str) {
        let _ = self.term.clear_line();
        let _ = self
            .term
            .write_str(&ellipsize(text, self.width.saturating_sub(1)));
    }

    fn clear_progress(&self) {
        let _ = self.term.clear_line();
    }

    fn emit(&self, text: &str, style: Option<Style>) {
        let text = if self.interactive {
            ellipsize(text, self.width.saturating_sub(1))
        } else {
            text.to_string()
        };
        let rendered = match style {
            Some(style) if self.colors => style.force_styling(true).apply_to(text).to_string(),
            _ => text,
        };
        let _ = self.term.write_line(&rendered);
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Observer that draws hashing progress and, optionally, verify results.
pub struct TermObserver<'a> {
    printer: &'a Printer,
    show_progress: bool,
    report_manifests: bool,
    current: String,
    next_draw: Option<Instant>,
}

impl<'a> TermObserver<'a> {
    pub fn new(printer: &'a Printer, progress: bool) -> Self {
        Self {
            printer,
            show_progress: progress && printer.is_interactive(),
            report_manifests: false,
            current: String::new(),
            next_draw: None,
        }
    }

    /// Prints nothing at all.
    pub fn silent(printer: &'a Printer) -> Self {
        Self::new(printer, false)
    }

    /// Also print an OK/ER block for every verified manifest.
    pub fn reporting_manifests(mut self) -> Self {
        self.report_manifests = true;
        self
    }
}

impl Observer for TermObserver<'_> {
    fn file_started(&mut self, path: &Path) {
        if !self.show_progress {
            return;
        }
        self.current = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.printer.progress(&format!(" >>  {}", self.current));
        self.next_draw = Some(Instant::now() + FIRST_DRAW_DELAY);
    }

    fn bytes_hashed(&mut self, _path: &Path, progress: HashProgress) {
        if !self.show_progress {
            return;
        }
        let now = Instant::now();
        if self.next_draw.is_some_and(|at| now < at) {
            return;
        }
        let pct = progress.fraction() * 100.0;
        self.printer
            .progress(&format!(" {pct:>3.0}% {}", self.current));
        self.next_draw = Some(now + REDRAW_INTERVAL);
    }

    fn file_finished(&mut self, _path: &Path, _outcome: Result<&str, &io::Error>) {
        if self.show_progress {
            self.printer.clear_progress();
        }
        self.next_draw = None;
    }

    fn manifest_verified(&mut self, report: &ManifestReport) {
        if !self.report_manifests {
            return;
        }
        if report.is_ok() {
            self.printer
                .success(&format!(" OK: {}", report.manifest.display()));
            return;
        }
        self.printer
            .failure(&format!(" ER: {}", report.manifest.display()));
        if let Some(error) = &report.error {
            self.printer.failure(&format!("   Error: {error}"));
        }
        for entry in report.failures() {
            let line = match &entry.status {
                EntryStatus::Unreadable { error } => {
                    format!("   Error: {} ({error})", entry.path.display())
                }
                EntryStatus::Mismatched { .. } => format!("   Invalid: {}", entry.path.display()),
                EntryStatus::Ok => continue,
            };
            self.printer.failure(&line);
        }
    }

    fn walk_failed(&mut self, failure: &WalkFailure) {
        if self.report_manifests {
            self.printer.failure(&format!(" Error: {}", failure.error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipsize_short_strings_unchanged() {
        assert_eq!(ellipsize("hello", 5), "hello");
        assert_eq!(ellipsize("", 0), "");
    }

    #[test]
    fn ellipsize_cuts_on_char_boundaries() {
        assert_eq!(ellipsize("hello world", 6), "hello…");
        assert_eq!(ellipsize("ääääää", 3), "ää…");
        assert_eq!(ellipsize("abc", 0), "");
        assert_eq!(ellipsize("abc", 1), "…");
    }

    #[test]
    fn observer_without_terminal_never_draws_progress() {
        let printer = Printer::new(false);
        let obs = TermObserver::new(&printer, true);
        if !printer.is_interactive() {
            assert!(!obs.show_progress);
        }
        assert!(!obs.report_manifests);
        assert!(obs.reporting_manifests().report_manifests);
    }
}
