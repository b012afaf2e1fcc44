//! Startup and failure messages on stderr.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

/// How a line is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Notice,
    Warning,
    Failure,
}

impl Tone {
    fn style(self) -> Style {
        let style = Style::new().for_stderr();
        match self {
            Tone::Plain => style,
            Tone::Notice => style.cyan().bold(),
            Tone::Warning => style.yellow(),
            Tone::Failure => style.red(),
        }
    }
}

/// Writes the previewer's user-facing lines to stderr.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// What is being previewed, before the listener binds.
    pub(crate) fn preview_summary(&self, file: &Path, upload_dir: &Path, live_reload: bool) {
        for line in summary_lines(file, upload_dir, live_reload) {
            self.write(Tone::Plain, &line);
        }
    }

    /// The address the editor page is reachable at.
    pub(crate) fn listening(&self, url: &str) {
        self.write(Tone::Notice, &format!("Server running at {url}"));
    }

    pub(crate) fn browser_unavailable(&self, url: &str) {
        self.write(Tone::Warning, &format!("Could not open browser, visit {url}"));
    }

    /// Fatal error before exit.
    pub(crate) fn failure(&self, err: &impl Display) {
        self.write(Tone::Failure, &format!("Error: {err}"));
    }

    fn write(&self, tone: Tone, line: &str) {
        // Nowhere left to report a broken stderr.
        let _ = self.term.write_line(&tone.style().apply_to(line).to_string());
    }
}

fn summary_lines(file: &Path, upload_dir: &Path, live_reload: bool) -> [String; 3] {
    let live_reload = if live_reload { "enabled" } else { "disabled" };
    [
        format!("Previewing {}", file.display()),
        format!("Upload directory: {}", upload_dir.display()),
        format!("Live reload: {live_reload}"),
    ]
}
