//! Terminal rendering for the `collect` command.

use crate::sink::{Progress, Sink};
use anstyle::{AnsiColor, Style};
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Prints log lines to `out` and keeps a one-line progress bar on `err`.
///
/// The bar is only drawn when `fancy` is set, which the CLI does when stderr is
/// a terminal. Write errors are ignored: losing console output must not stop
/// a collection.
pub struct ConsoleSink<O: Write, E: Write> {
    out: O,
    err: E,
    quiet: bool,
    fancy: bool,
    bar_drawn: bool,
    last: Option<Progress>,
}

impl ConsoleSink<io::Stdout, io::Stderr> {
    pub fn stdio(quiet: bool) -> Self {
        use std::io::IsTerminal;
        let fancy = io::stderr().is_terminal();
        Self::new(io::stdout(), io::stderr(), quiet, fancy)
    }
}

impl<O: Write, E: Write> ConsoleSink<O, E> {
    pub fn new(out: O, err: E, quiet: bool, fancy: bool) -> Self {
        Self {
            out,
            err,
            quiet,
            fancy,
            bar_drawn: false,
            last: None,
        }
    }

    /// The most recent progress value seen.
    pub fn last_progress(&self) -> Option<Progress> {
        self.last
    }

    fn clear_bar(&mut self) {
        if self.bar_drawn {
            let _ = write!(self.err, "{CLEAR_LINE}");
            self.bar_drawn = false;
        }
    }

    fn draw_bar(&mut self, progress: Progress) {
        let line = render_bar(progress, self.fancy);
        let _ = write!(self.err, "{CLEAR_LINE}{line}");
        let _ = self.err.flush();
        self.bar_drawn = true;
    }

    /// Removes the bar so later output starts on a clean line.
    pub fn finish(&mut self) {
        self.clear_bar();
        let _ = self.err.flush();
        let _ = self.out.flush();
    }

    /// Prints the closing line in green, or red for a failure.
    pub fn summary(&mut self, message: &str, ok: bool) {
        self.finish();
        let color = if ok { AnsiColor::Green } else { AnsiColor::Red };
        let style = if self.fancy {
            color.on_default().bold()
        } else {
            Style::new()
        };
        let _ = writeln!(self.err, "{style}{message}{style:#}");
    }
}

/// `[#########.....]  42%`, or `[failed]`.
fn render_bar(progress: Progress, colored: bool) -> String {
    match progress {
        Progress::Percent(pct) => {
            let filled = BAR_WIDTH * usize::from(pct.min(100)) / 100;
            let style = if colored {
                AnsiColor::Cyan.on_default()
            } else {
                Style::new()
            };
            format!(
                "[{style}{}{style:#}{}] {:>3}%",
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH - filled),
                pct
            )
        }
        Progress::Failed => "[failed]".to_string(),
    }
}

impl<O: Write, E: Write> Sink for ConsoleSink<O, E> {
    fn log(&mut self, message: &str) {
        if self.quiet {
            return;
        }
        self.clear_bar();
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.flush();
        if let Some(progress) = self.last
            && self.fancy
        {
            self.draw_bar(progress);
        }
    }

    fn progress(&mut self, progress: Progress) {
        self.last = Some(progress);
        if !self.quiet && self.fancy {
            self.draw_bar(progress);
        }
    }
}
