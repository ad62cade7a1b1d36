//! A terminal progress bar implementing [`crate::codec::ProgressSink`].
//!
//! Ambient CLI scaffolding, not part of the core: progress reporting to a
//! terminal is an external collaborator the codec only calls into. Renders
//! a `[#####     ] NN% done` bar, hiding the cursor for the duration of
//! the run.

use std::io::Write;

use crate::codec::ProgressSink;

const BAR_WIDTH: u64 = 100;
const CSI_HIDE_CURSOR: &str = "\x1b[?25l";
const CSI_SHOW_CURSOR: &str = "\x1b[?25h";
const CSI_GREEN: &str = "\x1b[32m";
const CSI_RESET: &str = "\x1b[0m";

/// Prints a bar to stderr sized against a known total. Constructing one
/// hides the terminal cursor; it is restored on [`TerminalProgress::finish`]
/// or on drop, whichever comes first, so an early error still leaves the
/// cursor visible.
pub struct TerminalProgress {
    total_bytes: u64,
    percent: u64,
    done: bool,
}

impl TerminalProgress {
    pub fn new(total_bytes: u64) -> Self {
        eprint!("{CSI_HIDE_CURSOR}");
        Self { total_bytes, percent: 0, done: false }
    }

    fn render(&self) {
        let filled = self.percent.min(BAR_WIDTH) as usize;
        eprint!("\r[{CSI_GREEN}");
        for i in 0..BAR_WIDTH as usize {
            eprint!("{}", if i < filled { "#" } else { " " });
        }
        eprint!("{CSI_RESET}] {}% done", self.percent);
        let _ = std::io::stderr().flush();
    }
}

impl ProgressSink for TerminalProgress {
    fn update(&mut self, bytes_processed: u64) {
        self.percent = if self.total_bytes == 0 {
            100
        } else {
            (bytes_processed * BAR_WIDTH / self.total_bytes).min(BAR_WIDTH)
        };
        self.render();
    }

    fn finish(&mut self) {
        if self.percent != BAR_WIDTH {
            self.percent = BAR_WIDTH;
            self.render();
        }
        eprintln!();
        eprint!("{CSI_SHOW_CURSOR}");
        let _ = std::io::stderr().flush();
        self.done = true;
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        if !self.done {
            eprint!("{CSI_SHOW_CURSOR}");
            let _ = std::io::stderr().flush();
        }
    }
}
