use std::io::{self, Write};

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::fmt::MakeWriter;

/// Owns the stack of progress bars drawn while files render.
///
/// The top bar counts finished files; each running job gets its own bar
/// below it, which disappears when the job ends.
#[derive(Clone)]
pub struct ProgressReporter {
    multi: MultiProgress,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                multi: MultiProgress::new(),
            }
        } else {
            Self::hidden()
        }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        }
    }

    /// Aggregate bar counting completed files
    pub fn overall(&self, total_files: usize, label: &str) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(total_files as u64));
        bar.set_style(style(
            "{prefix:>12.bold} [{bar:40.cyan/blue}] {pos}/{len} files [{elapsed_precise}] {msg}",
            "█▓░",
        ));
        bar.set_prefix(label.to_string());
        bar
    }

    /// Per-file bar counting painted frames
    pub fn file(&self, name: &str) -> FileProgress {
        let bar = self.multi.add(ProgressBar::new(0));
        bar.set_style(style(
            "{prefix:>12} [{bar:40.green/black}] {pos}/{len} frames ({percent}%)",
            "##-",
        ));
        bar.set_prefix(name.to_string());
        FileProgress {
            bar,
            multi: self.multi.clone(),
        }
    }

    /// Stderr writer for the log subscriber that hides the bars while a
    /// line is printed
    pub fn log_writer(&self) -> LogWriter {
        LogWriter {
            multi: self.multi.clone(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}

/// Frame counter for one running job
pub struct FileProgress {
    bar: ProgressBar,
    multi: MultiProgress,
}

impl FileProgress {
    pub fn set_total(&self, frames: usize) {
        self.bar.set_length(frames as u64);
    }

    pub fn inc(&self, frames: u64) {
        self.bar.inc(frames);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Drop for FileProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
        self.multi.remove(&self.bar);
    }
}

/// Writes log lines to stderr between bar redraws
#[derive(Clone)]
pub struct LogWriter {
    multi: MultiProgress,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.multi.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn style(template: &str, chars: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}
