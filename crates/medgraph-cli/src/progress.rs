//! Terminal progress bars for import stages.

use std::io::{self, Write};
use std::sync::Mutex;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use medgraph_core::ProgressSink;

const TEMPLATE: &str = "{msg:>32} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7}";

/// One progress bar per stage, drawn on stderr through a shared [`MultiProgress`].
pub struct BarProgress {
    multi: MultiProgress,
    current: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            current: Mutex::new(None),
        }
    }
}

impl ProgressSink for BarProgress {
    fn stage_started(&self, name: &str, total: u64) {
        let bar = self.multi.add(ProgressBar::new(total));
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message(name.to_string());

        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(bar) {
                previous.finish();
            }
        }
    }

    fn advance(&self, delta: u64) {
        if let Ok(current) = self.current.lock() {
            if let Some(bar) = current.as_ref() {
                bar.inc(delta);
            }
        }
    }

    fn stage_finished(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(bar) = current.take() {
                bar.finish();
            }
        }
    }
}

/// Log writer that hides the bars while a line is written to stderr.
pub struct SuspendingWriter {
    multi: MultiProgress,
}

impl SuspendingWriter {
    pub fn new(multi: MultiProgress) -> Self {
        Self { multi }
    }
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.multi.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
