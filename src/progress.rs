use std::cell::Cell;
use std::io::IsTerminal;

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

/// Byte progress bar for a single file copy.
/// Only displays if `enabled` is true AND stderr is a TTY.
pub fn make_file_progress(total: u64, name: &str, enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() || total == 0 {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} {msg}\n  [{elapsed_precise}] [{wide_bar:.cyan/dark_gray}] \
             {bytes}/{total_bytes} ({bytes_per_sec}, eta {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─");

    let pb = ProgressBar::new(total);
    pb.set_style(style);
    pb.set_message(name.to_string());
    pb
}

/// Spinner for tree copies; the message carries the running file count.
pub fn make_dir_progress(src_name: &str, enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(format!("copying {src_name}"));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Running totals shown by the tree-copy spinner.
pub struct DirProgressCounter {
    pb: ProgressBar,
    files: Cell<u64>,
    bytes: Cell<u64>,
}

impl DirProgressCounter {
    pub fn new(pb: ProgressBar) -> Self {
        Self {
            pb,
            files: Cell::new(0),
            bytes: Cell::new(0),
        }
    }

    /// Count one finished file of `bytes` bytes.
    pub fn inc(&self, bytes: u64) {
        self.files.set(self.files.get() + 1);
        self.bytes.set(self.bytes.get() + bytes);
        self.pb.set_message(self.summary());
    }

    pub fn finish(&self) {
        self.pb.finish_with_message(self.summary());
    }

    pub fn abandon(&self) {
        self.pb.abandon_with_message(format!("{} (stopped)", self.summary()));
    }

    fn summary(&self) -> String {
        format!(
            "{} files, {} copied",
            self.files.get(),
            HumanBytes(self.bytes.get())
        )
    }
}
