use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Copy SOURCE to DEST, recursively for directories.
#[derive(Parser, Debug)]
#[command(
    name = "treecp",
    version,
    about = "copy files and directory trees",
    after_help = "\
A directory SOURCE is copied to DEST/NAME, where NAME is the base name of \
SOURCE, unless --content-only is given.  A file SOURCE is copied to DEST, or \
to DEST/NAME when DEST ends with a slash or is an existing directory.

Existing files inside a directory copy are kept unless --force is given; an \
existing top-level destination is an error without --force.

Set RUST_LOG to control diagnostics (e.g. RUST_LOG=treecp=debug)."
)]
pub struct Cli {
    /// Overwrite existing destinations
    #[arg(short = 'f', long = "force", action = ArgAction::SetTrue)]
    pub force: bool,

    /// Copy the children of a directory SOURCE straight into DEST
    #[arg(short = 'c', long = "content-only", action = ArgAction::SetTrue)]
    pub content_only: bool,

    /// Recreate symlinks instead of copying what they point at
    #[arg(short = 'P', long = "no-dereference", action = ArgAction::SetTrue)]
    pub no_dereference: bool,

    /// Remove SOURCE after copying (rename when possible)
    #[arg(short = 'm', long = "move", action = ArgAction::SetTrue)]
    pub move_source: bool,

    /// Delete a partially written file when its copy fails
    #[arg(long = "revert", action = ArgAction::SetTrue)]
    pub revert: bool,

    /// Buffer size in bytes for file streaming
    #[arg(
        long = "buffer-size",
        value_name = "BYTES",
        env = "TREECP_BUFFER_SIZE",
        allow_negative_numbers = true
    )]
    pub buffer_size: Option<i64>,

    /// Leave out entries with this file name (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Print a checksum of all copied bytes
    #[arg(long = "checksum", value_name = "ALGO")]
    pub checksum: Option<ChecksumAlgo>,

    /// Keep going when an entry fails
    #[arg(long = "skip-errors", action = ArgAction::SetTrue)]
    pub skip_errors: bool,

    /// Log entries skipped by --skip-errors
    #[arg(long = "log-errors", action = ArgAction::SetTrue)]
    pub log_errors: bool,

    /// Treat existing files inside a directory copy as errors
    #[arg(long = "fail-on-existing", action = ArgAction::SetTrue)]
    pub fail_on_existing: bool,

    /// Cancel the copy after this many seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Show progress bar during copy
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    pub progress: bool,

    /// Explain what is being done (repeat for more detail)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Source path
    pub source: PathBuf,

    /// Destination path
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChecksumAlgo {
    Sha256,
    Sha512,
}
