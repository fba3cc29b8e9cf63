use std::path::PathBuf;

use crate::options::CopyOptions;

/// One node visited by the tree walk.
#[derive(Debug, Clone)]
pub struct TraversalEntry {
    /// Path as reached by the walk (under the source root).
    pub path: PathBuf,
    /// Absolute, symlink-free identity of the entry.
    pub resolved: PathBuf,
    /// Position relative to the source root; empty for the root itself.
    pub relative: PathBuf,
    /// Permission bits (`st_mode & 0o7777`).
    pub mode: u32,
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Where a symlink points, when the entry is one.
    pub link_target: Option<PathBuf>,
}

/// What to do with a traversal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    MakeDir,
    MakeSymlink,
    CopyFile,
    /// Destination exists and strict collision reporting is on.
    Conflict,
}

/// Decide the action for `entry`. Pure: `dst_exists` is supplied by the
/// caller, nothing is read from disk here.
pub fn plan(entry: &TraversalEntry, dst_exists: bool, opts: &CopyOptions) -> Action {
    if opts.is_excluded(&entry.resolved) {
        return Action::Skip;
    }

    if entry.is_symlink && opts.no_follow {
        return existing_or(Action::MakeSymlink, dst_exists, opts);
    }

    if entry.is_dir {
        return Action::MakeDir;
    }

    existing_or(Action::CopyFile, dst_exists, opts)
}

fn existing_or(action: Action, dst_exists: bool, opts: &CopyOptions) -> Action {
    if !dst_exists || opts.force {
        action
    } else if opts.fail_on_existing {
        Action::Conflict
    } else {
        Action::Skip
    }
}
