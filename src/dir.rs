use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::copy::{self, Session};
use crate::error::{CpError, CpResult};
use crate::metadata;
use crate::plan::{self, Action, TraversalEntry};
use crate::progress::{self, DirProgressCounter};
use crate::util;

/// Counters for one tree copy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WalkSummary {
    pub dirs: u64,
    pub files: u64,
    pub links: u64,
    pub bytes: u64,
    /// Entries left out by the exclude predicate.
    pub excluded: u64,
    /// Entries whose destination already existed and was kept.
    pub kept_existing: u64,
    /// Entry errors swallowed because of `error_skip`.
    pub failed: u64,
}

impl WalkSummary {
    /// Source entries that have no fresh copy at the destination.
    pub fn left_behind(&self) -> u64 {
        self.excluded + self.kept_existing + self.failed
    }
}

struct WalkState {
    summary: WalkSummary,
    /// Deferred directory modes: (dst_path, mode)
    dir_modes: Vec<(PathBuf, u32)>,
    counter: DirProgressCounter,
    file_pb: ProgressBar,
}

/// Copy the tree rooted at `src` (already resolved) so that `dst` becomes
/// its copy.
///
/// Pre-order walk in file-name order: every directory is created before
/// anything beneath it.
/// The token is polled once per entry; a cancellation stops the walk and
/// leaves finished entries in place.
pub(crate) fn copy_directory(
    session: &mut Session<'_, '_>,
    src: &Path,
    dst: &Path,
) -> CpResult<WalkSummary> {
    let opts = session.opts;
    let mut state = WalkState {
        summary: WalkSummary::default(),
        dir_modes: Vec::new(),
        counter: DirProgressCounter::new(progress::make_dir_progress(
            &src.display().to_string(),
            opts.progress,
        )),
        file_pb: ProgressBar::hidden(),
    };

    let mut walker = WalkDir::new(src)
        .follow_links(!opts.no_follow)
        .min_depth(0)
        .sort_by_file_name()
        .into_iter();

    let outcome = loop {
        if let Err(e) = session.cancel.check() {
            break Err(e);
        }

        let Some(result) = walker.next() else {
            break Ok(());
        };

        let (is_dir, step) = match result {
            Ok(entry) => {
                let is_dir = entry.file_type().is_dir();
                (is_dir, visit(session, &entry, src, dst, &mut state))
            }
            Err(e) => (false, Err(walk_error(src, e))),
        };

        match step {
            Ok(Action::Skip) if is_dir => walker.skip_current_dir(),
            Ok(_) => {}
            Err(e) if e.is_canceled() => break Err(e),
            Err(e) if opts.error_skip => {
                state.summary.failed += 1;
                if opts.error_log {
                    warn!(error = %e, "skipping entry");
                }
                if is_dir {
                    walker.skip_current_dir();
                }
            }
            Err(e) => break Err(e),
        }
    };

    // Innermost first, so a read-only parent is locked down last.
    for (path, mode) in state.dir_modes.iter().rev() {
        if let Err(e) = metadata::preserve_mode(path, *mode) {
            if outcome.is_err() {
                continue;
            }
            if !opts.error_skip {
                state.counter.abandon();
                return Err(e);
            }
            state.summary.failed += 1;
            if opts.error_log {
                warn!(error = %e, "skipping entry");
            }
        }
    }

    match outcome {
        Ok(()) => {
            state.counter.finish();
            Ok(state.summary)
        }
        Err(e) => {
            state.counter.abandon();
            Err(e)
        }
    }
}

fn visit(
    session: &mut Session<'_, '_>,
    entry: &DirEntry,
    root: &Path,
    dst_root: &Path,
    state: &mut WalkState,
) -> CpResult<Action> {
    let opts = session.opts;
    let traversal = traversal_entry(entry, root, opts.no_follow)?;

    let dst_path = if traversal.relative.as_os_str().is_empty() {
        dst_root.to_path_buf()
    } else {
        dst_root.join(&traversal.relative)
    };
    let dst_meta = fs::symlink_metadata(&dst_path).ok();

    let action = plan::plan(&traversal, dst_meta.is_some(), opts);
    debug!(path = %traversal.path.display(), dst = %dst_path.display(), ?action, "planned");

    match action {
        Action::Skip if opts.is_excluded(&traversal.resolved) => state.summary.excluded += 1,
        Action::Skip => state.summary.kept_existing += 1,
        Action::Conflict => {
            return Err(CpError::AlreadyExists { path: dst_path });
        }
        Action::MakeDir => {
            if let Some(dm) = &dst_meta {
                if !dm.is_dir() {
                    if !opts.force {
                        return Err(CpError::AlreadyExists { path: dst_path });
                    }
                    remove_existing(&dst_path)?;
                }
            }
            metadata::create_dir(&dst_path, traversal.mode)?;
            state.dir_modes.push((dst_path, traversal.mode));
            state.summary.dirs += 1;
        }
        Action::MakeSymlink => {
            if dst_meta.is_some() {
                remove_existing(&dst_path)?;
            }
            let target = traversal.link_target.as_deref().unwrap_or(&traversal.resolved);
            std::os::unix::fs::symlink(target, &dst_path).map_err(|e| CpError::Symlink {
                dst: dst_path.clone(),
                source: e,
            })?;
            state.summary.links += 1;
        }
        Action::CopyFile => {
            if let Some(dm) = &dst_meta {
                if !dm.is_file() {
                    remove_existing(&dst_path)?;
                }
            }
            let n = copy::copy_file(
                session,
                &traversal.path,
                &dst_path,
                traversal.mode,
                &state.file_pb,
            )?;
            state.summary.files += 1;
            state.summary.bytes += n;
            state.counter.inc(n);
        }
    }

    Ok(action)
}

/// Classify a walk entry. Symlinks get their resolved identity; with
/// `no_follow` a link that cannot be resolved (dangling, looping) keeps its
/// literal target.
fn traversal_entry(entry: &DirEntry, root: &Path, no_follow: bool) -> CpResult<TraversalEntry> {
    let path = entry.path();
    let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let meta = entry.metadata().map_err(|e| walk_error(path, e))?;
    let is_symlink = entry.path_is_symlink();

    let (resolved, link_target) = if is_symlink {
        match util::resolve(path) {
            Ok(r) => (r.path.clone(), Some(r.path)),
            Err(_) if no_follow => {
                let raw = fs::read_link(path).map_err(|e| CpError::ReadLink {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                (path.to_path_buf(), Some(raw))
            }
            Err(e) => {
                return Err(CpError::Stat {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        }
    } else {
        (path.to_path_buf(), None)
    };

    Ok(TraversalEntry {
        path: path.to_path_buf(),
        resolved,
        relative,
        mode: metadata::mode_bits(&meta),
        is_dir: meta.is_dir(),
        is_symlink,
        link_target,
    })
}

fn remove_existing(path: &Path) -> CpResult<()> {
    util::remove_any(path).map_err(|e| CpError::Remove {
        path: path.to_path_buf(),
        source: e,
    })
}

fn walk_error(fallback: &Path, e: walkdir::Error) -> CpError {
    CpError::Walk {
        path: e.path().unwrap_or(fallback).to_path_buf(),
        source: e,
    }
}
