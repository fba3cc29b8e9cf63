use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::dir;
use crate::engine;
use crate::error::{CpError, CpResult};
use crate::hash::HashSink;
use crate::metadata;
use crate::options::CopyOptions;
use crate::progress;
use crate::util;

/// State threaded through one copy: the cancel token, the options and the
/// caller's hash sink.
pub(crate) struct Session<'s, 'h> {
    pub(crate) cancel: &'s CancelToken,
    pub(crate) opts: &'s CopyOptions,
    pub(crate) hash: Option<&'h mut (dyn HashSink + 'h)>,
}

/// A single copy: source, destination, options and an optional hash sink.
///
/// ```no_run
/// use sha2::{Digest, Sha256};
/// use treecp::{CancelToken, CopyOptions, CopyRequest};
///
/// let mut digest = Sha256::new();
/// CopyRequest::new("data.bin", "backup/", CopyOptions::default())
///     .with_hash(&mut digest)
///     .run(&CancelToken::new())?;
/// println!("{:x}", digest.finalize());
/// # Ok::<(), treecp::CpError>(())
/// ```
pub struct CopyRequest<'h> {
    src: PathBuf,
    dst: PathBuf,
    opts: CopyOptions,
    hash: Option<&'h mut (dyn HashSink + 'h)>,
}

impl<'h> CopyRequest<'h> {
    pub fn new(src: impl AsRef<Path>, dst: impl AsRef<Path>, opts: CopyOptions) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            opts,
            hash: None,
        }
    }

    /// Feed every copied byte to `sink`.
    pub fn with_hash(mut self, sink: &'h mut (dyn HashSink + 'h)) -> Self {
        self.hash = Some(sink);
        self
    }

    pub fn run(self, cancel: &CancelToken) -> CpResult<()> {
        let CopyRequest {
            src,
            dst,
            opts,
            hash,
        } = self;
        let mut session = Session {
            cancel,
            opts: &opts,
            hash,
        };
        copy_top(&mut session, &src, &dst)
    }
}

/// Copy `src` to `dst` (see [`CopyRequest`] for hashing).
pub fn copy(
    cancel: &CancelToken,
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    opts: &CopyOptions,
) -> CpResult<()> {
    CopyRequest::new(src, dst, opts.clone()).run(cancel)
}

fn copy_top(session: &mut Session<'_, '_>, src: &Path, dst: &Path) -> CpResult<()> {
    let opts = session.opts;
    session.cancel.check()?;

    let resolved = util::resolve(src).map_err(|e| stat_error(src, e))?;
    if opts.is_excluded(&resolved.path) {
        info!(src = %resolved.path.display(), "source excluded, nothing to do");
        return Ok(());
    }

    // The link itself is the source when links are not followed.
    let input = util::absolute(src).map_err(|e| stat_error(src, e))?;
    let as_link = resolved.was_symlink && opts.no_follow;
    let source = if as_link { input.clone() } else { resolved.path.clone() };

    let src_meta = if as_link {
        fs::symlink_metadata(&source)
    } else {
        fs::metadata(&source)
    }
    .map_err(|e| stat_error(&source, e))?;
    let src_is_dir = src_meta.is_dir();

    let target = if src_is_dir {
        util::dir_dest_path(&input, dst, opts.content_only)
    } else {
        util::file_dest_path(&input, dst, dst.is_dir())
    };
    info!(src = %source.display(), dst = %target.display(), "copy");

    if src_is_dir {
        let abs_target = util::absolute(&target).map_err(|e| stat_error(&target, e))?;
        if abs_target != source && abs_target.starts_with(&source) {
            return Err(CpError::CopyIntoSelf {
                path: source,
                dest: target,
            });
        }
    }

    if let Ok(target_meta) = fs::symlink_metadata(&target) {
        if util::is_same_file(&source, &target) {
            return Err(CpError::SameFile {
                src: source,
                dst: target,
            });
        }

        let merge = src_is_dir && target_meta.is_dir();
        if !merge {
            if !opts.force {
                return Err(CpError::AlreadyExists { path: target });
            }
            util::remove_any(&target).map_err(|e| CpError::Remove {
                path: target.clone(),
                source: e,
            })?;
            debug!(dst = %target.display(), "removed existing destination");
        }
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            metadata::create_dir(parent, metadata::parent_mode(&source))?;
        }
    }

    // A tree with exclusions must go entry by entry so excluded ones stay put.
    let can_rename = opts.move_source && !(src_is_dir && opts.exclude.is_some());
    if can_rename && try_rename(session, &source, &target, src_is_dir || as_link)? {
        info!(src = %source.display(), dst = %target.display(), "moved by rename");
        return Ok(());
    }

    let left_behind = if as_link {
        make_symlink(&resolved.path, &target)?;
        0
    } else if src_is_dir {
        let summary = dir::copy_directory(session, &source, &target)?;
        info!(
            files = summary.files,
            dirs = summary.dirs,
            links = summary.links,
            bytes = summary.bytes,
            excluded = summary.excluded,
            kept_existing = summary.kept_existing,
            failed = summary.failed,
            "tree copied"
        );
        summary.left_behind()
    } else {
        let pb = progress::make_file_progress(
            src_meta.len(),
            &source.display().to_string(),
            opts.progress,
        );
        let result = copy_file(session, &source, &target, metadata::mode_bits(&src_meta), &pb);
        pb.finish_and_clear();
        match result {
            Ok(_) => 0,
            Err(e) if !e.is_canceled() && opts.error_skip => {
                if opts.error_log {
                    warn!(error = %e, "skipping entry");
                }
                1
            }
            Err(e) => return Err(e),
        }
    };

    if opts.move_source {
        if left_behind == 0 {
            util::remove_any(&source).map_err(|e| CpError::Remove {
                path: source.clone(),
                source: e,
            })?;
            debug!(src = %source.display(), "source removed after copy");
        } else {
            warn!(
                src = %source.display(),
                left_behind,
                "entries left behind, source kept"
            );
        }
    }

    Ok(())
}

/// Move `src` to `dst` with a single rename. Any rename failure is an
/// expected fallback signal and yields `Ok(false)`.
///
/// A file is hashed before it is renamed, since no bytes are streamed; the
/// sink is reset again if the rename does not happen.
fn try_rename(
    session: &mut Session<'_, '_>,
    src: &Path,
    dst: &Path,
    skip_hash: bool,
) -> CpResult<bool> {
    if !skip_hash && session.hash.is_some() {
        if let Err(e) = hash_file(session, src) {
            if e.is_canceled() {
                return Err(e);
            }
            debug!(error = %e, "hashing before rename failed, falling back to copy");
            reset_hash(session);
            return Ok(false);
        }
    }

    match fs::rename(src, dst) {
        Ok(()) => Ok(true),
        Err(e) => {
            debug!(
                src = %src.display(),
                dst = %dst.display(),
                error = %e,
                "rename failed, copying instead"
            );
            if !skip_hash {
                reset_hash(session);
            }
            Ok(false)
        }
    }
}

fn hash_file(session: &mut Session<'_, '_>, src: &Path) -> CpResult<u64> {
    let mut file = File::open(src).map_err(|e| CpError::OpenRead {
        path: src.to_path_buf(),
        source: e,
    })?;
    engine::stream_copy(
        session.cancel,
        &mut file,
        &mut io::sink(),
        session.opts.buffer_size,
        session.hash.as_deref_mut(),
        src,
        Path::new("<hash>"),
        &ProgressBar::hidden(),
    )
}

fn reset_hash(session: &mut Session<'_, '_>) {
    if let Some(h) = session.hash.as_deref_mut() {
        h.reset();
    }
}

/// Copy one regular file's bytes and mode bits, returning the byte count.
///
/// On cancellation the partial destination is always removed; on any other
/// failure only with `revert_on_err`. A failed removal is chained after the
/// original error.
pub(crate) fn copy_file(
    session: &mut Session<'_, '_>,
    src: &Path,
    dst: &Path,
    mode: u32,
    pb: &ProgressBar,
) -> CpResult<u64> {
    let mut src_file = File::open(src).map_err(|e| CpError::OpenRead {
        path: src.to_path_buf(),
        source: e,
    })?;
    let mut dst_file = open_dest_create(dst, mode, session.opts.force)?;

    let result = engine::stream_copy(
        session.cancel,
        &mut src_file,
        &mut dst_file,
        session.opts.buffer_size,
        session.hash.as_deref_mut(),
        src,
        dst,
        pb,
    )
    .and_then(|n| metadata::preserve_mode_fd(&dst_file, dst, mode).map(|()| n));

    drop(dst_file);

    match result {
        Ok(n) => Ok(n),
        Err(e) => {
            if e.is_canceled() || session.opts.revert_on_err {
                if let Err(rm) = fs::remove_file(dst) {
                    return Err(CpError::chain(
                        e,
                        CpError::Remove {
                            path: dst.to_path_buf(),
                            source: rm,
                        },
                    ));
                }
                debug!(dst = %dst.display(), "removed partial destination");
            }
            Err(e)
        }
    }
}

/// Open dest with create+truncate in one syscall.
/// Falls back to remove+create when `force` is set (e.g. read-only dest).
fn open_dest_create(dst: &Path, mode: u32, force: bool) -> CpResult<File> {
    let open = || {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(dst)
    };

    match open() {
        Ok(f) => Ok(f),
        Err(_) if force => {
            let _ = fs::remove_file(dst);
            open().map_err(|e| CpError::CreateFile {
                path: dst.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(CpError::CreateFile {
            path: dst.to_path_buf(),
            source: e,
        }),
    }
}

fn make_symlink(target: &Path, link: &Path) -> CpResult<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| CpError::Symlink {
        dst: link.to_path_buf(),
        source: e,
    })
}

fn stat_error(path: &Path, e: io::Error) -> CpError {
    if e.kind() == io::ErrorKind::NotFound {
        CpError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        CpError::Stat {
            path: path.to_path_buf(),
            source: e,
        }
    }
}
