use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Buffer size used by the stream copier unless overridden (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Predicate deciding whether a resolved path is left out of the copy.
pub type ExcludeFn = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Copy configuration. Build it once with [`CopyOptions::default`] and the
/// `with_*` methods; the copy only reads it.
#[derive(Clone)]
pub struct CopyOptions {
    pub(crate) buffer_size: usize,
    pub(crate) force: bool,
    pub(crate) content_only: bool,
    pub(crate) no_follow: bool,
    pub(crate) move_source: bool,
    pub(crate) revert_on_err: bool,
    pub(crate) exclude: Option<ExcludeFn>,
    pub(crate) error_skip: bool,
    pub(crate) error_log: bool,
    pub(crate) fail_on_existing: bool,
    pub(crate) progress: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            force: false,
            content_only: false,
            no_follow: false,
            move_source: false,
            revert_on_err: false,
            exclude: None,
            error_skip: false,
            error_log: false,
            fail_on_existing: false,
            progress: false,
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("buffer_size", &self.buffer_size)
            .field("force", &self.force)
            .field("content_only", &self.content_only)
            .field("no_follow", &self.no_follow)
            .field("move_source", &self.move_source)
            .field("revert_on_err", &self.revert_on_err)
            .field("exclude", &self.exclude.as_ref().map(|_| "<fn>"))
            .field("error_skip", &self.error_skip)
            .field("error_log", &self.error_log)
            .field("fail_on_existing", &self.fail_on_existing)
            .field("progress", &self.progress)
            .finish()
    }
}

impl CopyOptions {
    /// Buffer size for file streaming. Zero or negative sizes are ignored
    /// and the current value is kept.
    pub fn with_buffer_size(mut self, size: i64) -> Self {
        if size > 0 {
            self.buffer_size = usize::try_from(size).unwrap_or(self.buffer_size);
        }
        self
    }

    /// Overwrite an existing destination.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Copy a directory's children straight into the destination instead of
    /// nesting them under a directory named after the source.
    pub fn with_content_only(mut self, content_only: bool) -> Self {
        self.content_only = content_only;
        self
    }

    /// Recreate symlinks instead of copying what they point at.
    pub fn with_no_follow(mut self, no_follow: bool) -> Self {
        self.no_follow = no_follow;
        self
    }

    /// Remove the source once it has been copied; tries a rename first.
    pub fn with_move(mut self, move_source: bool) -> Self {
        self.move_source = move_source;
        self
    }

    /// Delete a partially written destination file when its copy fails.
    pub fn with_revert_on_err(mut self, revert: bool) -> Self {
        self.revert_on_err = revert;
        self
    }

    /// Skip every entry whose resolved absolute path matches `f`.
    pub fn with_exclude<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.exclude = Some(Arc::new(f));
        self
    }

    /// Swallow per-entry errors instead of aborting the copy.
    pub fn with_error_skip(mut self, skip: bool) -> Self {
        self.error_skip = skip;
        self
    }

    /// Log swallowed per-entry errors at warn level.
    pub fn with_error_log(mut self, log: bool) -> Self {
        self.error_log = log;
        self
    }

    /// Report existing entries inside a tree copy as `AlreadyExists`
    /// instead of silently keeping them.
    pub fn with_fail_on_existing(mut self, fail: bool) -> Self {
        self.fail_on_existing = fail;
        self
    }

    /// Draw progress bars on stderr (only when it is a terminal).
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn content_only(&self) -> bool {
        self.content_only
    }

    pub fn no_follow(&self) -> bool {
        self.no_follow
    }

    pub fn move_source(&self) -> bool {
        self.move_source
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.as_ref().is_some_and(|f| f(path))
    }
}
