use std::fs::{self, DirBuilder, File};
use std::os::unix::fs::{DirBuilderExt, MetadataExt, PermissionsExt};
use std::path::Path;

use crate::error::{CpError, CpResult};

/// Mode used for a directory whose source mode cannot be read.
const FALLBACK_DIR_MODE: u32 = 0o755;

/// Permission bits of a stat result.
#[inline]
pub fn mode_bits(meta: &fs::Metadata) -> u32 {
    meta.mode() & 0o7777
}

/// Mode bits of the directory containing `path`.
pub fn parent_mode(path: &Path) -> u32 {
    path.parent()
        .and_then(|p| fs::metadata(p).ok())
        .map(|m| mode_bits(&m))
        .unwrap_or(FALLBACK_DIR_MODE)
}

/// Create `path` and any missing parents.
///
/// The owner always gets rwx at creation time so children can be written
/// into a copy of a read-only directory; the exact bits are applied later
/// with [`preserve_mode`].
pub fn create_dir(path: &Path, mode: u32) -> CpResult<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(mode | 0o700)
        .create(path)
        .map_err(|e| CpError::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Set the permission bits of `path` exactly, bypassing the umask.
pub fn preserve_mode(path: &Path, mode: u32) -> CpResult<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| CpError::Chmod {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Same as [`preserve_mode`] on an already open file.
pub fn preserve_mode_fd(file: &File, path: &Path, mode: u32) -> CpResult<()> {
    file.set_permissions(fs::Permissions::from_mode(mode))
        .map_err(|e| CpError::Chmod {
            path: path.to_path_buf(),
            source: e,
        })
}
