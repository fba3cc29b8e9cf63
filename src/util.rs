use std::env;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};

/// A path after symlink resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Absolute, lexically clean, symlink-free (when the input was a link).
    pub path: PathBuf,
    /// Whether the input path itself was a symbolic link.
    pub was_symlink: bool,
}

/// Resolve `path` to an absolute path, dereferencing it when it is a symlink.
///
/// Only the input itself is inspected with `lstat`: a link is canonicalized
/// (every link along the way is followed), any other path is made absolute
/// and cleaned without touching the filesystem further.
pub fn resolve(path: &Path) -> io::Result<Resolved> {
    let meta = fs::symlink_metadata(path)?;

    if meta.file_type().is_symlink() {
        return Ok(Resolved {
            path: fs::canonicalize(path)?,
            was_symlink: true,
        });
    }

    Ok(Resolved {
        path: absolute(path)?,
        was_symlink: false,
    })
}

/// Make `path` absolute against the current directory and clean it.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(clean_path(path))
    } else {
        Ok(clean_path(&env::current_dir()?.join(path)))
    }
}

/// Lexically drop `.` components and pop on `..`. Never goes above the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        if path.has_root() {
            out.push("/");
        } else {
            out.push(".");
        }
    }

    out
}

/// Check if two paths refer to the same file (same device + inode).
pub fn is_same_file(src: &Path, dst: &Path) -> bool {
    same_file::is_same_file(src, dst).unwrap_or(false)
}

/// True when `dst` names a directory by its spelling alone: a trailing
/// separator, or no final file name (`.`, `..`, `/`).
pub fn is_dir_style(dst: &Path) -> bool {
    let raw = dst.as_os_str().as_bytes();
    if raw.ends_with(b"/") || raw.ends_with(b"/.") || raw == b"." {
        return true;
    }
    dst.file_name().is_none()
}

/// Destination root for a directory source: `dst` itself for content-only
/// copies, `dst/<base>` otherwise.
pub fn dir_dest_path(src: &Path, dst: &Path, content_only: bool) -> PathBuf {
    if content_only {
        return dst.to_path_buf();
    }
    match src.file_name() {
        Some(name) => dst.join(name),
        None => dst.to_path_buf(),
    }
}

/// Destination for a file or symlink source: `dst/<base>` when `dst` names a
/// directory, `dst` otherwise.
pub fn file_dest_path(src: &Path, dst: &Path, dst_is_dir: bool) -> PathBuf {
    if dst_is_dir || is_dir_style(dst) {
        match src.file_name() {
            Some(name) => dst.join(name),
            None => dst.to_path_buf(),
        }
    } else {
        dst.to_path_buf()
    }
}

/// Remove whatever sits at `path`: a directory tree, a file or a link.
pub fn remove_any(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
