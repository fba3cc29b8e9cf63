//! Shared test harness: fixtures, readers and a cancel-on-demand hash sink.
//!
//! - **Factory**: `treecp()` creates a pre-configured Command
//! - **Fixture**: `Env` wraps TempDir with convenience builders
//! - **Probe**: `CancelAfterBytes` cancels a token once enough bytes were copied
#![allow(dead_code)]

pub use assert_cmd::Command;
pub use predicates;

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use treecp::{CancelToken, HashSink};

// ─── Test environment (Fixture pattern) ──────────────────────────────────────

/// Lightweight test fixture wrapping a temporary directory.
/// All paths are relative to the temp root; parent dirs are created on demand.
pub struct Env(TempDir);

impl Env {
    #[inline]
    pub fn new() -> Self {
        Self(TempDir::new().unwrap())
    }

    #[inline]
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Resolve a relative path under the temp root.
    #[inline]
    pub fn p(&self, rel: &str) -> PathBuf {
        self.0.path().join(rel)
    }

    /// Same as `p`, keeping a trailing slash (directory-style destination).
    pub fn p_slash(&self, rel: &str) -> PathBuf {
        PathBuf::from(format!("{}/", self.p(rel).display()))
    }

    #[inline]
    fn ensure_parent(p: &Path) {
        if let Some(parent) = p.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).unwrap();
            }
        }
    }

    /// Create a file with arbitrary content. Auto-creates parent dirs.
    pub fn file(&self, rel: &str, data: impl AsRef<[u8]>) -> PathBuf {
        let p = self.p(rel);
        Self::ensure_parent(&p);
        fs::write(&p, data).unwrap();
        p
    }

    /// Create a file with content and explicit mode.
    pub fn file_mode(&self, rel: &str, data: impl AsRef<[u8]>, mode: u32) -> PathBuf {
        let p = self.file(rel, data);
        fs::set_permissions(&p, fs::Permissions::from_mode(mode)).unwrap();
        p
    }

    /// Create a directory tree (recursive). Returns the leaf path.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let p = self.p(rel);
        fs::create_dir_all(&p).unwrap();
        p
    }

    /// Create a symbolic link. `target` is the link's target value (relative or absolute).
    pub fn symlink(&self, target: impl AsRef<Path>, rel: &str) -> PathBuf {
        let p = self.p(rel);
        Self::ensure_parent(&p);
        std::os::unix::fs::symlink(target.as_ref(), &p).unwrap();
        p
    }

    /// Set permissions (chmod).
    pub fn chmod(&self, rel: &str, mode: u32) {
        fs::set_permissions(self.p(rel), fs::Permissions::from_mode(mode)).unwrap();
    }

    /// The `A/x.txt` + `A/sub/y.txt` tree used by the walk tests.
    pub fn sample_tree(&self, root: &str) -> PathBuf {
        self.file(&format!("{root}/x.txt"), "hello");
        self.file(&format!("{root}/sub/y.txt"), "world");
        self.p(root)
    }
}

// ─── Command factory ─────────────────────────────────────────────────────────

/// Create a pre-configured `treecp` Command ready for `.arg()` chaining.
#[inline]
#[allow(deprecated)]
pub fn treecp() -> Command {
    let mut cmd = Command::cargo_bin("treecp").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("TREECP_BUFFER_SIZE");
    cmd
}

// ─── Cancelling hash sink ──────────────────────────────────────────────────────

/// Hash sink that cancels `token` once `limit` bytes have gone through it.
pub struct CancelAfterBytes {
    pub token: CancelToken,
    pub limit: u64,
    pub seen: u64,
}

impl CancelAfterBytes {
    pub fn new(token: &CancelToken, limit: u64) -> Self {
        Self {
            token: token.clone(),
            limit,
            seen: 0,
        }
    }
}

impl HashSink for CancelAfterBytes {
    fn update(&mut self, bytes: &[u8]) {
        self.seen += bytes.len() as u64;
        if self.seen >= self.limit {
            self.token.cancel();
        }
    }

    fn reset(&mut self) {
        self.seen = 0;
    }
}

// ─── Zero-cost reader helpers ────────────────────────────────────────────────

#[inline]
pub fn content(p: &Path) -> String {
    fs::read_to_string(p).unwrap()
}

#[inline]
pub fn bytes(p: &Path) -> Vec<u8> {
    fs::read(p).unwrap()
}

#[inline]
pub fn mode(p: &Path) -> u32 {
    fs::metadata(p).unwrap().mode() & 0o7777
}

#[inline]
pub fn ino(p: &Path) -> u64 {
    fs::metadata(p).unwrap().ino()
}

#[inline]
pub fn is_symlink(p: &Path) -> bool {
    p.symlink_metadata().unwrap().file_type().is_symlink()
}

#[inline]
pub fn exists(p: &Path) -> bool {
    p.symlink_metadata().is_ok()
}

#[inline]
pub fn link_target(p: &Path) -> PathBuf {
    fs::read_link(p).unwrap()
}

#[inline]
pub fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[inline]
pub fn file_size(p: &Path) -> u64 {
    fs::metadata(p).unwrap().len()
}

/// Deterministic, non-repeating-looking payload of `len` bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Whether the tests run with root privileges (permission checks are moot).
pub fn is_root() -> bool {
    fs::metadata("/proc/self")
        .map(|m| m.uid() == 0)
        .unwrap_or(false)
}
