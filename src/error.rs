use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`CpError`], for callers that branch on the
/// failure mode rather than on the failing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    SameLocation,
    AlreadyExists,
    CopyIntoSelf,
    Canceled,
    Io,
}

#[derive(Error, Debug)]
pub enum CpError {
    #[error("cannot stat '{path}': No such file or directory")]
    NotFound { path: PathBuf },

    #[error("'{src}' and '{dst}' are the same file")]
    SameFile { src: PathBuf, dst: PathBuf },

    #[error("'{path}' already exists")]
    AlreadyExists { path: PathBuf },

    #[error("cannot copy a directory, '{path}', into itself, '{dest}'")]
    CopyIntoSelf { path: PathBuf, dest: PathBuf },

    #[error("operation canceled")]
    Canceled,

    #[error("cannot stat '{path}': {source}")]
    Stat { path: PathBuf, source: io::Error },

    #[error("cannot open '{path}' for reading: {source}")]
    OpenRead { path: PathBuf, source: io::Error },

    #[error("cannot create regular file '{path}': {source}")]
    CreateFile { path: PathBuf, source: io::Error },

    #[error("cannot create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to read from '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write to '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to preserve permissions of '{path}': {source}")]
    Chmod { path: PathBuf, source: io::Error },

    #[error("cannot create symbolic link '{dst}': {source}")]
    Symlink { dst: PathBuf, source: io::Error },

    #[error("cannot read symbolic link '{path}': {source}")]
    ReadLink { path: PathBuf, source: io::Error },

    #[error("cannot remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("cannot traverse '{path}': {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Several failures from one step, in the order they happened
    /// (e.g. a cancellation followed by a failed cleanup).
    #[error("{}", join_causes(.0))]
    Chain(Vec<CpError>),
}

fn join_causes(causes: &[CpError]) -> String {
    causes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

impl CpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CpError::NotFound { .. } => ErrorKind::NotFound,
            CpError::SameFile { .. } => ErrorKind::SameLocation,
            CpError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            CpError::CopyIntoSelf { .. } => ErrorKind::CopyIntoSelf,
            CpError::Canceled => ErrorKind::Canceled,
            CpError::Chain(causes) => causes.first().map_or(ErrorKind::Io, CpError::kind),
            CpError::Walk { source, .. } => match source.io_error() {
                Some(e) if e.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::Io,
            },
            other => match other.io_source() {
                Some(e) if e.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::Io,
            },
        }
    }

    /// True when this error, or any error chained with it, is a cancellation.
    pub fn is_canceled(&self) -> bool {
        match self {
            CpError::Canceled => true,
            CpError::Chain(causes) => causes.iter().any(CpError::is_canceled),
            _ => false,
        }
    }

    /// The individual causes, in order. A plain error is its own only cause.
    pub fn causes(&self) -> Vec<&CpError> {
        match self {
            CpError::Chain(causes) => causes.iter().flat_map(CpError::causes).collect(),
            other => vec![other],
        }
    }

    /// Pair a primary failure with a secondary one (usually cleanup).
    pub fn chain(primary: CpError, secondary: CpError) -> CpError {
        let mut causes = match primary {
            CpError::Chain(causes) => causes,
            other => vec![other],
        };
        causes.push(secondary);
        CpError::Chain(causes)
    }

    fn io_source(&self) -> Option<&io::Error> {
        match self {
            CpError::Stat { source, .. }
            | CpError::OpenRead { source, .. }
            | CpError::CreateFile { source, .. }
            | CpError::CreateDir { source, .. }
            | CpError::Read { source, .. }
            | CpError::Write { source, .. }
            | CpError::Chmod { source, .. }
            | CpError::Symlink { source, .. }
            | CpError::ReadLink { source, .. }
            | CpError::Remove { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type CpResult<T> = Result<T, CpError>;
