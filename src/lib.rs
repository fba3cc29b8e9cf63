//! # treecp
//!
//! Recursive file and directory copy for programs that need a `cp -r`
//! primitive they can cancel.
//!
//! - **Tree copy**: pre-order walk, parents created before children,
//!   source mode bits carried to every file and directory
//! - **Symlinks**: followed by default, recreated as links with
//!   [`CopyOptions::with_no_follow`]
//! - **Cancellation**: a [`CancelToken`] polled per entry and per buffer
//!   chunk; the in-flight file is removed when the token fires
//! - **Move**: opportunistic `rename`, copy-then-remove otherwise
//! - **Hashing**: any [`HashSink`] sees every byte written
//!
//! ```no_run
//! use treecp::{CancelToken, CopyOptions};
//!
//! let opts = CopyOptions::default()
//!     .with_force(true)
//!     .with_exclude(|p| p.ends_with("target"));
//!
//! treecp::copy(&CancelToken::new(), "project", "backup", &opts)?;
//! # Ok::<(), treecp::CpError>(())
//! ```
//!
//! A directory copy is not atomic. When it fails or is canceled, whatever
//! was copied before stays at the destination.

pub mod cancel;
pub mod copy;
mod dir;
pub mod engine;
pub mod error;
pub mod hash;
mod metadata;
pub mod options;
pub mod plan;
mod progress;
pub mod util;

pub use cancel::CancelToken;
pub use copy::{CopyRequest, copy};
pub use error::{CpError, CpResult, ErrorKind};
pub use hash::HashSink;
pub use options::{CopyOptions, DEFAULT_BUFFER_SIZE};
pub use plan::{Action, TraversalEntry};
