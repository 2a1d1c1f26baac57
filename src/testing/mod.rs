//! Testing infrastructure for pilot.
//!
//! - **Mocks**: [`MockFileStore`], an in-memory [`FileStore`](crate::store::FileStore)
//!   with failure injection
//! - **Fixtures**: temporary project trees on disk (test-only)
//!
//! # Example
//!
//! ```rust,ignore
//! use pilot::testing::{MockFileStore, TestFixture};
//!
//! let store = MockFileStore::new()
//!     .with_file("/p/tasks.md", "## Backlog\n- [ ] A\n")
//!     .with_unreadable("/p/STATUS.md");
//!
//! let fixture = TestFixture::sample_project();
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod mocks;

#[cfg(test)]
pub use fixtures::*;
pub use mocks::*;
