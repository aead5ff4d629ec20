//! Repository-access abstraction layer
//!
//! This module provides a trait-based abstraction over the history queries the
//! release grouper needs, allowing for real Git repositories and in-memory
//! mock repositories for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use auto_changelog::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let tags = repo.list_tags()?;
//! let branch = repo.default_branch()?;
//! let unreleased = repo.first_parent_range(tags.first().map(|t| t.name.as_str()), &branch)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{RawCommit, TagRecord};
use crate::error::Result;

/// History queries the changelog is built from
///
/// ## Thread Safety
///
/// Implementors must be `Send` so a repository can be moved to another
/// thread. They are not required to be `Sync`: libgit2 handles must not be
/// used from two threads at once.
///
/// ## Error Handling
///
/// Implementations map underlying errors (like `git2::Error`) to the
/// appropriate [crate::error::ChangelogError] variants. Names that cannot be
/// resolved are reported as [crate::error::ChangelogError::Reference].
pub trait Repository: Send {
    /// List every tag together with the commit it points to
    ///
    /// Annotated tags are peeled to their target commit. Order is unspecified.
    fn list_tags(&self) -> Result<Vec<TagRecord>>;

    /// Commits reachable from `include` but not from `exclude`
    ///
    /// Only first parents are followed from `include`. With `exclude` set to
    /// `None` the whole first-parent history of `include` is returned.
    /// Both arguments are tag or branch names.
    ///
    /// # Returns
    /// * `Ok(Vec<RawCommit>)` - Commits, newest first
    /// * `Err` - If either name cannot be resolved or if there's a Git error
    fn first_parent_range(&self, exclude: Option<&str>, include: &str) -> Result<Vec<RawCommit>>;

    /// Name of the branch HEAD points to
    fn default_branch(&self) -> Result<String>;
}
