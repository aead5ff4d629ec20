pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod ui;

pub use analyzer::{group_commits, ReleaseGrouper};
pub use classifier::{classify, Classifier};
pub use domain::{Changelog, Commit, CommitKind, GroupRef, RawCommit, Tag, TagRecord, Unreleased};
pub use error::{ChangelogError, Result};
