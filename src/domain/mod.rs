//! Domain logic - the changelog model, independent of git operations

pub mod commit;
pub mod tag;

pub use commit::{Commit, CommitKind, RawCommit, BREAK, UNFORMATTED};
pub use tag::{CategoryGroups, Changelog, GroupRef, Tag, TagRecord, Unreleased};
