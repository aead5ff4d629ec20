//! Grouping engine partitioning commits into releases

pub mod release_grouper;

pub use release_grouper::{group_commits, ReleaseGrouper};
