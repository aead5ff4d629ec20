use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Category assigned to commits whose first line has no structured header
pub const UNFORMATTED: &str = "unformatted";

/// Category assigned to commits whose body opens with a breaking-change line
pub const BREAK: &str = "break";

/// A commit as supplied by the repository, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Parent hashes, first parent first
    pub parents: Vec<String>,
}

impl RawCommit {
    pub fn new(
        hash: impl Into<String>,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        RawCommit {
            hash: hash.into(),
            timestamp,
            message: message.into(),
            parents: Vec::new(),
        }
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }
}

/// Outcome of matching the first line against the structured header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitKind {
    Structured {
        category: String,
        extra_categories: Vec<String>,
        scope: Option<String>,
        description: String,
    },
    Unformatted {
        description: String,
    },
}

/// A commit after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub first_line: String,
    pub body: String,
    pub kind: CommitKind,
    /// `None` when the body carries no reference line
    pub ticket_refs: Option<BTreeSet<String>>,
}

impl Commit {
    pub fn category(&self) -> &str {
        match &self.kind {
            CommitKind::Structured { category, .. } => category.as_str(),
            CommitKind::Unformatted { .. } => UNFORMATTED,
        }
    }

    pub fn extra_categories(&self) -> &[String] {
        match &self.kind {
            CommitKind::Structured {
                extra_categories, ..
            } => extra_categories.as_slice(),
            CommitKind::Unformatted { .. } => &[],
        }
    }

    pub fn scope(&self) -> Option<&str> {
        match &self.kind {
            CommitKind::Structured { scope, .. } => scope.as_deref(),
            CommitKind::Unformatted { .. } => None,
        }
    }

    pub fn description(&self) -> &str {
        match &self.kind {
            CommitKind::Structured { description, .. } => description.as_str(),
            CommitKind::Unformatted { description } => description.as_str(),
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self.kind, CommitKind::Structured { .. })
    }

    pub fn is_breaking(&self) -> bool {
        self.category() == BREAK
    }
}
