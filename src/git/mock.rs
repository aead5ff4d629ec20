use crate::domain::{RawCommit, TagRecord};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};

/// Mock repository for testing without actual git operations
///
/// Commits form a graph through their `parents` links. Tags and branches map
/// names to commit hashes.
pub struct MockRepository {
    commits: HashMap<String, RawCommit>,
    tags: HashMap<String, String>,
    branch_heads: HashMap<String, String>,
    head_branch: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: HashMap::new(),
            branch_heads: HashMap::new(),
            head_branch: None,
        }
    }

    /// Add a commit to the mock repository
    pub fn add_commit(&mut self, commit: RawCommit) {
        self.commits.insert(commit.hash.clone(), commit);
    }

    /// Commit on top of `branch`, moving its head; returns the new hash
    ///
    /// The first commit on a branch also makes it the HEAD branch if none is set.
    pub fn commit_on(&mut self, branch: &str, hash: &str, secs: i64, message: &str) -> String {
        let parents = self.branch_heads.get(branch).cloned().into_iter().collect();
        let timestamp = Utc.timestamp_opt(secs, 0).single().unwrap_or_default();

        self.add_commit(RawCommit::new(hash, timestamp, message).with_parents(parents));
        self.set_branch_head(branch, hash);
        if self.head_branch.is_none() {
            self.head_branch = Some(branch.to_string());
        }
        hash.to_string()
    }

    /// Add a tag pointing to a commit hash
    pub fn add_tag(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.tags.insert(name.into(), hash.into());
    }

    /// Set a branch head
    pub fn set_branch_head(&mut self, branch: impl Into<String>, hash: impl Into<String>) {
        self.branch_heads.insert(branch.into(), hash.into());
    }

    /// Point HEAD at a branch
    pub fn set_head_branch(&mut self, branch: impl Into<String>) {
        self.head_branch = Some(branch.into());
    }

    fn resolve(&self, name: &str) -> Result<&RawCommit> {
        let hash = self
            .tags
            .get(name)
            .or_else(|| self.branch_heads.get(name))
            .map(String::as_str)
            .unwrap_or(name);

        self.commits
            .get(hash)
            .ok_or_else(|| ChangelogError::reference(format!("Cannot resolve '{}'", name)))
    }

    /// Every commit reachable from `start` through any parent
    fn ancestors(&self, start: &RawCommit) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut pending = vec![start.hash.clone()];

        while let Some(hash) = pending.pop() {
            if !seen.insert(hash.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&hash) {
                pending.extend(commit.parents.iter().cloned());
            }
        }

        seen
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<TagRecord>> {
        self.tags
            .keys()
            .map(|name| Ok(TagRecord::new(name.clone(), self.resolve(name)?.clone())))
            .collect()
    }

    fn first_parent_range(&self, exclude: Option<&str>, include: &str) -> Result<Vec<RawCommit>> {
        let hidden = match exclude {
            Some(name) => self.ancestors(self.resolve(name)?),
            None => HashSet::new(),
        };

        let mut commits = Vec::new();
        let mut current = Some(self.resolve(include)?);

        while let Some(commit) = current {
            if hidden.contains(&commit.hash) {
                break;
            }
            commits.push(commit.clone());
            current = commit
                .parents
                .first()
                .and_then(|parent| self.commits.get(parent));
        }

        Ok(commits)
    }

    fn default_branch(&self) -> Result<String> {
        self.head_branch
            .clone()
            .ok_or_else(|| ChangelogError::configuration("HEAD does not point to a branch"))
    }
}
