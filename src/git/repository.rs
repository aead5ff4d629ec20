use chrono::{TimeZone, Utc};
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

use crate::domain::{RawCommit, TagRecord};
use crate::error::{ChangelogError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn resolve_commit(&self, name: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(name)
            .map_err(|e| ChangelogError::reference(format!("Cannot resolve '{}': {}", name, e)))?;

        let commit = object.peel_to_commit().map_err(|e| {
            ChangelogError::reference(format!("'{}' does not point to a commit: {}", name, e))
        })?;

        Ok(commit.id())
    }

    fn raw_commit(&self, oid: Oid) -> Result<RawCommit> {
        let commit = self.repo.find_commit(oid)?;

        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .ok_or_else(|| {
                ChangelogError::reference(format!("Commit {} has an invalid timestamp", oid))
            })?;

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let parents = commit.parent_ids().map(|id| id.to_string()).collect();

        Ok(RawCommit::new(oid.to_string(), timestamp, message).with_parents(parents))
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<TagRecord>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            // Tags pointing at trees or blobs have no place in the history.
            match reference.peel_to_commit() {
                Ok(commit) => tags.push(TagRecord::new(name, self.raw_commit(commit.id())?)),
                Err(e) => debug!(tag = name, error = %e, "skipping tag without a commit"),
            }
        }

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    fn first_parent_range(&self, exclude: Option<&str>, include: &str) -> Result<Vec<RawCommit>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.simplify_first_parent()?;
        revwalk.push(self.resolve_commit(include)?)?;

        if let Some(exclude) = exclude {
            revwalk.hide(self.resolve_commit(exclude)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            commits.push(self.raw_commit(oid?)?);
        }

        debug!(?exclude, include, count = commits.len(), "walked first-parent range");
        Ok(commits)
    }

    fn default_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Err(ChangelogError::configuration(
                "HEAD is detached; set repository.default_branch",
            ));
        }

        head.shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| ChangelogError::reference("HEAD branch name is not valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::git::Repository;
    use git2::Signature;
    use tempfile::TempDir;

    fn commit_at(repo: &Git2Repo, message: &str, secs: i64) -> Oid {
        let sig = Signature::new("Test", "test@example.com", &git2::Time::new(secs, 0)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_list_tags_and_ranges() {
        let temp = TempDir::new().unwrap();
        let repo = Git2Repo::init(temp.path()).unwrap();

        let first = commit_at(&repo, "feat: first", 1_000);
        repo.tag_lightweight("v0.1.0", &repo.find_object(first, None).unwrap(), false)
            .unwrap();
        commit_at(&repo, "fix: second", 2_000);

        let wrapped = Git2Repository::from_git2(repo);
        let tags = wrapped.list_tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v0.1.0");
        assert_eq!(tags[0].anchor.hash, first.to_string());
        assert_eq!(tags[0].anchor.timestamp.timestamp(), 1_000);

        let branch = wrapped.default_branch().unwrap();
        let unreleased = wrapped.first_parent_range(Some("v0.1.0"), &branch).unwrap();
        assert_eq!(unreleased.len(), 1);
        assert_eq!(unreleased[0].message, "fix: second");

        let everything = wrapped.first_parent_range(None, &branch).unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn test_non_utf8_message_is_decoded_lossily() {
        let temp = TempDir::new().unwrap();
        let repo = Git2Repo::init(temp.path()).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();

        let mut object = format!(
            "tree {}\nauthor Test <t@e> 1000 +0000\ncommitter Test <t@e> 1000 +0000\n\n",
            tree_id
        )
        .into_bytes();
        object.extend_from_slice(b"feat(caf\xe9): add thing\n");
        let oid = repo.odb().unwrap().write(git2::ObjectType::Commit, &object).unwrap();
        repo.tag_lightweight("v1", &repo.find_object(oid, None).unwrap(), false)
            .unwrap();

        let wrapped = Git2Repository::from_git2(repo);
        let tags = wrapped.list_tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert!(tags[0].anchor.message.contains("caf\u{FFFD}"));

        let commit = Classifier::default().classify_raw(&tags[0].anchor);
        assert_eq!(commit.category(), "feat");
        assert_eq!(commit.description(), "add thing");
    }

    #[test]
    fn test_unknown_name_is_reference_error() {
        let temp = TempDir::new().unwrap();
        let repo = Git2Repo::init(temp.path()).unwrap();
        commit_at(&repo, "init", 1_000);

        let wrapped = Git2Repository::from_git2(repo);
        let err = wrapped.first_parent_range(None, "no-such-tag").unwrap_err();
        assert!(matches!(err, ChangelogError::Reference(_)));
    }
}
