use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::domain::{Changelog, Commit, RawCommit, Tag, TagRecord, Unreleased};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;

/// Partitions classified commits into releases
pub struct ReleaseGrouper {
    classifier: Classifier,
    unreleased_title: Option<String>,
}

impl Default for ReleaseGrouper {
    fn default() -> Self {
        ReleaseGrouper::new(Classifier::default())
    }
}

impl ReleaseGrouper {
    /// Create a new release grouper
    pub fn new(classifier: Classifier) -> Self {
        ReleaseGrouper {
            classifier,
            unreleased_title: None,
        }
    }

    /// Create a grouper using the configured ticket prefixes and titles
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifier = Classifier::new(&config.tickets)?;
        Ok(ReleaseGrouper::new(classifier).with_unreleased_title(&config.output.unreleased_title))
    }

    pub fn with_unreleased_title(mut self, title: impl Into<String>) -> Self {
        self.unreleased_title = Some(title.into());
        self
    }

    /// Group already collected commits by release time
    ///
    /// A commit belongs to the earliest tag whose time it does not exceed and
    /// whose predecessor's time it strictly exceeds. Commits newer than the
    /// last tag become the unreleased section. Each tag's anchor commit is
    /// added when missing from `commits`.
    #[instrument(skip_all, fields(tag_count = tags.len(), commit_count = commits.len()))]
    pub fn group_commits(&self, tags: Vec<TagRecord>, commits: Vec<Commit>) -> Result<Changelog> {
        if tags.is_empty() {
            return Err(ChangelogError::not_enough_tags());
        }

        let tags = sorted_by_time(tags);

        let mut pool = commits;
        let mut known: HashSet<String> = pool.iter().map(|c| c.hash.clone()).collect();
        for record in &tags {
            if known.insert(record.anchor.hash.clone()) {
                debug!(tag = %record.name, hash = %record.anchor.hash, "adding tag anchor commit");
                pool.push(self.classifier.classify_raw(&record.anchor));
            }
        }
        pool.sort_by_key(|c| c.timestamp);

        let mut releases = Vec::with_capacity(tags.len());
        let mut previous: Option<DateTime<Utc>> = None;

        for record in &tags {
            let mut tag = Tag::from_record(record);
            let upper = tag.timestamp;

            let (inside, rest): (Vec<Commit>, Vec<Commit>) = pool.into_iter().partition(|c| {
                previous.map_or(true, |lower| lower < c.timestamp) && c.timestamp <= upper
            });
            pool = rest;

            for commit in inside {
                tag.add_commit(commit);
            }

            debug!(tag = %tag.version, commits = tag.commits.len(), "grouped release");
            previous = Some(upper);
            releases.push(tag);
        }

        Ok(self.finish(releases, pool))
    }

    /// Walk the repository tag by tag along first-parent history
    ///
    /// `default_branch` bounds the unreleased range; when `None` the branch
    /// HEAD points to is used.
    #[instrument(skip(self, repo))]
    pub fn traverse<R: Repository>(
        &self,
        repo: &R,
        default_branch: Option<&str>,
    ) -> Result<Changelog> {
        let records = repo.list_tags()?;
        if records.is_empty() {
            return Err(ChangelogError::not_enough_tags());
        }

        let records = sorted_by_time(records);
        let mut releases = Vec::with_capacity(records.len());
        let mut previous: Option<&str> = None;

        for record in &records {
            let mut tag = Tag::from_record(record);

            for commit in self.classify_range(repo, previous, &record.name)? {
                tag.add_commit(commit);
            }

            debug!(tag = %tag.version, commits = tag.commits.len(), "walked release");
            previous = Some(record.name.as_str());
            releases.push(tag);
        }

        let branch = match default_branch {
            Some(branch) => branch.to_string(),
            None => repo.default_branch()?,
        };
        let leftovers = self.classify_range(repo, previous, &branch)?;

        Ok(self.finish(releases, leftovers))
    }

    /// Classify a first-parent range, oldest first
    fn classify_range<R: Repository>(
        &self,
        repo: &R,
        exclude: Option<&str>,
        include: &str,
    ) -> Result<Vec<Commit>> {
        let raw: Vec<RawCommit> = repo.first_parent_range(exclude, include)?;

        Ok(raw
            .iter()
            .rev()
            .map(|commit| self.classifier.classify_raw(commit))
            .collect())
    }

    fn finish(&self, releases: Vec<Tag>, leftovers: Vec<Commit>) -> Changelog {
        let unreleased = if leftovers.is_empty() {
            None
        } else {
            let unreleased = Unreleased::new(leftovers);
            Some(match &self.unreleased_title {
                Some(title) => unreleased.with_display_name(title.clone()),
                None => unreleased,
            })
        };

        let changelog = Changelog::new(releases, unreleased);
        info!(
            releases = changelog.tags.len(),
            unreleased = changelog.unreleased.as_ref().map_or(0, |u| u.commits.len()),
            "grouped commits into releases"
        );
        changelog
    }
}

/// Tags in ascending time, ties broken by name
fn sorted_by_time(mut tags: Vec<TagRecord>) -> Vec<TagRecord> {
    tags.sort_by(|a, b| {
        a.anchor
            .timestamp
            .cmp(&b.anchor.timestamp)
            .then_with(|| a.name.cmp(&b.name))
    });
    tags
}

/// Group commits with the default classifier
pub fn group_commits(tags: Vec<TagRecord>, commits: Vec<Commit>) -> Result<Changelog> {
    ReleaseGrouper::default().group_commits(tags, commits)
}
