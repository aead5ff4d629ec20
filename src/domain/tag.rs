use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use super::commit::{Commit, RawCommit};

/// Commits of one release keyed by category, each list in insertion order
pub type CategoryGroups = BTreeMap<String, Vec<Commit>>;

/// A tag as listed by the repository, with the commit it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub name: String,
    pub anchor: RawCommit,
}

impl TagRecord {
    pub fn new(name: impl Into<String>, anchor: RawCommit) -> Self {
        TagRecord {
            name: name.into(),
            anchor,
        }
    }
}

/// A release point and the commits it introduced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub display_name: String,
    /// Raw tag name
    pub version: String,
    pub anchor_commit_hash: String,
    pub timestamp: DateTime<Utc>,
    pub commits: Vec<Commit>,
    pub groups: CategoryGroups,
}

impl Tag {
    /// Create an empty release anchored on `anchor`
    pub fn new(name: impl Into<String>, anchor: &RawCommit) -> Self {
        let version = name.into();
        Tag {
            display_name: display_name(&version),
            version,
            anchor_commit_hash: anchor.hash.clone(),
            timestamp: anchor.timestamp,
            commits: Vec::new(),
            groups: CategoryGroups::new(),
        }
    }

    pub fn from_record(record: &TagRecord) -> Self {
        Tag::new(record.name.clone(), &record.anchor)
    }

    /// Append a commit and file it under its category
    pub fn add_commit(&mut self, commit: Commit) {
        file_commit(&mut self.groups, &commit);
        self.commits.push(commit);
    }
}

/// Human label for a tag: names already starting with `v` are kept as is
fn display_name(version: &str) -> String {
    if version.to_lowercase().starts_with('v') {
        version.to_string()
    } else {
        format!("Version {}", version)
    }
}

fn file_commit(groups: &mut CategoryGroups, commit: &Commit) {
    groups
        .entry(commit.category().to_string())
        .or_default()
        .push(commit.clone());
}

/// Commits newer than the latest tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unreleased {
    pub display_name: String,
    pub commits: Vec<Commit>,
    pub groups: CategoryGroups,
}

impl Unreleased {
    pub fn new(commits: Vec<Commit>) -> Self {
        let mut groups = CategoryGroups::new();
        for commit in &commits {
            file_commit(&mut groups, commit);
        }

        Unreleased {
            display_name: "Unreleased".to_string(),
            commits,
            groups,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

/// The group a commit was placed in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupRef {
    /// Raw tag name
    Tag(String),
    Unreleased,
}

/// Release-grouped commits, tags ordered oldest to newest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    pub tags: Vec<Tag>,
    pub unreleased: Option<Unreleased>,
    owners: HashMap<String, GroupRef>,
}

impl Changelog {
    /// Build a changelog, recording which group owns each commit
    pub fn new(tags: Vec<Tag>, unreleased: Option<Unreleased>) -> Self {
        let mut owners = HashMap::new();
        for tag in &tags {
            for commit in &tag.commits {
                owners.insert(commit.hash.clone(), GroupRef::Tag(tag.version.clone()));
            }
        }
        if let Some(unreleased) = &unreleased {
            for commit in &unreleased.commits {
                owners.insert(commit.hash.clone(), GroupRef::Unreleased);
            }
        }

        Changelog {
            tags,
            unreleased,
            owners,
        }
    }

    pub fn owner_of(&self, hash: &str) -> Option<&GroupRef> {
        self.owners.get(hash)
    }

    /// Owning group of every grouped commit, keyed by hash
    pub fn owners(&self) -> &HashMap<String, GroupRef> {
        &self.owners
    }

    pub fn latest_tag(&self) -> Option<&Tag> {
        self.tags.last()
    }

    pub fn find_tag(&self, version: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.version == version)
    }

    pub fn total_commits(&self) -> usize {
        let released: usize = self.tags.iter().map(|tag| tag.commits.len()).sum();
        released + self.unreleased.as_ref().map_or(0, |u| u.commits.len())
    }
}
