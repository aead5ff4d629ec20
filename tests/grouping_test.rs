// tests/grouping_test.rs
use std::collections::HashSet;

use auto_changelog::git::{MockRepository, Repository};
use auto_changelog::{
    classify, group_commits, ChangelogError, Commit, GroupRef, RawCommit, ReleaseGrouper, TagRecord,
};
use chrono::{DateTime, TimeZone, Utc};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn tag(name: &str, hash: &str, secs: i64) -> TagRecord {
    TagRecord::new(name, RawCommit::new(hash, at(secs), "chore: release"))
}

#[test]
fn test_tags_are_visited_in_time_order_regardless_of_input() {
    let tags = vec![
        tag("v3", "t3", 300),
        tag("v1", "t1", 100),
        tag("v2", "t2", 200),
    ];

    let changelog = group_commits(tags, vec![]).unwrap();
    let versions: Vec<_> = changelog.tags.iter().map(|t| t.version.as_str()).collect();
    assert_eq!(versions, vec!["v1", "v2", "v3"]);

    for pair in changelog.tags.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
}

#[test]
fn test_commit_on_tag_time_belongs_to_that_tag() {
    let commits = vec![classify("fix: same second", at(100), "c")];
    let tags = vec![tag("v1", "t1", 100), tag("v2", "t2", 200)];

    let changelog = group_commits(tags, commits).unwrap();
    assert_eq!(changelog.owner_of("c"), Some(&GroupRef::Tag("v1".to_string())));
}

#[test]
fn test_every_commit_lands_in_exactly_one_group() {
    let commits: Vec<Commit> = (0..100)
        .map(|i| classify("feat: work", at((i * 37) % 500), &format!("c{}", i)))
        .collect();
    let tags = vec![tag("v2", "t2", 250), tag("v1", "t1", 120), tag("v3", "t3", 400)];

    let changelog = group_commits(tags, commits).unwrap();

    let mut seen = HashSet::new();
    let groups = changelog
        .tags
        .iter()
        .map(|t| &t.commits)
        .chain(changelog.unreleased.iter().map(|u| &u.commits));
    for commits in groups {
        for commit in commits {
            assert!(seen.insert(commit.hash.clone()), "{} placed twice", commit.hash);
        }
    }

    assert_eq!(seen.len(), 103);
    assert_eq!(changelog.total_commits(), 103);
    for i in 0..100 {
        assert!(seen.contains(&format!("c{}", i)));
    }
}

#[test]
fn test_groups_mirror_commit_lists() {
    let commits = vec![
        classify("feat: a", at(1), "a"),
        classify("fix: b", at(2), "b"),
        classify("note", at(3), "c"),
    ];
    let changelog = group_commits(vec![tag("v1", "t1", 10)], commits).unwrap();

    let release = &changelog.tags[0];
    let grouped: usize = release.groups.values().map(|g| g.len()).sum();
    assert_eq!(grouped, release.commits.len());
    for commit in &release.commits {
        assert!(release.groups[commit.category()]
            .iter()
            .any(|c| c.hash == commit.hash));
    }
}

#[test]
fn test_zero_tags_produces_no_output() {
    let result = group_commits(vec![], vec![classify("feat: a", at(1), "a")]);
    assert!(matches!(result, Err(ChangelogError::Configuration(_))));

    let repo = MockRepository::new();
    let result = ReleaseGrouper::default().traverse(&repo, Some("main"));
    assert!(matches!(result, Err(ChangelogError::Configuration(_))));
}

#[test]
fn test_traverse_follows_first_parent_through_merges() {
    let mut repo = MockRepository::new();
    repo.commit_on("main", "m1", 10, "feat: base");
    repo.add_tag("v1.0.0", "m1");
    repo.set_branch_head("topic", "m1");
    repo.commit_on("topic", "t1", 15, "fix: topic detail");
    repo.commit_on("main", "m2", 20, "docs: notes");
    repo.add_commit(
        RawCommit::new(
            "m3",
            at(30),
            "Merge pull request #7 from me/topic\n\nfix(core): patch leak",
        )
        .with_parents(vec!["m2".to_string(), "t1".to_string()]),
    );
    repo.set_branch_head("main", "m3");
    repo.add_tag("v1.1.0", "m3");

    let changelog = ReleaseGrouper::default().traverse(&repo, None).unwrap();

    let second = changelog.find_tag("v1.1.0").unwrap();
    let hashes: Vec<_> = second.commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(hashes, vec!["m2", "m3"]);
    assert_eq!(second.groups["fix"][0].scope(), Some("core"));
    assert_eq!(changelog.owner_of("t1"), None);
    assert!(changelog.unreleased.is_none());
}

#[test]
fn test_traverse_reports_unknown_branch() {
    let mut repo = MockRepository::new();
    repo.commit_on("main", "m1", 10, "feat: base");
    repo.add_tag("v1", "m1");

    let result = ReleaseGrouper::default().traverse(&repo, Some("gone"));
    assert!(matches!(result, Err(ChangelogError::Reference(_))));
    assert_eq!(repo.list_tags().unwrap().len(), 1);
}
