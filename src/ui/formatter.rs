//! Pure formatting functions for UI output.
//!
//! The `format_*` functions build strings and are tested directly; the
//! `display_*` functions print them.

use console::style;

use crate::domain::{CategoryGroups, Changelog, UNFORMATTED};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Category counts in category order, e.g. `feat: 2, fix: 1`.
pub fn format_groups(groups: &CategoryGroups) -> String {
    groups
        .iter()
        .map(|(category, commits)| format!("{}: {}", category, commits.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One summary line for a release section.
pub fn format_release_line(name: &str, commit_count: usize, groups: &CategoryGroups) -> String {
    let noun = if commit_count == 1 { "commit" } else { "commits" };
    format!("{} ({} {}) {}", name, commit_count, noun, format_groups(groups))
}

/// Display every release, newest first, followed by the unreleased section.
///
/// Warns about unformatted commits so they can be reworded before release.
pub fn display_changelog_summary(changelog: &Changelog) {
    if let Some(unreleased) = &changelog.unreleased {
        println!(
            "  {}",
            style(format_release_line(
                &unreleased.display_name,
                unreleased.commits.len(),
                &unreleased.groups,
            ))
            .cyan()
        );
    }

    for tag in changelog.tags.iter().rev() {
        println!(
            "  {}",
            format_release_line(&tag.display_name, tag.commits.len(), &tag.groups)
        );
    }

    let unformatted: usize = changelog
        .tags
        .iter()
        .map(|tag| &tag.groups)
        .chain(changelog.unreleased.iter().map(|u| &u.groups))
        .filter_map(|groups| groups.get(UNFORMATTED))
        .map(|commits| commits.len())
        .sum();

    if unformatted > 0 {
        eprintln!(
            "{} {} of {} commits are unformatted",
            style("⚠ WARNING:").yellow(),
            unformatted,
            changelog.total_commits()
        );
    }
}
