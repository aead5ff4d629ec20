//! Commit classification.
//!
//! Turns a raw commit message into a [Commit]: the structured header
//! `type[,type...][(scope)]: description` gives the category, a body opening
//! with a `BREAKING` line recategorizes it as `break`, and a trailing
//! `ref: TPD-123` line yields ticket references.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use crate::config::TicketConfig;
use crate::domain::{Commit, CommitKind, RawCommit, BREAK};
use crate::error::Result;

const MERGE_PREFIX: &str = "Merge pull request";
const BREAKING_MARKER: &str = "BREAKING";

lazy_static! {
    static ref HEADER_REGEX: Regex =
        Regex::new(r"^(\w+(?:\s*,\s*\w+)*)(\([^)]*\))?:\s*(.*)$").unwrap();
    static ref DEFAULT_TICKETS: TicketPatterns =
        TicketPatterns::new(&TicketConfig::default().prefixes)
            .unwrap()
            .unwrap();
}

#[derive(Debug, Clone)]
struct TicketPatterns {
    marker: Regex,
    id: Regex,
}

impl TicketPatterns {
    /// Returns `None` when no prefixes are configured
    fn new(prefixes: &[String]) -> Result<Option<Self>> {
        if prefixes.is_empty() {
            return Ok(None);
        }

        let alternation = prefixes
            .iter()
            .map(|p| regex::escape(p.trim()))
            .collect::<Vec<_>>()
            .join("|");

        let marker = Regex::new(&format!(r"(?i)ref[:. ]\s*(?:{})-\d+", alternation))?;
        let id = Regex::new(&format!(r"(?i)(?:{})-\d+", alternation))?;

        Ok(Some(TicketPatterns { marker, id }))
    }

    fn extract(&self, line: &str) -> Option<BTreeSet<String>> {
        if !self.marker.is_match(line) {
            return None;
        }

        Some(
            self.id
                .find_iter(line)
                .map(|m| m.as_str().to_string())
                .collect(),
        )
    }
}

/// Classifies commit messages into categories
#[derive(Debug, Clone)]
pub struct Classifier {
    tickets: Option<TicketPatterns>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            tickets: Some(DEFAULT_TICKETS.clone()),
        }
    }
}

impl Classifier {
    /// Create a classifier recognizing the configured ticket prefixes
    pub fn new(tickets: &TicketConfig) -> Result<Self> {
        Ok(Classifier {
            tickets: TicketPatterns::new(&tickets.prefixes)?,
        })
    }

    pub fn classify_raw(&self, raw: &RawCommit) -> Commit {
        self.classify(&raw.message, raw.timestamp, &raw.hash)
    }

    /// Classify one commit message. Never fails: messages without a structured
    /// header become `unformatted`.
    pub fn classify(&self, message: &str, timestamp: DateTime<Utc>, hash: &str) -> Commit {
        let (mut first_line, mut body) = split_message(message);

        if first_line.starts_with(MERGE_PREFIX) && !body.is_empty() {
            (first_line, body) = split_message(&body);
        }

        // Read before a leading BREAKING line is dropped from the body.
        let ticket_refs = match (&self.tickets, last_non_empty_line(&body)) {
            (Some(tickets), Some(line)) => tickets.extract(line),
            _ => None,
        };

        let kind = match HEADER_REGEX.captures(&first_line) {
            Some(captures) => {
                let categories: Vec<String> = captures
                    .get(1)
                    .map(|m| m.as_str())
                    .unwrap_or_default()
                    .split(',')
                    .map(|c| c.trim().to_lowercase())
                    .collect();

                let scope = captures.get(2).map(|m| {
                    let s = m.as_str();
                    s[1..s.len() - 1].to_string()
                });

                let description = captures
                    .get(3)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();

                let opens_with_breaking = body
                    .lines()
                    .next()
                    .is_some_and(|line| line.contains(BREAKING_MARKER));

                let (category, extra_categories) = if opens_with_breaking {
                    body = remainder(&body);
                    (BREAK.to_string(), categories)
                } else {
                    let mut tokens = categories.into_iter();
                    let category = tokens.next().unwrap_or_default();
                    (category, tokens.collect())
                };

                CommitKind::Structured {
                    category,
                    extra_categories,
                    scope,
                    description,
                }
            }
            None => CommitKind::Unformatted {
                description: first_line.clone(),
            },
        };

        Commit {
            hash: hash.to_string(),
            timestamp,
            first_line,
            body,
            kind,
            ticket_refs,
        }
    }
}

/// Classify with the default ticket prefixes
pub fn classify(message: &str, timestamp: DateTime<Utc>, hash: &str) -> Commit {
    Classifier::default().classify(message, timestamp, hash)
}

/// Trimmed first line and trimmed remainder
fn split_message(message: &str) -> (String, String) {
    let first_line = message.lines().next().unwrap_or_default().trim().to_string();
    (first_line, remainder(message))
}

/// Everything after the first line, trimmed
fn remainder(text: &str) -> String {
    text.lines().skip(1).collect::<Vec<_>>().join("\n").trim().to_string()
}

fn last_non_empty_line(body: &str) -> Option<&str> {
    body.lines().rev().find(|line| !line.trim().is_empty())
}
