//! Grouping review scores per talk and averaging them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};
use crate::model::{Review, Submission};
use crate::services::conference_api::{ConferenceApi, parse_reviews};

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Scores given to one talk, keyed by reviewer.
///
/// `None` marks a review whose score was missing or not a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TalkScores {
    pub label: String,
    pub scores: BTreeMap<String, Option<f64>>,
}

impl TalkScores {
    pub fn new(label: impl Into<String>, reviews: impl IntoIterator<Item = Review>) -> Self {
        let scores = reviews.into_iter().map(|r| (r.user, r.score)).collect();
        Self {
            label: label.into(),
            scores,
        }
    }

    /// Numeric score given by `reviewer`, if any.
    pub fn score(&self, reviewer: &str) -> Option<f64> {
        self.scores.get(reviewer).copied().flatten()
    }

    pub fn numeric_scores(&self) -> Vec<f64> {
        self.scores.values().filter_map(|s| *s).collect()
    }

    /// Mean over the numeric scores only, or `None` if there are none.
    pub fn average(&self) -> Option<f64> {
        let numeric = self.numeric_scores();
        (!numeric.is_empty()).then(|| mean(&numeric))
    }
}

/// Talk rows in first-seen order.
#[derive(Debug, Default)]
pub struct ScoreTable {
    rows: Vec<TalkScores>,
    index: HashMap<String, usize>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a talk. A talk with an already known label replaces the old
    /// scores but keeps the old row position.
    pub fn insert(&mut self, talk: TalkScores) {
        match self.index.get(&talk.label) {
            Some(&i) => {
                debug!(label = %talk.label, "Replacing scores for duplicate talk label");
                self.rows[i] = talk;
            }
            None => {
                self.index.insert(talk.label.clone(), self.rows.len());
                self.rows.push(talk);
            }
        }
    }

    pub fn rows(&self) -> &[TalkScores] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every reviewer appearing in any row, sorted.
    pub fn reviewers(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.scores.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Fetches the reviews of every submission and groups them by talk.
///
/// Submissions lacking a code or title, and submissions with any malformed
/// review record, are logged and left out. Transport and API errors abort.
#[tracing::instrument(skip_all, fields(submissions = submissions.len()))]
pub async fn collect_scores<A>(api: &A, submissions: &[Submission]) -> Result<ScoreTable>
where
    A: ConferenceApi + ?Sized,
{
    let mut table = ScoreTable::new();
    let mut skipped = 0usize;

    for submission in submissions {
        let Some(code) = submission.code() else {
            warn!(submission = %submission.as_value(), "Submission without code, skipping");
            skipped += 1;
            continue;
        };

        let label = match submission.label() {
            Ok(label) => label,
            Err(e) => {
                warn!(code, error = %e, "Cannot label submission, skipping");
                skipped += 1;
                continue;
            }
        };

        let records = api.list_reviews(code).await?;
        let reviews = match parse_reviews(&records) {
            Ok(reviews) => reviews,
            Err(e @ ApiError::MalformedReview { .. }) => {
                let payload = serde_json::to_string_pretty(&records)?;
                warn!(code, error = %e, reviews = %payload, "Malformed review, skipping submission");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!(code, reviews = reviews.len(), "Reviews collected");
        table.insert(TalkScores::new(label, reviews));
    }

    info!(talks = table.len(), skipped, "Score collection finished");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(user: &str, score: Option<f64>) -> Review {
        Review {
            user: user.to_string(),
            score,
        }
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mean(&[4.0]), 4.0);
    }

    #[test]
    fn test_average_of_numeric_scores() {
        let talk = TalkScores::new(
            "t",
            [review("a", Some(1.0)), review("b", Some(2.0)), review("c", Some(4.0))],
        );
        assert_eq!(talk.average(), Some(7.0 / 3.0));
    }

    #[test]
    fn test_average_excludes_non_numeric() {
        let talk = TalkScores::new(
            "t",
            [review("a", Some(3.0)), review("b", None), review("c", Some(1.0))],
        );
        assert_eq!(talk.average(), Some(2.0));
        assert_eq!(talk.numeric_scores().len(), 2);
        assert_eq!(talk.score("b"), None);
        assert_eq!(talk.score("zed"), None);
    }

    #[test]
    fn test_average_without_numeric_scores() {
        let talk = TalkScores::new("t", [review("a", None)]);
        assert_eq!(talk.average(), None);
        assert_eq!(TalkScores::new("t", []).average(), None);
    }

    #[test]
    fn test_later_review_by_same_user_wins() {
        let talk = TalkScores::new("t", [review("a", Some(1.0)), review("a", Some(5.0))]);
        assert_eq!(talk.scores.len(), 1);
        assert_eq!(talk.score("a"), Some(5.0));
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = ScoreTable::new();
        table.insert(TalkScores::new("zeta", [review("a", Some(1.0))]));
        table.insert(TalkScores::new("alpha", [review("b", Some(2.0))]));

        let labels: Vec<_> = table.rows().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["zeta", "alpha"]);
    }

    #[test]
    fn test_table_duplicate_label_replaces_in_place() {
        let mut table = ScoreTable::new();
        table.insert(TalkScores::new("one", [review("a", Some(1.0))]));
        table.insert(TalkScores::new("two", [review("b", Some(2.0))]));
        table.insert(TalkScores::new("one", [review("c", Some(3.0))]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].label, "one");
        assert_eq!(table.rows()[0].score("c"), Some(3.0));
        assert_eq!(table.rows()[0].score("a"), None);
        assert_eq!(table.reviewers(), ["b", "c"]);
    }

    #[test]
    fn test_reviewers_sorted_and_include_non_numeric() {
        let mut table = ScoreTable::new();
        table.insert(TalkScores::new("x", [review("mallory", None), review("bob", Some(1.0))]));
        table.insert(TalkScores::new("y", [review("alice", Some(2.0)), review("bob", Some(3.0))]));

        assert_eq!(table.reviewers(), ["alice", "bob", "mallory"]);
    }
}
