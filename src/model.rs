//! Typed views over the pretalx submission and review records.
//!
//! Records stay opaque JSON; the accessors pull out only the fields the
//! score export needs, so unknown fields survive a round trip untouched.

use serde_json::Value;
use std::io::Read;

use crate::error::{ApiError, Result};

/// A conference talk proposal as returned by `/submissions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission(Value);

impl Submission {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn code(&self) -> Option<&str> {
        self.0.get("code").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Name of the first listed speaker.
    pub fn first_speaker(&self) -> Option<&str> {
        self.0
            .get("speakers")?
            .as_array()?
            .first()?
            .get("name")?
            .as_str()
    }

    /// English name of the submission's track.
    pub fn track_name(&self) -> Option<&str> {
        track_name(&self.0)
    }

    pub fn matches_track(&self, filter: &str) -> bool {
        track_matches(&self.0, filter)
    }

    /// Row label used in the score table: `"<title> – <first speaker>"`.
    pub fn label(&self) -> Result<String> {
        let title = self
            .title()
            .ok_or(ApiError::MissingSubmissionField { field: "title" })?;
        Ok(match self.first_speaker() {
            Some(speaker) => format!("{title} – {speaker}"),
            None => title.to_string(),
        })
    }
}

fn track_name(record: &Value) -> Option<&str> {
    record.get("track")?.get("en")?.as_str()
}

/// Whether a raw submission record belongs to a track whose name contains
/// `filter`. An empty filter matches everything; a record without a track
/// matches only the empty filter.
pub fn track_matches(record: &Value, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    track_name(record).is_some_and(|name| name.contains(filter))
}

/// A single reviewer's verdict on a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub user: String,
    pub score: Option<f64>,
}

impl Review {
    /// Both `user` and `score` must be present; `score` may still be null
    /// or non-numeric, in which case it parses to `None`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let user = value
            .get("user")
            .ok_or(ApiError::MalformedReview { field: "user" })?;
        let score = value
            .get("score")
            .ok_or(ApiError::MalformedReview { field: "score" })?;

        let user = match user {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        Ok(Self {
            user,
            score: parse_score(score),
        })
    }
}

/// Numeric value of a review score.
///
/// pretalx serialises decimal scores as strings (`"2.00"`), so numeric
/// strings count as well. Anything else, including NaN and infinities,
/// yields `None`.
pub fn parse_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    score.is_finite().then_some(score)
}

/// Reads submissions from JSON: either a bare array (as written by the
/// `submissions` command) or a raw API page with a `results` list.
pub fn load_submissions<R: Read>(reader: R) -> Result<Vec<Submission>> {
    let value: Value = serde_json::from_reader(reader)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut page) => match page.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ApiError::MissingResults {
                    url: "<input>".to_string(),
                });
            }
        },
        _ => {
            return Err(ApiError::MissingResults {
                url: "<input>".to_string(),
            });
        }
    };
    Ok(items.into_iter().map(Submission::from_value).collect())
}
