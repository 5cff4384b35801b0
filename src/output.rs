//! Output formatting and persistence.
//!
//! Submissions go out as indented JSON; score tables as CSV with one
//! column per reviewer.

use csv::Writer;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::Submission;
use crate::stats::ScoreTable;

pub const TITLE_COLUMN: &str = "Talk Title";
pub const AVERAGE_COLUMN: &str = "Average";
pub const DEFAULT_SCORES_FILE: &str = "review_scores.csv";

/// Writes submissions as an indented JSON array followed by a newline.
pub fn write_json<W: Write>(mut writer: W, submissions: &[Submission]) -> Result<()> {
    let values: Vec<&Value> = submissions.iter().map(Submission::as_value).collect();
    serde_json::to_writer_pretty(&mut writer, &values)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Shortest round-trip decimal form, always with a fractional part.
fn format_number(value: f64) -> String {
    format!("{value:?}")
}

/// Writes the score table as CSV.
///
/// Columns are the talk label, every reviewer in sorted order, and the
/// average. Cells for missing or non-numeric scores are left empty, as is
/// the average of a talk without any numeric score.
pub fn write_scores_csv<W: Write>(writer: W, table: &ScoreTable) -> Result<()> {
    let reviewers = table.reviewers();
    let mut csv = Writer::from_writer(writer);

    let mut header = Vec::with_capacity(reviewers.len() + 2);
    header.push(TITLE_COLUMN);
    header.extend(reviewers.iter().map(String::as_str));
    header.push(AVERAGE_COLUMN);
    csv.write_record(&header)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(reviewers.len() + 2);
        record.push(row.label.clone());
        for reviewer in &reviewers {
            record.push(row.score(reviewer).map(format_number).unwrap_or_default());
        }
        record.push(row.average().map(format_number).unwrap_or_default());
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the score table into it.
pub fn write_scores_file(path: impl AsRef<Path>, table: &ScoreTable) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = table.len(), "Writing score table");

    let file = File::create(path)?;
    write_scores_csv(file, table)?;

    info!(path = %path.display(), rows = table.len(), "Score table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Review;
    use crate::stats::TalkScores;
    use serde_json::json;

    fn review(user: &str, score: Option<f64>) -> Review {
        Review {
            user: user.to_string(),
            score,
        }
    }

    fn render(table: &ScoreTable) -> String {
        let mut buf = Vec::new();
        write_scores_csv(&mut buf, table).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3.0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(10.0 / 3.0), "3.3333333333333335");
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = ScoreTable::new();
        assert_eq!(render(&table), "Talk Title,Average\n");
    }

    #[test]
    fn test_scores_layout() {
        let mut table = ScoreTable::new();
        table.insert(TalkScores::new(
            "Talk A – Ada",
            [review("bob", Some(2.0)), review("alice", Some(4.0))],
        ));
        table.insert(TalkScores::new(
            "Talk B – Grace",
            [review("carol", None), review("alice", Some(1.0))],
        ));
        table.insert(TalkScores::new("Talk C", [review("carol", None)]));

        let expected = "\
Talk Title,alice,bob,carol,Average
Talk A – Ada,4.0,2.0,,3.0
Talk B – Grace,1.0,,,1.0
Talk C,,,,
";
        assert_eq!(render(&table), expected);
    }

    #[test]
    fn test_labels_with_commas_are_quoted() {
        let mut table = ScoreTable::new();
        table.insert(TalkScores::new("Hello, world – Ada", [review("a", Some(1.0))]));
        assert!(render(&table).contains("\"Hello, world – Ada\",1.0,1.0"));
    }

    #[test]
    fn test_write_json_is_indented_array() {
        let subs = vec![
            Submission::from_value(json!({"code": "A", "title": "One"})),
            Submission::from_value(json!({"code": "B", "title": "Two"})),
        ];
        let mut buf = Vec::new();
        write_json(&mut buf, &subs).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("[\n"));
        assert!(text.ends_with("]\n"));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[1]["code"], "B");
    }

    #[test]
    fn test_write_scores_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SCORES_FILE);

        let mut table = ScoreTable::new();
        table.insert(TalkScores::new("T", [review("a", Some(5.0))]));
        write_scores_file(&path, &table).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Talk Title,a,Average\nT,5.0,5.0\n");
    }
}
