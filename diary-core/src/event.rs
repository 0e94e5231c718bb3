//! Provider-neutral event type.
//!
//! Providers convert their API responses into `Event`s. Timestamps stay in
//! their RFC3339 text form until the writer parses them, so a malformed
//! timestamp is reported against the event it came from.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{DiaryError, DiaryResult, TimeField};

/// A single calendar event instance (recurring events already expanded).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: String,
    /// Empty when the event has no location.
    #[serde(default)]
    pub location: String,
    /// Empty when the event has no description. May span several lines.
    #[serde(default)]
    pub description: String,
    /// RFC3339 start instant
    pub start: String,
    /// RFC3339 end instant
    pub end: String,
}

impl Event {
    /// Name used to refer to the event in error messages and logs.
    pub fn label(&self) -> &str {
        if !self.summary.is_empty() {
            &self.summary
        } else if !self.id.is_empty() {
            &self.id
        } else {
            "(untitled)"
        }
    }

    /// Parse both timestamps, each keeping the offset it was written with.
    pub fn parse_times(&self) -> DiaryResult<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let start = self.parse_field(TimeField::Start, &self.start)?;
        let end = self.parse_field(TimeField::End, &self.end)?;

        if end < start {
            return Err(DiaryError::InvertedRange {
                event: self.label().to_string(),
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }

        Ok((start, end))
    }

    fn parse_field(&self, field: TimeField, value: &str) -> DiaryResult<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(value).map_err(|source| DiaryError::TimestampParse {
            event: self.label().to_string(),
            field,
            value: value.to_string(),
            source,
        })
    }
}
