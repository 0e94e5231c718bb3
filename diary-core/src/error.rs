//! Error types for gcal2diary.

use std::fmt;

use thiserror::Error;

/// Which timestamp of an event an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeField::Start => write!(f, "start"),
            TimeField::End => write!(f, "end"),
        }
    }
}

/// Errors that can occur while turning events into diary entries.
#[derive(Error, Debug)]
pub enum DiaryError {
    #[error("Failed to parse {field} time '{value}' of event '{event}': {source}")]
    TimestampParse {
        event: String,
        field: TimeField,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Event '{event}' ends ({end}) before it starts ({start})")]
    InvertedRange {
        event: String,
        start: String,
        end: String,
    },

    #[error("Invalid date style '{0}'. iso, us, and eu are supported")]
    UnknownDateStyle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write diary entry: {0}")]
    SinkWrite(#[from] std::io::Error),

    #[error("Event source error: {0}")]
    Provider(String),
}

impl DiaryError {
    /// True when the error only concerns the event being written, so the
    /// caller may skip that event and carry on with the next one.
    pub fn is_event_local(&self) -> bool {
        matches!(
            self,
            DiaryError::TimestampParse { .. } | DiaryError::InvertedRange { .. }
        )
    }
}

/// Result type alias for diary operations.
pub type DiaryResult<T> = Result<T, DiaryError>;
