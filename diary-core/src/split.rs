//! Splitting an event interval into per-day sub-ranges.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::format;

/// One end of a day's portion of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockLabel {
    Time(NaiveTime),
    /// Runs through midnight into the next day, rendered as `24:00`.
    Midnight,
}

impl fmt::Display for ClockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockLabel::Time(t) => f.write_str(&format::clock(t)),
            ClockLabel::Midnight => f.write_str("24:00"),
        }
    }
}

/// The part of an event that falls on a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySubRange {
    pub day: NaiveDate,
    pub start: ClockLabel,
    pub end: ClockLabel,
}

/// Cut `[start, end)` at every midnight in `start`'s offset.
///
/// Returns at least one sub-range, ordered by day. Every sub-range but the
/// last ends at `24:00` and every sub-range but the first starts at `00:00`.
/// An `end` lying exactly on a midnight does not open an empty final day.
///
/// The final day and its end label are read in `end`'s own offset, so an
/// event crossing a DST change keeps the wall-clock end it was given.
pub fn split_days(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Vec<DaySubRange> {
    let offset = *start.offset();
    let end_day = end.date_naive();

    let mut ranges = Vec::new();
    let mut cursor = start;

    loop {
        let day = cursor.date_naive();

        if day >= end_day {
            ranges.push(DaySubRange {
                day,
                start: ClockLabel::Time(cursor.time()),
                end: ClockLabel::Time(end.time()),
            });
            break;
        }

        ranges.push(DaySubRange {
            day,
            start: ClockLabel::Time(cursor.time()),
            end: ClockLabel::Midnight,
        });

        let Some(next) = next_midnight(day, &offset) else {
            break;
        };
        if next == end {
            break;
        }
        cursor = next;
    }

    ranges
}

fn next_midnight(day: NaiveDate, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let next_day = day.succ_opt()?;
    offset
        .from_local_datetime(&next_day.and_time(NaiveTime::MIN))
        .single()
}
