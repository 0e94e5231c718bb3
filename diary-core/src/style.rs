//! Date style selection.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::DiaryError;

/// Digit ordering used when rendering a calendar day.
///
/// `Us` and `Eu` keep the orderings existing diaries were written with:
/// `Us` is day first and `Eu` is month first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// `YYYY/MM/DD`
    #[default]
    Iso,
    /// `DD/MM/YYYY`
    Us,
    /// `MM/DD/YYYY`
    Eu,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            DateStyle::Iso => "%Y/%m/%d",
            DateStyle::Us => "%d/%m/%Y",
            DateStyle::Eu => "%m/%d/%Y",
        }
    }

    /// Render a calendar day in this style.
    pub fn format_day(self, day: NaiveDate) -> String {
        day.format(self.pattern()).to_string()
    }
}

impl FromStr for DateStyle {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iso" => Ok(DateStyle::Iso),
            "us" => Ok(DateStyle::Us),
            "eu" => Ok(DateStyle::Eu),
            _ => Err(DiaryError::UnknownDateStyle(s.to_string())),
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStyle::Iso => write!(f, "iso"),
            DateStyle::Us => write!(f, "us"),
            DateStyle::Eu => write!(f, "eu"),
        }
    }
}
