//! Diary rendering and output.

use std::io::Write;

use crate::error::DiaryResult;
use crate::event::Event;
use crate::format::indent;
use crate::split::split_days;
use crate::style::DateStyle;

/// Writes events to a sink as diary entries, one block per calendar day.
///
/// ```text
/// 2024/03/10 22:00-24:00 Night shift
///  Location: Depot
///  Description: Bring keys
/// ```
pub struct DiaryWriter<W: Write> {
    sink: W,
    style: DateStyle,
}

impl<W: Write> DiaryWriter<W> {
    pub fn new(sink: W, style: DateStyle) -> Self {
        DiaryWriter { sink, style }
    }

    /// Render every day block of `event` into a single string.
    pub fn render(&self, event: &Event) -> DiaryResult<String> {
        let (start, end) = event.parse_times()?;
        let mut out = String::new();

        for range in split_days(start, end) {
            out.push_str(&format!(
                "{} {}-{} {}\n",
                self.style.format_day(range.day),
                range.start,
                range.end,
                event.summary
            ));

            if !event.location.is_empty() {
                out.push_str(&format!(" Location: {}\n", indent(&event.location)));
            }

            if !event.description.is_empty() {
                out.push_str(&format!(" Description: {}\n", indent(&event.description)));
            }
        }

        Ok(out)
    }

    /// Render `event` and append it to the sink in one write. Nothing is
    /// written when the event's timestamps are rejected.
    pub fn write(&mut self, event: &Event) -> DiaryResult<()> {
        let entry = self.render(event)?;
        self.sink.write_all(entry.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> DiaryResult<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
