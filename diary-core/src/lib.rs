//! Core types for gcal2diary.
//!
//! This crate turns calendar events into diary text:
//! - `split` walks an event's interval and cuts it at every midnight
//! - `format` and `style` render days, clock times and multi-line text
//! - `writer` assembles the per-day blocks and hands them to an output sink
//! - `source` is the paginated event source capability providers implement

pub mod error;
pub mod event;
pub mod format;
pub mod source;
pub mod split;
pub mod style;
pub mod window;
pub mod writer;

pub use error::{DiaryError, DiaryResult, TimeField};
pub use event::Event;
pub use source::{EventPage, EventSource, StaticSource};
pub use split::{ClockLabel, DaySubRange, split_days};
pub use style::DateStyle;
pub use window::TimeWindow;
pub use writer::DiaryWriter;
