use std::io::Write;

use diary_core::source::drain;
use diary_core::{DiaryResult, DiaryWriter, EventSource};
use tracing::{Level, debug, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    pub written: usize,
    pub skipped: usize,
}

/// Write every event of `source` to `writer`, in source order.
///
/// Events with unusable timestamps are logged and skipped. Source and sink
/// failures end the run.
pub async fn write_events<S, W>(source: &mut S, writer: &mut DiaryWriter<W>) -> DiaryResult<WriteStats>
where
    S: EventSource,
    W: Write,
{
    let mut stats = WriteStats::default();

    drain(source, |event| {
        if tracing::enabled!(Level::DEBUG) {
            match serde_json::to_string(&event) {
                Ok(json) => debug!("{}", json),
                Err(e) => debug!("Could not serialize event {}: {}", event.id, e),
            }
        }

        match writer.write(&event) {
            Ok(()) => stats.written += 1,
            Err(e) if e.is_event_local() => {
                warn!(event_id = %event.id, "Skipping event: {}", e);
                stats.skipped += 1;
            }
            Err(e) => return Err(e),
        }

        Ok(())
    })
    .await?;

    writer.flush()?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::{DateStyle, DiaryError, Event, StaticSource};

    fn make_event(summary: &str, start: &str, end: &str) -> Event {
        Event {
            id: summary.to_lowercase(),
            summary: summary.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_write_events_across_pages() {
        let events = vec![
            make_event("Breakfast", "2024-05-01T08:00:00Z", "2024-05-01T08:30:00Z"),
            make_event("Flight", "2024-05-01T22:00:00Z", "2024-05-02T03:00:00Z"),
            make_event("Lunch", "2024-05-02T12:00:00Z", "2024-05-02T13:00:00Z"),
        ];
        let mut source = StaticSource::paged(events, 2);
        let mut writer = DiaryWriter::new(Vec::new(), DateStyle::Iso);

        let stats = write_events(&mut source, &mut writer).await.unwrap();
        assert_eq!(stats, WriteStats { written: 3, skipped: 0 });

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            out,
            "2024/05/01 08:00-08:30 Breakfast\n\
             2024/05/01 22:00-24:00 Flight\n\
             2024/05/02 00:00-03:00 Flight\n\
             2024/05/02 12:00-13:00 Lunch\n"
        );
    }

    #[tokio::test]
    async fn test_write_events_skips_unparsable_event() {
        let events = vec![
            make_event("Holiday", "2024-05-01", "2024-05-02"),
            make_event("Call", "2024-05-01T09:00:00Z", "2024-05-01T09:30:00Z"),
        ];
        let mut source = StaticSource::new(vec![events]);
        let mut writer = DiaryWriter::new(Vec::new(), DateStyle::Us);

        let stats = write_events(&mut source, &mut writer).await.unwrap();
        assert_eq!(stats, WriteStats { written: 1, skipped: 1 });

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "01/05/2024 09:00-09:30 Call\n");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_write_events_aborts_on_sink_error() {
        let events = vec![make_event("Call", "2024-05-01T09:00:00Z", "2024-05-01T09:30:00Z")];
        let mut source = StaticSource::new(vec![events]);
        let mut writer = DiaryWriter::new(ClosedPipe, DateStyle::Iso);

        let result = write_events(&mut source, &mut writer).await;
        assert!(matches!(result, Err(DiaryError::SinkWrite(_))));
    }
}
