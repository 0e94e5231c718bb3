//! Paginated event sources.
//!
//! A source hands out events one page at a time. The caller passes back the
//! continuation token of the previous page until a page arrives without one.

use serde::Deserialize;

use crate::error::{DiaryError, DiaryResult};
use crate::event::Event;

/// One page of events, in the order they should be written.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub next_page_token: Option<String>,
}

/// Something that can list events page by page.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    async fn next_page(&mut self, page_token: Option<&str>) -> DiaryResult<EventPage>;
}

/// Walk every page of `source` front to back, handing each event to
/// `on_event`. Stops at the first error from either side.
///
/// Returns the number of events handed out.
pub async fn drain<S, F>(source: &mut S, mut on_event: F) -> DiaryResult<usize>
where
    S: EventSource,
    F: FnMut(Event) -> DiaryResult<()>,
{
    let mut page_token: Option<String> = None;
    let mut seen = 0;

    loop {
        let page = source.next_page(page_token.as_deref()).await?;

        for event in page.events {
            seen += 1;
            on_event(event)?;
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    Ok(seen)
}

/// Events held in memory, split into fixed pages.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: Vec<Vec<Event>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEvents {
    List(Vec<Event>),
    Wrapped { items: Vec<Event> },
}

impl StaticSource {
    pub fn new(pages: Vec<Vec<Event>>) -> Self {
        StaticSource { pages }
    }

    /// Split `events` into pages of at most `page_size` events.
    pub fn paged(events: Vec<Event>, page_size: usize) -> Self {
        let pages = events
            .chunks(page_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();
        StaticSource { pages }
    }

    /// Parse a JSON array of events, or an object with an `items` array.
    pub fn from_json(json: &str) -> DiaryResult<Self> {
        let events = match serde_json::from_str::<JsonEvents>(json) {
            Ok(JsonEvents::List(events)) | Ok(JsonEvents::Wrapped { items: events }) => events,
            Err(e) => return Err(DiaryError::Provider(format!("Invalid event JSON: {}", e))),
        };
        Ok(StaticSource::new(vec![events]))
    }
}

impl EventSource for StaticSource {
    async fn next_page(&mut self, page_token: Option<&str>) -> DiaryResult<EventPage> {
        let index = match page_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| DiaryError::Provider(format!("Unknown page token '{}'", token)))?,
        };

        if index > 0 && index >= self.pages.len() {
            return Err(DiaryError::Provider(format!("Unknown page token '{}'", index)));
        }

        let events = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());

        Ok(EventPage {
            events,
            next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(summary: &str) -> Event {
        Event {
            summary: summary.to_string(),
            start: "2024-05-01T10:00:00Z".to_string(),
            end: "2024-05-01T11:00:00Z".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_drain_walks_pages_in_order() {
        let events: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|s| make_event(s)).collect();
        let mut source = StaticSource::paged(events, 2);

        let mut seen = Vec::new();
        let count = drain(&mut source, |event| {
            seen.push(event.summary);
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(count, 5);
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_drain_empty_source() {
        let mut source = StaticSource::default();
        let count = drain(&mut source, |_| Ok(())).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_drain_stops_on_callback_error() {
        let events: Vec<_> = ["a", "b", "c"].iter().map(|s| make_event(s)).collect();
        let mut source = StaticSource::paged(events, 1);

        let mut seen = Vec::new();
        let result = drain(&mut source, |event| {
            if event.summary == "b" {
                return Err(DiaryError::SinkWrite(std::io::Error::from(
                    std::io::ErrorKind::BrokenPipe,
                )));
            }
            seen.push(event.summary);
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(DiaryError::SinkWrite(_))));
        assert_eq!(seen, vec!["a"], "Nothing after the failing event should be processed");
    }

    struct FailingSource;

    impl EventSource for FailingSource {
        async fn next_page(&mut self, _page_token: Option<&str>) -> DiaryResult<EventPage> {
            Err(DiaryError::Provider("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn test_drain_propagates_source_error() {
        let result = drain(&mut FailingSource, |_| Ok(())).await;
        assert!(matches!(result, Err(DiaryError::Provider(_))));
    }

    #[test]
    fn test_from_json_accepts_both_shapes() {
        let list = r#"[{"summary": "x", "start": "2024-05-01T10:00:00Z", "end": "2024-05-01T11:00:00Z"}]"#;
        let wrapped = r#"{"items": [{"summary": "x", "start": "2024-05-01T10:00:00Z", "end": "2024-05-01T11:00:00Z"}]}"#;

        assert_eq!(StaticSource::from_json(list).unwrap().pages[0].len(), 1);
        assert_eq!(StaticSource::from_json(wrapped).unwrap().pages[0].len(), 1);
        assert!(StaticSource::from_json("{").is_err());
    }
}
