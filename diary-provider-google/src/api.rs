//! Google Calendar events listing.

use anyhow::{Context, Result};
use diary_core::{DiaryError, DiaryResult, Event, EventPage, EventSource, TimeWindow};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::token::Token;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Lists single event instances of one calendar within a time window,
/// ordered by start time.
pub struct GoogleCalendarSource {
    http: reqwest::Client,
    token: Token,
    calendar_id: String,
    window: TimeWindow,
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    start: EventDateTime,
    #[serde(default)]
    end: EventDateTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    #[serde(default)]
    date_time: Option<String>,
    /// Set instead of `date_time` for all-day events
    #[serde(default)]
    date: Option<String>,
}

impl EventDateTime {
    /// All-day events carry a bare date, which the writer reports as an
    /// unparsable timestamp.
    fn into_text(self) -> String {
        self.date_time.or(self.date).unwrap_or_default()
    }
}

impl From<GoogleEvent> for Event {
    fn from(event: GoogleEvent) -> Self {
        Event {
            id: event.id,
            summary: event.summary,
            location: event.location,
            description: event.description,
            start: event.start.into_text(),
            end: event.end.into_text(),
        }
    }
}

impl GoogleCalendarSource {
    pub fn new(
        http: reqwest::Client,
        token: Token,
        calendar_id: impl Into<String>,
        window: TimeWindow,
        time_zone: Option<String>,
    ) -> Self {
        GoogleCalendarSource {
            http,
            token,
            calendar_id: calendar_id.into(),
            window,
            time_zone,
        }
    }

    fn events_url(&self, page_token: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(API_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid API base URL"))?
            .extend(["calendars", self.calendar_id.as_str(), "events"]);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("timeMin", &self.window.from_rfc3339())
                .append_pair("timeMax", &self.window.to_rfc3339())
                .append_pair("showDeleted", "false")
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime");

            if let Some(tz) = &self.time_zone {
                query.append_pair("timeZone", tz);
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        Ok(url)
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<EventPage> {
        let url = self.events_url(page_token)?;
        debug!("Fetching {}", url);

        let response = self
            .http
            .get(url)
            .header("Authorization", self.token.authorization_header())
            .send()
            .await
            .context("Failed to retrieve events")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to retrieve events: HTTP {} - {}", status, error_text);
        }

        let body: EventsResponse = response
            .json()
            .await
            .context("Failed to parse events response")?;

        Ok(into_page(body))
    }
}

fn into_page(body: EventsResponse) -> EventPage {
    let events = body
        .items
        .into_iter()
        .filter(|e| e.status != "cancelled")
        .map(Event::from)
        .collect();

    EventPage {
        events,
        next_page_token: body.next_page_token.filter(|t| !t.is_empty()),
    }
}

impl EventSource for GoogleCalendarSource {
    async fn next_page(&mut self, page_token: Option<&str>) -> DiaryResult<EventPage> {
        self.fetch_page(page_token)
            .await
            .map_err(|e| DiaryError::Provider(format!("{:#}", e)))
    }
}
