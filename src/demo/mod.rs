//! Canned data source for `--demo` runs.
//!
//! Serves embedded fixture templates through the same `CommsApi` the live
//! client implements, so demo runs exercise normalization, correlation and
//! digest assembly end to end without credentials.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::attrove::types::{
    DataEnvelope, Event, Integration, MeetingRecord, QueryResponse, SearchResponse,
};
use crate::attrove::{ApiError, CommsApi, EventQuery, MeetingQuery, QueryOptions, SearchOptions};
use crate::timefmt::{api_date, DisplayZone};

// Fixture templates embedded at compile time
const EVENTS_TMPL: &str = include_str!("fixtures/events.json.tmpl");
const THREADS_TMPL: &str = include_str!("fixtures/threads.json.tmpl");
const MEETINGS_TMPL: &str = include_str!("fixtures/meetings.json.tmpl");

const DIGEST_ANSWER: &str = "\
Open action items
  - Send OKR feedback to Sarah (asked yesterday, due Friday)
  - Review Mike's API migration blocker in #engineering
  - Sign off on the onboarding mockups for Lisa

Decisions
  - Q1 OKRs narrowed to three company-level objectives
  - API migration cutover moves to next Tuesday

Summary
Most of the last day was Q1 planning and the API migration. Sarah is waiting
on your OKR feedback and Lisa needs mockup sign-off before the Globex review.";

const PREP_ANSWER: &str = "\
Sarah is waiting on your OKR feedback from last week's drafting session, and
Mike flagged a blocking issue in the API migration that needs a decision
before Friday. Lisa will want sign-off on the onboarding mockups.";

/// `CommsApi` backed by fixture templates anchored on one date.
#[derive(Debug, Clone)]
pub struct DemoApi {
    date: NaiveDate,
    zone: DisplayZone,
}

impl DemoApi {
    pub fn new(date: NaiveDate, zone: DisplayZone) -> Self {
        Self { date, zone }
    }

    /// Replace date tokens in a template string.
    pub(crate) fn patch_dates(&self, template: &str) -> String {
        let shifted = |days: i64| api_date(self.date + chrono::Duration::days(days));
        template
            .replace("{{OFFSET}}", &self.zone.utc_offset(self.date))
            .replace("{{YESTERDAY}}", &shifted(-1))
            .replace("{{LAST_WEEK}}", &shifted(-7))
            .replace("{{TOMORROW}}", &shifted(1))
            .replace("{{DATE}}", &api_date(self.date))
    }

    fn load<T: DeserializeOwned>(&self, template: &str) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.patch_dates(template))?)
    }
}

#[async_trait]
impl CommsApi for DemoApi {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError> {
        log::debug!("demo events {}..{}", query.start_date, query.end_date);
        let envelope: DataEnvelope<Event> = self.load(EVENTS_TMPL)?;
        Ok(envelope.data)
    }

    async fn search(
        &self,
        _query: &str,
        _options: &SearchOptions,
    ) -> Result<SearchResponse, ApiError> {
        self.load(THREADS_TMPL)
    }

    async fn query(&self, prompt: &str, _options: QueryOptions) -> Result<QueryResponse, ApiError> {
        let (answer, used) = if prompt.contains("before my meeting") {
            (PREP_ANSWER, 6)
        } else {
            (DIGEST_ANSWER, 23)
        };
        Ok(QueryResponse {
            answer: answer.to_string(),
            used_message_ids: (1..=used).map(|i| format!("msg_{}", i)).collect(),
        })
    }

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<MeetingRecord>, ApiError> {
        let envelope: DataEnvelope<MeetingRecord> = self.load(MEETINGS_TMPL)?;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(envelope.data.into_iter().take(limit).collect())
    }

    async fn list_integrations(&self) -> Result<Vec<Integration>, ApiError> {
        Ok(["gmail", "slack", "google_calendar"]
            .into_iter()
            .map(|provider| Integration {
                provider: provider.to_string(),
                ..Default::default()
            })
            .collect())
    }
}
