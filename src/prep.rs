//! Meeting prep flow.
//!
//! Lists the next day's meetings, then preps them one at a time: who is
//! attending, which past meetings they shared, and an AI brief. A meeting
//! that fails is reported and skipped; the rest still get prepped.

use std::io::Write;

use chrono::NaiveDate;

use crate::attrove::types::{Attendee, Event};
use crate::attrove::{CommsApi, EventQuery, MeetingQuery, QueryOptions};
use crate::correlate::{relevant_meetings, PAST_MEETING_DISPLAY_LIMIT};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{RunError, RunStatus};
use crate::interact::Operator;
use crate::timefmt::{api_date, DisplayZone};

pub const NO_UPCOMING: &str = "No upcoming meetings in the next 24 hours.";

const RULE_WIDTH: usize = 60;
const PAST_MEETING_FETCH_LIMIT: u32 = 5;

/// How a prep run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepSummary {
    pub meetings: usize,
    pub failures: usize,
}

impl PrepSummary {
    pub fn status(&self) -> RunStatus {
        RunStatus::from_failures(self.failures)
    }

    /// Closing stderr line, when anything failed.
    pub fn failure_line(&self) -> Option<String> {
        (self.failures > 0).then(|| {
            format!(
                "\n{} meeting(s) could not be prepped. See errors above.",
                self.failures
            )
        })
    }
}

/// Prep every meeting between `today` and tomorrow.
pub async fn run(
    api: &dyn CommsApi,
    today: NaiveDate,
    zone: &DisplayZone,
    operator: &dyn Operator,
    sink: &dyn DiagnosticSink,
    out: &mut (dyn Write + Send),
) -> Result<PrepSummary, RunError> {
    let events = api
        .list_events(&EventQuery {
            start_date: api_date(today),
            end_date: api_date(today + chrono::Duration::days(1)),
            expand: vec!["attendees", "description"],
        })
        .await?;

    if events.is_empty() {
        writeln!(out, "{}", NO_UPCOMING)?;
        return Ok(PrepSummary::default());
    }

    writeln!(out, "Found {} upcoming meeting(s).\n", events.len())?;
    operator
        .acknowledge("Press Enter to start prepping...")
        .await?;

    let mut summary = PrepSummary {
        meetings: events.len(),
        failures: 0,
    };
    for event in &events {
        match prep_one(api, event, zone, sink, out).await {
            Ok(()) => {}
            Err(RunError::Api(err)) => {
                summary.failures += 1;
                sink.emit(Diagnostic::ItemFailed {
                    item: event.title.clone(),
                    reason: err.to_string(),
                });
                writeln!(out)?;
            }
            Err(other) => return Err(other),
        }
    }
    Ok(summary)
}

async fn prep_one(
    api: &dyn CommsApi,
    event: &Event,
    zone: &DisplayZone,
    sink: &dyn DiagnosticSink,
    out: &mut (dyn Write + Send),
) -> Result<(), RunError> {
    let attendees = event.attendee_list(sink);
    let names = joined_names(&attendees);

    writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;
    writeln!(out, "Meeting: {}", event.title)?;
    writeln!(
        out,
        "Time:    {} - {}",
        zone.time_label(&event.start_time),
        zone.time_label(&event.end_time)
    )?;
    if !names.is_empty() {
        writeln!(out, "With:    {}", names)?;
    }
    writeln!(out)?;

    let history = api
        .list_meetings(&MeetingQuery {
            expand: vec!["short_summary", "action_items"],
            limit: Some(PAST_MEETING_FETCH_LIMIT),
        })
        .await?;

    let related = relevant_meetings(&attendees, &history, sink);
    if !related.is_empty() {
        writeln!(out, "Previous meetings with these people:")?;
        for meeting in related.iter().take(PAST_MEETING_DISPLAY_LIMIT) {
            writeln!(
                out,
                "  - {} ({})",
                meeting.title,
                zone.short_date_label(&meeting.start_time)
            )?;
            if let Some(summary) = meeting.short_summary.as_deref().filter(|s| !s.is_empty()) {
                writeln!(out, "    {}", summary)?;
            }
        }
        writeln!(out)?;
    }

    let response = api
        .query(
            &brief_prompt(&event.title, &names),
            QueryOptions {
                include_sources: true,
            },
        )
        .await?;

    writeln!(out, "Prep Brief:")?;
    writeln!(out, "{}", response.answer)?;
    writeln!(out)?;
    Ok(())
}

/// Every resolvable attendee name, comma-joined.
fn joined_names(attendees: &[Attendee]) -> String {
    attendees
        .iter()
        .filter_map(Attendee::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Brief request for one meeting, naming the attendees when known.
pub fn brief_prompt(title: &str, names: &str) -> String {
    if names.is_empty() {
        format!(
            "What do I need to know before my meeting \"{}\"? Include any recent context, \
             action items, or decisions related to this topic.",
            title
        )
    } else {
        format!(
            "What do I need to know before my meeting \"{}\" with {}? Include any recent \
             email threads, Slack messages, open action items, or decisions involving these people.",
            title, names
        )
    }
}
