//! Daily rundown flow.
//!
//! Fetches today's calendar, recent threads and an AI digest in one
//! settled batch, reports per-source failures, assembles the report and
//! prints it. Delivery by e-mail is optional and happens after printing.

use std::io::Write;

use chrono::NaiveDate;

use crate::attrove::types::{Event, QueryResponse, SearchResponse};
use crate::attrove::{ApiError, CommsApi, EventQuery, QueryOptions, SearchOptions};
use crate::config::ConfigError;
use crate::delivery::{Envelope, Mailer};
use crate::diagnostics::DiagnosticSink;
use crate::digest::{self, DigestInputs, DIGEST_TITLE};
use crate::emit::emit_report;
use crate::error::{RunError, RunStatus};
use crate::fetch::{settle_all, RemoteQuery, Settled, SettledBatch, SettledOutcome};
use crate::timefmt::{api_date, long_date_label, DisplayZone};

pub const THREAD_SEARCH: &str = "action items OR decisions OR follow up OR deadline";

pub const DIGEST_PROMPT: &str = "Generate a concise daily digest for today. Include:
1. Open action items that need attention
2. Key decisions made in the last 24 hours
3. Important threads or conversations to follow up on
4. A 2-3 sentence summary of recent communications

Format as a structured digest with clear sections.";

const CALENDAR_LABEL: &str = "fetch calendar events";
const THREADS_LABEL: &str = "search recent threads";
const DIGEST_LABEL: &str = "generate AI digest";

/// One source's payload inside the shared batch.
#[derive(Debug)]
enum Fetched {
    Calendar(Vec<Event>),
    Threads(SearchResponse),
    Digest(QueryResponse),
}

/// An assembled report plus how many sources failed to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rundown {
    pub date_label: String,
    pub report: String,
    pub failures: usize,
}

impl Rundown {
    pub fn subject(&self) -> String {
        format!("{} - {}", DIGEST_TITLE, self.date_label)
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::from_failures(self.failures)
    }
}

/// Where the report goes after it has been printed.
pub enum Delivery<'a> {
    PrintOnly,
    Email { mailer: &'a dyn Mailer, to: String },
    /// `--send` was given without usable Resend settings.
    Unconfigured(ConfigError),
}

/// Fetch and assemble the rundown for `today`.
///
/// Fails only when every source failed; partial failures are counted and
/// rendered as placeholder sections.
pub async fn build(
    api: &dyn CommsApi,
    today: NaiveDate,
    zone: &DisplayZone,
    sink: &dyn DiagnosticSink,
) -> Result<Rundown, RunError> {
    let yesterday = today - chrono::Duration::days(1);
    let events = EventQuery {
        start_date: api_date(today),
        end_date: api_date(today),
        expand: vec!["attendees"],
    };
    let search = SearchOptions {
        after_date: Some(api_date(yesterday)),
        include_body_text: true,
    };
    let query = QueryOptions {
        include_sources: true,
    };

    let batch = settle_all(vec![
        RemoteQuery::new(CALENDAR_LABEL, async {
            api.list_events(&events).await.map(Fetched::Calendar)
        }),
        RemoteQuery::new(THREADS_LABEL, async {
            api.search(THREAD_SEARCH, &search).await.map(Fetched::Threads)
        }),
        RemoteQuery::new(DIGEST_LABEL, async {
            api.query(DIGEST_PROMPT, query).await.map(Fetched::Digest)
        }),
    ])
    .await;

    batch.report_failures(sink);
    if batch.all_failed() {
        return Err(RunError::AllSourcesFailed);
    }

    let failures = batch.failure_count();
    let inputs = into_inputs(batch);
    let date_label = long_date_label(today);
    let lines = digest::assemble(&date_label, &inputs, zone, sink);

    Ok(Rundown {
        date_label,
        report: digest::render(&lines),
        failures,
    })
}

/// Print the report, then deliver it when asked.
pub async fn emit(
    rundown: &Rundown,
    out: &mut (dyn Write + Send),
    delivery: Delivery<'_>,
) -> Result<RunStatus, RunError> {
    match delivery {
        Delivery::PrintOnly => {
            emit_report(&rundown.report, out, None).await?;
        }
        Delivery::Unconfigured(err) => {
            emit_report(&rundown.report, out, None).await?;
            return Err(err.into());
        }
        Delivery::Email { mailer, to } => {
            let envelope = Envelope::digest(&to, &rundown.subject(), &rundown.report);
            emit_report(&rundown.report, out, Some((mailer, &envelope))).await?;
            writeln!(out, "\nSent to {}", to)?;
        }
    }
    Ok(rundown.status())
}

fn into_inputs(batch: SettledBatch<Fetched>) -> DigestInputs {
    let mut slots = batch.into_slots().into_iter();
    DigestInputs {
        calendar: pick(slots.next(), |f| match f {
            Fetched::Calendar(events) => Some(events),
            _ => None,
        }),
        threads: pick(slots.next(), |f| match f {
            Fetched::Threads(search) => Some(search),
            _ => None,
        }),
        answer: pick(slots.next(), |f| match f {
            Fetched::Digest(answer) => Some(answer),
            _ => None,
        }),
    }
}

fn pick<T>(
    slot: Option<Settled<Fetched>>,
    project: impl FnOnce(Fetched) -> Option<T>,
) -> SettledOutcome<T> {
    let Some(slot) = slot else {
        return SettledOutcome::Failed(ApiError::Validation("missing batch slot".to_string()));
    };
    match slot.outcome {
        SettledOutcome::Ok(fetched) => match project(fetched) {
            Some(value) => SettledOutcome::Ok(value),
            None => SettledOutcome::Failed(ApiError::Validation(format!(
                "unexpected payload for {}",
                slot.label
            ))),
        },
        SettledOutcome::Failed(err) => SettledOutcome::Failed(err),
    }
}
