//! Daily digest assembly.
//!
//! Turns the settled calendar, thread-search and AI-digest outcomes into
//! the plain-text report. Section order is fixed (banner, Calendar, Recent
//! Threads, Digest). A failed source still gets its heading, with a
//! placeholder line in place of its body.

use crate::attrove::types::{Event, QueryResponse, SearchResponse};
use crate::diagnostics::DiagnosticSink;
use crate::fetch::SettledOutcome;
use crate::timefmt::DisplayZone;

pub const DIGEST_TITLE: &str = "Daily Rundown";

const BANNER_WIDTH: usize = 50;
const RULE_WIDTH: usize = 30;
const MAX_ATTENDEE_NAMES: usize = 3;
const MAX_THREADS: usize = 5;

pub const LOAD_FAILED: &str = "  (failed to load — see error above)";
pub const GENERATE_FAILED: &str = "  (failed to generate — see error above)";
pub const NO_MEETINGS: &str = "  No meetings today.";

/// The three sources a daily digest is built from.
#[derive(Debug)]
pub struct DigestInputs {
    pub calendar: SettledOutcome<Vec<Event>>,
    pub threads: SettledOutcome<SearchResponse>,
    pub answer: SettledOutcome<QueryResponse>,
}

/// A heading, its underline, and body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSection {
    pub heading: String,
    pub body: Vec<String>,
}

impl DigestSection {
    fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: Vec::new(),
        }
    }

    fn failed(heading: &str, placeholder: &str) -> Self {
        Self {
            heading: heading.to_string(),
            body: vec![placeholder.to_string()],
        }
    }

    /// Blank spacer, heading, rule, body.
    pub fn render_into(&self, out: &mut Vec<String>) {
        out.push(String::new());
        out.push(self.heading.clone());
        out.push("-".repeat(RULE_WIDTH));
        out.extend(self.body.iter().cloned());
    }
}

/// Build the report lines.
pub fn assemble(
    date_label: &str,
    inputs: &DigestInputs,
    zone: &DisplayZone,
    sink: &dyn DiagnosticSink,
) -> Vec<String> {
    let mut lines = vec![
        format!("{} - {}", DIGEST_TITLE, date_label),
        "=".repeat(BANNER_WIDTH),
    ];
    for section in sections(inputs, zone, sink) {
        section.render_into(&mut lines);
    }
    lines
}

/// Newline-join report lines.
pub fn render(lines: &[String]) -> String {
    lines.join("\n")
}

/// The body sections, in report order.
pub fn sections(
    inputs: &DigestInputs,
    zone: &DisplayZone,
    sink: &dyn DiagnosticSink,
) -> Vec<DigestSection> {
    vec![
        calendar_section(&inputs.calendar, zone, sink),
        threads_section(&inputs.threads),
        answer_section(&inputs.answer),
    ]
}

fn calendar_section(
    outcome: &SettledOutcome<Vec<Event>>,
    zone: &DisplayZone,
    sink: &dyn DiagnosticSink,
) -> DigestSection {
    let Some(events) = outcome.ok() else {
        return DigestSection::failed("Calendar", LOAD_FAILED);
    };

    let mut section = DigestSection::new(format!("Calendar ({} events)", events.len()));
    if events.is_empty() {
        section.body.push(NO_MEETINGS.to_string());
        return section;
    }

    for event in events {
        section.body.push(format!(
            "  {}  {}",
            zone.time_label(&event.start_time),
            event.title
        ));
        let names = attendee_names(event, MAX_ATTENDEE_NAMES, sink);
        if !names.is_empty() {
            section.body.push(format!("         with {}", names));
        }
    }
    section
}

fn threads_section(outcome: &SettledOutcome<SearchResponse>) -> DigestSection {
    let Some(search) = outcome.ok() else {
        return DigestSection::failed("Recent Threads", LOAD_FAILED);
    };

    let mut section = DigestSection::new(format!(
        "Recent Threads ({} active)",
        search.conversations.len()
    ));
    for conversation in search.conversations.values().take(MAX_THREADS) {
        section.body.push(format!(
            "  - {} ({} messages)",
            conversation.display_name(),
            conversation.message_count()
        ));
    }
    section
}

fn answer_section(outcome: &SettledOutcome<QueryResponse>) -> DigestSection {
    match outcome.ok() {
        Some(response) => DigestSection {
            heading: "Digest".to_string(),
            body: vec![response.answer.clone()],
        },
        None => DigestSection::failed("Digest", GENERATE_FAILED),
    }
}

/// Up to `limit` resolvable attendee names, comma-joined.
pub fn attendee_names(event: &Event, limit: usize, sink: &dyn DiagnosticSink) -> String {
    event
        .attendee_list(sink)
        .iter()
        .filter_map(|a| a.display_name())
        .take(limit)
        .collect::<Vec<_>>()
        .join(", ")
}
