//! Past-meeting correlation.
//!
//! Matches historical meetings to the people on an upcoming event. Identity
//! is the attendee email, compared exactly; names are ignored because the
//! same person shows up as "Sarah", "Sarah Chen" and "schen" across sources.

use std::collections::HashSet;

use crate::attrove::types::{Attendee, MeetingRecord};
use crate::diagnostics::DiagnosticSink;

/// How many correlated meetings a brief shows.
pub const PAST_MEETING_DISPLAY_LIMIT: usize = 3;

/// Non-empty emails of a set of attendees.
pub fn email_set(attendees: &[Attendee]) -> HashSet<&str> {
    attendees.iter().filter_map(Attendee::email).collect()
}

/// Historical meetings that share at least one attendee email with `current`.
///
/// Keeps `history` order and returns every match; callers cap for display.
pub fn relevant_meetings<'m>(
    current: &[Attendee],
    history: &'m [MeetingRecord],
    sink: &dyn DiagnosticSink,
) -> Vec<&'m MeetingRecord> {
    let wanted = email_set(current);
    if wanted.is_empty() {
        return Vec::new();
    }

    history
        .iter()
        .filter(|meeting| {
            meeting
                .attendees
                .to_list(sink)
                .iter()
                .filter_map(Attendee::email)
                .any(|email| wanted.contains(email))
        })
        .collect()
}
