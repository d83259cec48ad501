//! Attrove API response types.
//!
//! Field names follow the API's snake_case JSON. Optional fields default so
//! that a partially populated record from one integration still decodes,
//! whether the field is absent or sent as `null`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::diagnostics::DiagnosticSink;
use crate::normalize::ListField;

/// Label shown for a conversation the service returned without a name.
pub const UNNAMED_THREAD: &str = "Unnamed thread";

/// Decode `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Calendar
// ============================================================================

/// A participant on an event or past meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Attendee {
    /// Non-empty email, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }

    /// Name when present, otherwise email.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.email())
    }
}

/// A calendar entry from `events.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(default)]
    pub attendees: ListField<Attendee>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Event {
    pub fn attendee_list(&self, sink: &dyn DiagnosticSink) -> Vec<Attendee> {
        self.attendees.to_list(sink)
    }
}

/// A historical meeting from `meetings.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(default)]
    pub attendees: ListField<Attendee>,
    #[serde(default)]
    pub short_summary: Option<String>,
    #[serde(default)]
    pub action_items: ListField<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct DataEnvelope<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

// ============================================================================
// Search
// ============================================================================

/// A single message inside a conversation thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
    #[serde(default)]
    pub received_at: Option<String>,
}

/// A conversation grouping returned by `search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub conversation_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threads: IndexMap<String, Vec<Message>>,
}

impl Conversation {
    pub fn display_name(&self) -> &str {
        self.conversation_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_THREAD)
    }

    /// Total messages across every thread.
    pub fn message_count(&self) -> usize {
        self.threads.values().map(Vec::len).sum()
    }
}

/// Search results keyed by conversation id, in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub conversations: IndexMap<String, Conversation>,
}

// ============================================================================
// Query
// ============================================================================

/// A synthesized answer from `query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub used_message_ids: Vec<String>,
}

// ============================================================================
// Integrations / provisioning
// ============================================================================

/// A connected integration (gmail, slack, google_calendar, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    #[serde(default)]
    pub id: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of provisioning a user through the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionedUser {
    pub id: String,
    #[serde(alias = "apiKey")]
    pub api_key: String,
}

/// Short-lived token for the hosted OAuth connect page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectToken {
    pub token: String,
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_message_count_sums_threads() {
        let json = r#"{
            "conversation_name": "Project Alpha",
            "threads": {
                "t1": [{"message_id": "m1"}, {"message_id": "m2"}],
                "t2": [{"message_id": "m3"}],
                "t3": [{"message_id": "m4"}]
            }
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.message_count(), 4);
        assert_eq!(conv.display_name(), "Project Alpha");
    }

    #[test]
    fn test_conversation_without_name() {
        let conv: Conversation =
            serde_json::from_str(r#"{"conversation_name": null, "threads": {}}"#).unwrap();
        assert_eq!(conv.display_name(), UNNAMED_THREAD);
        assert_eq!(conv.message_count(), 0);
    }

    #[test]
    fn test_search_response_keeps_service_order() {
        let json = r#"{"conversations": {
            "zeta": {"conversation_name": "Zeta", "threads": {}},
            "alpha": {"conversation_name": "Alpha", "threads": {}},
            "mid": {"conversation_name": "Mid", "threads": {}}
        }}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = resp.conversations.values().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_event_with_encoded_attendees() {
        let json = r#"{
            "id": "evt_1",
            "title": "Weekly Sync",
            "start_time": "2026-01-05T14:00:00Z",
            "end_time": "2026-01-05T14:30:00Z",
            "attendees": "[{\"name\":\"Sarah Chen\",\"email\":\"sarah@acme.com\"}]"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let sink = crate::diagnostics::MemorySink::new();
        let attendees = event.attendee_list(&sink);
        assert_eq!(attendees.len(), 1);
        assert_eq!(attendees[0].display_name(), Some("Sarah Chen"));
    }

    #[test]
    fn test_attendee_display_name_falls_back_to_email() {
        let a = Attendee {
            name: Some(String::new()),
            email: Some("bo@acme.com".to_string()),
        };
        assert_eq!(a.display_name(), Some("bo@acme.com"));
        assert_eq!(Attendee::default().display_name(), None);
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let json = r#"{"data": [
            {"id": "evt_1", "title": null, "start_time": "2026-01-05T14:00:00Z", "end_time": null},
            {"id": "evt_2", "title": "Weekly Sync", "start_time": "2026-01-05T15:00:00Z", "end_time": "2026-01-05T15:30:00Z"}
        ]}"#;
        let envelope: DataEnvelope<Event> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].title, "");
        assert_eq!(envelope.data[0].end_time, "");
        assert_eq!(envelope.data[1].title, "Weekly Sync");

        let meeting: MeetingRecord =
            serde_json::from_str(r#"{"id": "m1", "title": null, "start_time": null}"#).unwrap();
        assert_eq!(meeting.title, "");

        let resp: SearchResponse = serde_json::from_str(
            r#"{"conversations": {"c1": {"conversation_name": "Ops", "threads": null}}}"#,
        )
        .unwrap();
        assert_eq!(resp.conversations["c1"].message_count(), 0);

        let answer: QueryResponse =
            serde_json::from_str(r#"{"answer": null, "used_message_ids": null}"#).unwrap();
        assert!(answer.answer.is_empty());
        assert!(answer.used_message_ids.is_empty());
    }

    #[test]
    fn test_provisioned_user_accepts_camel_case_key() {
        let user: ProvisionedUser =
            serde_json::from_str(r#"{"id": "u1", "apiKey": "sk_live_abc"}"#).unwrap();
        assert_eq!(user.api_key, "sk_live_abc");
    }
}
