//! Ad-hoc question over the user's communications.

use std::io::Write;

use crate::attrove::{CommsApi, QueryOptions};
use crate::error::{RunError, RunStatus};

pub const DEFAULT_QUESTION: &str = "important updates this week";

/// Join free-text arguments into one question, falling back to the default.
pub fn question_from_args(words: &[String]) -> String {
    let joined = words.join(" ");
    if joined.trim().is_empty() {
        DEFAULT_QUESTION.to_string()
    } else {
        joined
    }
}

pub async fn run(
    api: &dyn CommsApi,
    question: &str,
    out: &mut (dyn Write + Send),
) -> Result<RunStatus, RunError> {
    writeln!(out, "Q: {}\n", question)?;

    let response = api
        .query(
            question,
            QueryOptions {
                include_sources: true,
            },
        )
        .await?;

    if response.answer.is_empty() {
        writeln!(
            out,
            "No answer was generated. This may mean no relevant messages were found."
        )?;
        writeln!(
            out,
            "Try connecting more integrations or using a different query."
        )?;
    } else {
        writeln!(out, "{}", response.answer)?;
    }

    if !response.used_message_ids.is_empty() {
        writeln!(
            out,
            "\n(Based on {} messages)",
            response.used_message_ids.len()
        )?;
    }
    Ok(RunStatus::Success)
}
