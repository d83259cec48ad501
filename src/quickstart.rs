//! Provisioning walkthrough.
//!
//! Live mode: provision a user with partner credentials, mint a connect
//! token, wait while the operator connects an integration, then ask a first
//! question with the new user's key. Demo mode prints the same walkthrough
//! with canned values and short pauses.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::attrove::admin::{connect_url, AdminClient};
use crate::attrove::{AttroveClient, CommsApi, QueryOptions};
use crate::error::{RunError, RunStatus};
use crate::interact::Operator;

pub const FIRST_QUESTION: &str = "What are my most recent messages about?";

const KEY_PREVIEW_CHARS: usize = 15;
const SEPARATOR: &str = "==================";

const DEMO_ANSWER: &str = "\
   Your recent messages focus on three main topics: (1) The Q1 planning
   process — Sarah shared updated OKRs and is awaiting your feedback.
   (2) The API migration — Mike flagged a blocking issue in #engineering
   that needs review by Friday. (3) Customer onboarding — the design team
   shared new mockups in Slack and Lisa requested your sign-off.";

/// Throwaway address for the provisioned user.
pub fn provision_email(now: DateTime<Utc>) -> String {
    format!("quickstart-{}@example.com", now.timestamp_millis())
}

fn key_preview(api_key: &str) -> String {
    api_key.chars().take(KEY_PREVIEW_CHARS).collect()
}

fn write_header(out: &mut (dyn Write + Send)) -> std::io::Result<()> {
    writeln!(out, "\nAttrove Quickstart\n")?;
    writeln!(out, "{}\n", SEPARATOR)
}

fn write_next_steps(out: &mut (dyn Write + Send)) -> std::io::Result<()> {
    writeln!(out, "\n{}", SEPARATOR)?;
    writeln!(out, "Quickstart complete!\n")?;
    writeln!(out, "Next steps:")?;
    writeln!(out, "- Explore the SDK: https://docs.attrove.com/sdks/typescript")?;
    writeln!(out, "- Try the MCP server: npx @attrove/mcp")?;
    writeln!(out, "- View the API reference: https://docs.attrove.com/api\n")
}

/// Run the live walkthrough. Per-user calls go to `user_base_url`.
pub async fn run_live(
    admin: &AdminClient,
    user_base_url: &str,
    email: &str,
    operator: &dyn Operator,
    out: &mut (dyn Write + Send),
) -> Result<RunStatus, RunError> {
    write_header(out)?;

    writeln!(out, "1. Provisioning user: {}", email)?;
    let user = admin.create_user(email).await?;
    writeln!(out, "   User created: {}", user.id)?;
    writeln!(out, "   API Key: {}...", key_preview(&user.api_key))?;

    writeln!(out, "\n2. Generating connect token...")?;
    let token = admin.create_connect_token(&user.id).await?;
    writeln!(out, "   Token expires: {}", token.expires_at)?;
    writeln!(out, "\n   Connect URL (open in browser):")?;
    writeln!(out, "   {}", connect_url(&token.token, &user.id))?;

    writeln!(
        out,
        "\n3. Open the URL above to connect Gmail, Slack, or another integration."
    )?;
    writeln!(out, "   Once connected, press Enter to continue...\n")?;
    out.flush()?;
    operator.acknowledge("").await?;

    writeln!(out, "4. Querying user data...\n")?;
    let client = AttroveClient::with_base_url(&user.api_key, &user.id, user_base_url)?;
    let integrations = client.list_integrations().await?;
    if integrations.is_empty() {
        writeln!(out, "   No integrations connected yet.")?;
        writeln!(
            out,
            "   Connect Gmail, Slack, or another service, then run this script again."
        )?;
        return Ok(RunStatus::Success);
    }

    let providers: Vec<&str> = integrations.iter().map(|i| i.provider.as_str()).collect();
    writeln!(out, "   Connected integrations: {}", providers.join(", "))?;

    let response = client
        .query(FIRST_QUESTION, QueryOptions::default())
        .await?;
    writeln!(out, "\n   Answer:")?;
    writeln!(out, "   {}", response.answer)?;
    if !response.used_message_ids.is_empty() {
        writeln!(
            out,
            "\n   (Based on {} messages)",
            response.used_message_ids.len()
        )?;
    }

    write_next_steps(out)?;
    Ok(RunStatus::Success)
}

/// Print the canned walkthrough. `paced` adds the short pauses.
pub async fn run_demo(out: &mut (dyn Write + Send), paced: bool) -> Result<RunStatus, RunError> {
    let pause = |ms: u64| async move {
        if paced {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    };

    write_header(out)?;
    writeln!(out, "[DEMO MODE]\n")?;

    writeln!(out, "1. Provisioning user: demo@yourapp.com")?;
    out.flush()?;
    pause(300).await;
    writeln!(out, "   User created: 2322ac54-9642-4a9e-a504-b0d227d17fa7")?;
    writeln!(out, "   API Key: sk_live_demo_abc...")?;

    writeln!(out, "\n2. Generating connect token...")?;
    out.flush()?;
    pause(200).await;
    writeln!(out, "   Token expires: 2026-01-30T10:10:00.000Z")?;
    writeln!(out, "\n   Connect URL (open in browser):")?;
    writeln!(
        out,
        "   {}",
        connect_url("pit_demo_token", "2322ac54-...")
    )?;

    writeln!(
        out,
        "\n3. [DEMO] Skipping OAuth — simulating connected integrations.\n"
    )?;
    out.flush()?;
    pause(500).await;

    writeln!(out, "4. Querying user data...\n")?;
    writeln!(out, "   Connected integrations: gmail, slack")?;
    out.flush()?;
    pause(800).await;

    writeln!(out, "\n   Answer:\n{}", DEMO_ANSWER)?;
    writeln!(out, "\n   (Based on 23 messages)")?;

    write_next_steps(out)?;
    writeln!(out, "To run with real data, add your credentials to .env.\n")?;
    Ok(RunStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrove::ApiError;
    use crate::interact::NoopOperator;
    use chrono::TimeZone;
    use wiremock::matchers::{basic_auth, bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_provision_email_uses_millis() {
        let now = Utc.timestamp_millis_opt(1_767_600_000_123).unwrap();
        assert_eq!(
            provision_email(now),
            "quickstart-1767600000123@example.com"
        );
    }

    #[test]
    fn test_key_preview_is_fifteen_chars() {
        assert_eq!(key_preview("sk_live_abcdefghijklmnop"), "sk_live_abcdefg");
        assert_eq!(key_preview("sk_short"), "sk_short");
    }

    #[tokio::test]
    async fn test_demo_output() {
        let mut out = Vec::new();
        let status = run_demo(&mut out, false).await.unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(status, RunStatus::Success);
        assert!(printed.starts_with("\nAttrove Quickstart\n\n==================\n\n[DEMO MODE]\n"));
        assert!(printed.contains(
            "https://connect.attrove.com/integrations/connect?token=pit_demo_token&user_id=2322ac54-..."
        ));
        assert!(printed.contains("(Based on 23 messages)"));
        assert!(printed.ends_with("To run with real data, add your credentials to .env.\n\n"));
    }

    async fn mount_admin(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/admin/users"))
            .and(basic_auth("cid", "secret"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "u-42",
                "apiKey": "sk_live_0123456789abcdef"
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/admin/users/u-42/connect-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "pit_abc",
                "expires_at": "2026-01-30T10:10:00.000Z"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_live_walkthrough() {
        let server = MockServer::start().await;
        mount_admin(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/users/u-42/integrations"))
            .and(bearer_token("sk_live_0123456789abcdef"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"provider": "gmail"}, {"provider": "slack"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/users/u-42/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Mostly launch planning.",
                "used_message_ids": ["m1", "m2", "m3"]
            })))
            .mount(&server)
            .await;

        let admin = AdminClient::with_base_url("cid", "secret", &server.uri()).unwrap();
        let mut out = Vec::new();
        run_live(&admin, &server.uri(), "qs@example.com", &NoopOperator, &mut out)
            .await
            .unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(printed.contains("   User created: u-42\n   API Key: sk_live_0123456...\n"));
        assert!(printed.contains("token=pit_abc&user_id=u-42"));
        assert!(printed.contains("   Connected integrations: gmail, slack\n"));
        assert!(printed.contains("\n   Answer:\n   Mostly launch planning.\n"));
        assert!(printed.contains("(Based on 3 messages)"));
        assert!(printed.contains("Quickstart complete!"));
    }

    #[tokio::test]
    async fn test_live_stops_without_integrations() {
        let server = MockServer::start().await;
        mount_admin(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/users/u-42/integrations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let admin = AdminClient::with_base_url("cid", "secret", &server.uri()).unwrap();
        let mut out = Vec::new();
        let status = run_live(&admin, &server.uri(), "qs@example.com", &NoopOperator, &mut out)
            .await
            .unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(status, RunStatus::Success);
        assert!(printed.contains("   No integrations connected yet."));
        assert!(!printed.contains("Quickstart complete!"));
    }

    #[tokio::test]
    async fn test_bad_partner_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/admin/users"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": {"message": "Invalid client credentials"}})),
            )
            .mount(&server)
            .await;

        let admin = AdminClient::with_base_url("cid", "wrong", &server.uri()).unwrap();
        let mut out = Vec::new();
        let err = run_live(&admin, &server.uri(), "qs@example.com", &NoopOperator, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Api(ApiError::Authentication { .. })));
    }
}
