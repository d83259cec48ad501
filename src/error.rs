//! Run-level errors and exit statuses.
//!
//! Errors are classified by where they stop the run:
//! - Configuration: missing credentials, before any remote call
//! - Remote: a classified Attrove error that aborted the whole flow
//! - Total fetch failure: every query in the batch failed
//! - Delivery: the optional e-mail step failed after the report printed

use std::process::ExitCode;

use thiserror::Error;

use crate::attrove::ApiError;
use crate::config::ConfigError;
use crate::delivery::DeliveryError;

/// Seconds suggested when a rate-limit response carries no `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("All API calls failed. Check your credentials and try again.")]
    AllSourcesFailed,

    #[error("Failed to send email: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a run ended, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every source and item succeeded.
    Success,
    /// The report was produced but some sources or items failed.
    Partial,
    /// Configuration, total or delivery failure.
    Fatal,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Fatal => 1,
            RunStatus::Partial => 2,
        }
    }

    /// `Partial` when `failures > 0`, otherwise `Success`.
    pub fn from_failures(failures: usize) -> Self {
        if failures > 0 {
            RunStatus::Partial
        } else {
            RunStatus::Success
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Per-tool wording for remediation hints.
#[derive(Debug, Clone, Copy)]
pub struct Remediation {
    /// What to check after an authentication failure.
    pub credential: &'static str,
    /// Extra line printed under a missing-credentials error.
    pub setup_note: Option<&'static str>,
}

impl RunError {
    /// Lines printed to stderr when the run stops on this error.
    pub fn remediation_lines(&self, hint: &Remediation) -> Vec<String> {
        match self {
            RunError::Config(err) => {
                let mut lines = vec![err.to_string()];
                if matches!(
                    err,
                    ConfigError::MissingCredentials { .. }
                        | ConfigError::MissingPartnerCredentials { .. }
                ) {
                    lines.push("Copy .env.example to .env and add your credentials.".to_string());
                    if let Some(note) = hint.setup_note {
                        lines.push(note.to_string());
                    }
                }
                lines
            }
            RunError::Api(err) => api_error_lines(err, hint),
            RunError::AllSourcesFailed => vec![String::new(), self.to_string()],
            RunError::Delivery(err) => vec![
                String::new(),
                format!("Failed to send email: {}", err),
                "The digest was printed above. Check your RESEND_API_KEY and SEND_TO settings."
                    .to_string(),
            ],
            RunError::Io(err) => vec![format!("Error: {}", err)],
        }
    }
}

/// Print the remediation lines for a run-stopping error to stderr.
pub fn report_fatal(err: &RunError, hint: &Remediation) -> RunStatus {
    log::debug!("run stopped: {:?}", err);
    for line in err.remediation_lines(hint) {
        eprintln!("{}", line);
    }
    RunStatus::Fatal
}

fn api_error_lines(err: &ApiError, hint: &Remediation) -> Vec<String> {
    match err {
        ApiError::Authentication { message } => vec![
            format!("Authentication Error: {}", message),
            format!("  Check your {}", hint.credential),
        ],
        ApiError::RateLimit {
            message,
            retry_after,
        } => vec![
            format!("Rate Limited: {}", message),
            format!(
                "  Please wait {} seconds before retrying",
                retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)
            ),
        ],
        ApiError::Api { code, message, .. } => {
            let mut lines = vec![format!("API Error [{}]: {}", code, message)];
            if let Some(status) = err.status() {
                lines.push(format!("  HTTP Status: {}", status));
            }
            lines
        }
        other => vec![format!("Error: {}", other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HINT: Remediation = Remediation {
        credential: "ATTROVE_USER_TOKEN",
        setup_note: Some("Note: ATTROVE_USER_TOKEN is the sk_ user token."),
    };

    #[test]
    fn test_exit_codes_are_distinct() {
        assert_eq!(RunStatus::Success.code(), 0);
        assert_eq!(RunStatus::Fatal.code(), 1);
        assert_eq!(RunStatus::Partial.code(), 2);
        assert_eq!(RunStatus::from_failures(0), RunStatus::Success);
        assert_eq!(RunStatus::from_failures(3), RunStatus::Partial);
    }

    #[test]
    fn test_rate_limit_defaults_to_sixty_seconds() {
        let err = RunError::Api(ApiError::RateLimit {
            message: "Too many requests".to_string(),
            retry_after: None,
        });
        let lines = err.remediation_lines(&HINT);
        assert_eq!(lines[1], "  Please wait 60 seconds before retrying");

        let err = RunError::Api(ApiError::RateLimit {
            message: "Too many requests".to_string(),
            retry_after: Some(15),
        });
        assert_eq!(
            err.remediation_lines(&HINT)[1],
            "  Please wait 15 seconds before retrying"
        );
    }

    #[test]
    fn test_auth_hint_names_credential() {
        let err = RunError::Api(ApiError::Authentication {
            message: "Invalid API key".to_string(),
        });
        assert_eq!(
            err.remediation_lines(&HINT),
            vec![
                "Authentication Error: Invalid API key".to_string(),
                "  Check your ATTROVE_USER_TOKEN".to_string(),
            ]
        );
    }

    #[test]
    fn test_api_error_with_and_without_status() {
        let err = RunError::Api(ApiError::Api {
            code: "INTERNAL_ERROR".to_string(),
            message: "Upstream failed".to_string(),
            status: Some(503),
        });
        assert_eq!(
            err.remediation_lines(&HINT),
            vec![
                "API Error [INTERNAL_ERROR]: Upstream failed".to_string(),
                "  HTTP Status: 503".to_string(),
            ]
        );

        let err = RunError::Api(ApiError::Api {
            code: "BAD".to_string(),
            message: "nope".to_string(),
            status: None,
        });
        assert_eq!(err.remediation_lines(&HINT).len(), 1);
    }

    #[test]
    fn test_missing_credentials_lines() {
        let err = RunError::Config(ConfigError::MissingCredentials {
            key_var: "ATTROVE_USER_TOKEN",
            user_var: "ATTROVE_USER_ID",
        });
        let lines = err.remediation_lines(&HINT);
        assert_eq!(lines[0], "Missing ATTROVE_USER_TOKEN or ATTROVE_USER_ID.");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_unrecognized_error_is_generic() {
        let err = RunError::Api(ApiError::Validation("userId is required".to_string()));
        assert_eq!(
            err.remediation_lines(&HINT),
            vec!["Error: userId is required".to_string()]
        );
    }
}
