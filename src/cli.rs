//! Command-line arguments for the four binaries.

use clap::Parser;

/// Print today's digest: calendar, recent threads and an AI summary.
#[derive(Parser, Debug, Default)]
#[command(name = "daily-rundown", version)]
pub struct RundownCli {
    /// Also e-mail the digest through Resend (needs RESEND_API_KEY and SEND_TO).
    #[arg(long, default_value_t = false)]
    pub send: bool,

    /// Build the digest from bundled sample data instead of the live API.
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Log debug output to stderr.
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Prep briefs for every meeting in the next day.
#[derive(Parser, Debug, Default)]
#[command(name = "meeting-prep", version)]
pub struct PrepCli {
    /// Pause for Enter after listing the meetings.
    #[arg(long, default_value_t = false)]
    pub confirm: bool,

    /// Prep from bundled sample data instead of the live API.
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Ask your email, Slack and calendar a question.
#[derive(Parser, Debug, Default)]
#[command(name = "search-agent", version)]
pub struct SearchCli {
    /// Question words; defaults to "important updates this week".
    #[arg(value_name = "QUESTION", trailing_var_arg = true)]
    pub question: Vec<String>,

    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Provision a user, connect an integration and run a first query.
#[derive(Parser, Debug, Default)]
#[command(name = "quickstart", version)]
pub struct QuickstartCli {
    /// Show example output without credentials (also DEMO_MODE=true).
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Initialise `env_logger`. `RUST_LOG` wins over the default filter.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_timestamp(None)
    .try_init();
}
