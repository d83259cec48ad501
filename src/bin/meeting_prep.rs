use std::process::ExitCode;

use clap::Parser;

use rundown_lib::attrove::{AttroveClient, CommsApi};
use rundown_lib::cli::{init_logging, PrepCli};
use rundown_lib::config::{self, Config, USER_TOKEN_VAR};
use rundown_lib::demo::DemoApi;
use rundown_lib::diagnostics::LogSink;
use rundown_lib::error::{report_fatal, Remediation, RunError, RunStatus};
use rundown_lib::interact::{NoopOperator, Operator, StdinOperator};
use rundown_lib::prep;

const HINT: Remediation = Remediation {
    credential: "ATTROVE_USER_TOKEN (get it from admin.users.create())",
    setup_note: Some("Note: ATTROVE_USER_TOKEN is the sk_ user token, not your attrove_ API key."),
};

async fn run(cli: &PrepCli) -> Result<RunStatus, RunError> {
    let api: Box<dyn CommsApi>;
    let zone;
    if cli.demo {
        zone = config::zone_from_lookup(&|k: &str| std::env::var(k).ok())?;
        api = Box::new(DemoApi::new(zone.today(), zone));
    } else {
        let config = Config::from_env(USER_TOKEN_VAR)?;
        zone = config.zone;
        api = Box::new(AttroveClient::with_base_url(
            &config.api_key,
            &config.user_id,
            &config.base_url,
        )?);
    }

    let operator: &dyn Operator = if cli.confirm {
        &StdinOperator
    } else {
        &NoopOperator
    };

    let mut stdout = std::io::stdout();
    let summary = prep::run(
        api.as_ref(),
        zone.today(),
        &zone,
        operator,
        &LogSink,
        &mut stdout,
    )
    .await?;

    if let Some(line) = summary.failure_line() {
        eprintln!("{}", line);
    }
    Ok(summary.status())
}

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    let cli = PrepCli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(status) => status.into(),
        Err(err) => report_fatal(&err, &HINT).into(),
    }
}
