use std::process::ExitCode;

use clap::Parser;

use rundown_lib::attrove::admin::AdminClient;
use rundown_lib::cli::{init_logging, QuickstartCli};
use rundown_lib::config::{self, PartnerConfig};
use rundown_lib::error::{report_fatal, Remediation, RunError, RunStatus};
use rundown_lib::interact::StdinOperator;
use rundown_lib::quickstart::{self, provision_email};

const HINT: Remediation = Remediation {
    credential: "ATTROVE_CLIENT_ID and ATTROVE_CLIENT_SECRET (get them at https://connect.attrove.com/settings/api-keys)",
    setup_note: Some("Or run with --demo to see example output."),
};

async fn run(cli: &QuickstartCli) -> Result<RunStatus, RunError> {
    let mut stdout = std::io::stdout();
    if cli.demo || config::demo_mode_from_lookup(|k| std::env::var(k).ok()) {
        return quickstart::run_demo(&mut stdout, true).await;
    }

    let partner = PartnerConfig::from_env()?;
    let admin = AdminClient::with_base_url(
        &partner.client_id,
        &partner.client_secret,
        &partner.base_url,
    )?;
    let email = provision_email(chrono::Utc::now());
    quickstart::run_live(&admin, &partner.base_url, &email, &StdinOperator, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    let cli = QuickstartCli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(status) => status.into(),
        Err(err) => report_fatal(&err, &HINT).into(),
    }
}
