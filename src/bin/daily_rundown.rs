use std::process::ExitCode;

use clap::Parser;

use rundown_lib::attrove::{AttroveClient, CommsApi};
use rundown_lib::cli::{init_logging, RundownCli};
use rundown_lib::config::{self, Config, DeliveryConfig, SECRET_KEY_VAR};
use rundown_lib::delivery::ResendMailer;
use rundown_lib::demo::DemoApi;
use rundown_lib::diagnostics::LogSink;
use rundown_lib::error::{report_fatal, Remediation, RunError, RunStatus};
use rundown_lib::rundown::{self, Delivery};

const HINT: Remediation = Remediation {
    credential: "ATTROVE_SECRET_KEY (get it from admin.users.create())",
    setup_note: Some(
        "Note: ATTROVE_SECRET_KEY is the sk_ per-user key, not your partner client_id/client_secret.",
    ),
};

async fn run(cli: &RundownCli) -> Result<RunStatus, RunError> {
    let sink = LogSink;

    let api: Box<dyn CommsApi>;
    let zone;
    if cli.demo {
        zone = config::zone_from_lookup(&|k: &str| std::env::var(k).ok())?;
        api = Box::new(DemoApi::new(zone.today(), zone));
    } else {
        let config = Config::from_env(SECRET_KEY_VAR)?;
        zone = config.zone;
        api = Box::new(AttroveClient::with_base_url(
            &config.api_key,
            &config.user_id,
            &config.base_url,
        )?);
    }

    let built = rundown::build(api.as_ref(), zone.today(), &zone, &sink).await?;

    // Missing Resend settings surface only after the report is printed.
    let settings = cli.send.then(DeliveryConfig::from_env);
    let mailer = match &settings {
        Some(Ok(settings)) => Some((ResendMailer::new(settings)?, settings.send_to.clone())),
        _ => None,
    };
    let delivery = match (settings, &mailer) {
        (Some(Err(err)), _) => Delivery::Unconfigured(err),
        (_, Some((mailer, to))) => Delivery::Email {
            mailer,
            to: to.clone(),
        },
        _ => Delivery::PrintOnly,
    };

    let mut stdout = std::io::stdout();
    rundown::emit(&built, &mut stdout, delivery).await
}

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    let cli = RundownCli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(status) => status.into(),
        Err(err) => report_fatal(&err, &HINT).into(),
    }
}
