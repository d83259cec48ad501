use std::process::ExitCode;

use clap::Parser;

use rundown_lib::attrove::AttroveClient;
use rundown_lib::cli::{init_logging, SearchCli};
use rundown_lib::config::{self, Config, USER_TOKEN_VAR};
use rundown_lib::error::{report_fatal, Remediation, RunError, RunStatus};
use rundown_lib::search::{self, question_from_args};

const HINT: Remediation = Remediation {
    credential: "ATTROVE_USER_TOKEN (get it from admin.users.create())",
    setup_note: Some("Note: ATTROVE_USER_TOKEN is the sk_ user token, not your attrove_ API key."),
};

async fn run(cli: &SearchCli) -> Result<RunStatus, RunError> {
    let question = question_from_args(&cli.question);
    let config = Config::from_env(USER_TOKEN_VAR)?;
    let client = AttroveClient::with_base_url(&config.api_key, &config.user_id, &config.base_url)?;

    let mut stdout = std::io::stdout();
    search::run(&client, &question, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    let cli = SearchCli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(status) => status.into(),
        Err(err) => report_fatal(&err, &HINT).into(),
    }
}
