mod cmd;
mod config;
mod util;

use std::process::ExitCode;

use clap::Parser;
use cmd::GlobalArgs;

fn init_logger(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let app = GlobalArgs::parse();
    init_logger(app.verbose);

    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        ExitCode::FAILURE
    })
}
