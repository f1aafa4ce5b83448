use std::process::ExitCode;

use cfr_core::action;
use cfr_webclient::ProblemId;

use super::{GlobalArgs, SubcmdResult};
use crate::config;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Problem to judge; its source is looked up as <PROBLEM>.<lang> in the source dir
    pub problem: ProblemId,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load(global_args)?;
    let report = action::run_problem(&args.problem, &cfg).await?;
    Ok(ExitCode::from(report.exit_code() as u8))
}
