use std::process::ExitCode;

use cfr_core::action;
use cfr_webclient::{Platform, ProblemId};

use super::{GlobalArgs, SubcmdResult};
use crate::config;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Contest id, as in https://codeforces.com/contest/<CONTEST_ID>
    pub contest_id: u32,

    /// Download only this problem (e.g. A, b, F2)
    #[arg(short, long)]
    pub problem: Option<ProblemId>,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load(global_args)?;
    let source = cfr_webclient::new_source(Platform::Codeforces)?;

    let saved = action::download_contest(
        source.as_ref(),
        args.contest_id,
        args.problem.as_ref(),
        &cfg,
        args.yes,
    )
    .await?;

    log::info!("Saved {} suite file(s)", saved.len());
    Ok(ExitCode::SUCCESS)
}
