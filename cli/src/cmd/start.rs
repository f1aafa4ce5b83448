use std::process::ExitCode;

use cfr_core::{action, print_success};
use cfr_webclient::ProblemId;

use super::{GlobalArgs, SubcmdResult};
use crate::{config, util};

#[derive(Debug, clap::Args)]
pub struct Args {
    pub problem: ProblemId,

    /// Language key, i.e. the file extension (cpp, py, ...)
    pub lang: String,

    /// Overwrite an existing source file without asking
    #[arg(short, long)]
    pub yes: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load(global_args)?;
    let dest = action::start_problem(&args.problem, &args.lang, &cfg, args.yes)?;
    print_success!("Created {}", util::relative_to_current_dir(&dest).display());
    Ok(ExitCode::SUCCESS)
}
