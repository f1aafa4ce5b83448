use std::{path::PathBuf, process::ExitCode};

use cfr_core::{action, print_success};

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let written = action::init(&args.dir)?;
    for path in &written {
        log::info!("Wrote {:?}", path);
    }
    print_success!(
        "Successfully initialized cfr directory. (path: {})",
        args.dir.to_string_lossy()
    );
    Ok(ExitCode::SUCCESS)
}
