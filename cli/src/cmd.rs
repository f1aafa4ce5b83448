pub mod download;
pub mod init;
pub mod run;
pub mod start;

use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Use this config file instead of searching for cfr.toml upward from the current dir
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Print what is going on (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    #[command(alias("dc"))]
    Download(download::Args),

    #[command(alias("r"))]
    Run(run::Args),

    #[command(alias("sp"))]
    Start(start::Args),

    Init(init::Args),
}

pub type SubcmdResult = anyhow::Result<ExitCode>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Download(args) => download::exec(args, self).await,
            Run(args) => run::exec(args, self).await,
            Start(args) => start::exec(args, self),
            Init(args) => init::exec(args, self),
        }
    }
}
