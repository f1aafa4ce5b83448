use anyhow::Context as _;
use cfr_core::Config;

use crate::{cmd::GlobalArgs, util};

/// Loads `--config-file` when given, otherwise the nearest cfr.toml above the current dir.
pub fn load(args: &GlobalArgs) -> anyhow::Result<Config> {
    match &args.config_file {
        Some(path) => Config::from_toml_file(path)
            .with_context(|| format!("Cannot load config {:?}", path)),
        None => Config::from_file_finding_in_ancestors(util::current_dir()),
    }
}
