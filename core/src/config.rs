use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    result::Result as StdResult,
    time::Duration,
};

use anyhow::{bail, Context as _};
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::testing::{Comparison, ExecutionTarget, TestCommand};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    #[serde(default)]
    pub directory: DirConfig,
    #[serde(default)]
    pub test: TestConfig,
    #[serde(default)]
    pub lang: BTreeMap<String, LangConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirConfig {
    pub contest: PathBuf,
    pub source: PathBuf,
    pub executable: PathBuf,
    pub starter: PathBuf,
}

impl Default for DirConfig {
    fn default() -> Self {
        Self {
            contest: "./contest".into(),
            source: "./src".into(),
            executable: "./bin".into(),
            starter: "./starter_files".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfig {
    /// Seconds per case.
    pub timeout: f64,
    pub compare: Comparison,
    pub shell: Option<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            timeout: ExecutionTarget::DEFAULT_TIME_LIMIT.as_secs_f64(),
            compare: Comparison::default(),
            shell: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LangConfig {
    pub compile: Option<String>,
    pub execute: String,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

#[derive(RustEmbed)]
#[folder = "assets/"]
pub(crate) struct Asset;

impl Config {
    pub const FILENAME: &str = "cfr.toml";

    pub fn example_toml() -> anyhow::Result<String> {
        let file = Asset::get(Self::FILENAME)
            .with_context(|| format!("'{}' is not embedded", Self::FILENAME))?;
        let toml = std::str::from_utf8(file.data.as_ref())
            .context("Embedded example config is not UTF-8")?;
        Ok(toml.to_owned())
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Loads `filepath`, resolving relative directories against the file's own directory.
    pub fn from_toml_file(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = fsutil::canonicalize_path(filepath)?;
        let toml = fsutil::read_to_string(&filepath).context("Cannot read the config file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.validate()
            .with_context(|| format!("Invalid config: {:?}", filepath))?;

        let base = filepath.parent().unwrap_or(Path::new("/"));
        cfg.directory = cfg.directory.resolved_against(base);
        cfg.source_config_file = Some(filepath);
        log::debug!("Loaded config: {:?}", cfg);
        Ok(cfg)
    }

    /// Find config file ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let cur_dir = cur_dir.as_ref();
        cur_dir
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
            .with_context(|| {
                format!(
                    "Not in a cfr directory: Cannot find '{}' in {:?} or its ancestors",
                    Self::FILENAME,
                    cur_dir
                )
            })
    }

    pub fn from_file_finding_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_filepath = Config::find_file_in_ancestors(cur_dir)?;
        Self::from_toml_file(config_filepath)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let t = self.test.timeout;
        if t <= 0.0 || Duration::try_from_secs_f64(t).is_err() {
            bail!("test.timeout must be a positive number of seconds (given {})", t);
        }
        for (ext, lang) in &self.lang {
            if lang.execute.trim().is_empty() {
                bail!("lang.{}.execute must not be empty", ext);
            }
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.test.timeout)
            .unwrap_or(ExecutionTarget::DEFAULT_TIME_LIMIT)
    }

    pub fn is_known_lang(&self, ext: &str) -> bool {
        self.lang.contains_key(ext)
    }

    pub fn test_command_for(&self, lang: &str) -> Option<TestCommand> {
        self.lang.get(lang).map(|entry| TestCommand {
            compile: entry.compile.clone(),
            execute: entry.execute.clone(),
            vars: entry.vars.clone(),
        })
    }
}

impl DirConfig {
    fn resolved_against(self, base: &Path) -> Self {
        Self {
            contest: fsutil::resolve_against(base, self.contest),
            source: fsutil::resolve_against(base, self.source),
            executable: fsutil::resolve_against(base, self.executable),
            starter: fsutil::resolve_against(base, self.starter),
        }
    }
}
