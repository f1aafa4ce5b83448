pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::path::{Path, PathBuf};

use cfr_webclient::{ProblemId, ProblemSource};
use colored::Colorize;
use error::*;

use crate::config::{Asset, Config};
use crate::interactive;
use crate::storage::{self, ContestDir};
use crate::style::{self, ConsoleListener};
use crate::testing::{CaseEvaluator, ExecutionTarget, Report, TargetFiles, TestSuite};

/// Downloads the sample tests of one problem, or of every problem of the contest,
/// into the contest directory. Returns the written suite files.
pub async fn download_contest(
    source: &dyn ProblemSource,
    contest_id: u32,
    problem_id: Option<&ProblemId>,
    cfg: &Config,
    assume_yes: bool,
) -> Result<Vec<PathBuf>> {
    let contest = ContestDir::new(&cfg.directory.contest);

    let problem_ids = match problem_id {
        Some(id) => {
            if contest.exists_suite(id) {
                let prompt = format!(
                    "Test cases for problem {} already exist. Overwrite {:?}?",
                    id,
                    contest.suite_file(id)
                );
                if !interactive::confirm(&prompt, assume_yes)? {
                    println!("Skipped problem {}", id);
                    return Ok(Vec::new());
                }
            }
            vec![id.clone()]
        }
        None => {
            let existing = contest.list_suite_files()?;
            if !existing.is_empty() {
                let prompt = format!(
                    "{:?} already has {} test case file(s). Delete them before downloading?",
                    contest.dir(),
                    existing.len()
                );
                if !interactive::confirm(&prompt, assume_yes)? {
                    bail!("Aborted: contest directory is not empty");
                }
                let n = contest.wipe_suites()?;
                log::info!("Removed {} suite file(s) from {:?}", n, contest.dir());
            }

            let ids = source
                .fetch_problem_ids(contest_id)
                .await
                .with_context(|| format!("Failed to fetch problem list of contest {}", contest_id))?;
            ensure!(!ids.is_empty(), "Contest {} lists no problems", contest_id);
            ids
        }
    };

    let mut saved = Vec::with_capacity(problem_ids.len());
    for id in &problem_ids {
        let page = source
            .fetch_problem(contest_id, id)
            .await
            .with_context(|| format!("Failed to fetch problem {} of contest {}", id, contest_id))?;
        let suite = TestSuite::from(&page);
        let path = contest
            .save_suite(id, &suite)
            .with_context(|| format!("Failed to save test cases of problem {}", id))?;

        println!(
            "contest={}, id={}, problem=\"{}\" ({} case(s)) is downloaded.",
            contest_id,
            id.as_str().bold(),
            page.title,
            suite.len()
        );
        saved.push(path);
    }
    Ok(saved)
}

/// Compiles the solution of `problem_id` and judges it against its downloaded suite.
pub async fn run_problem(problem_id: &ProblemId, cfg: &Config) -> Result<Report> {
    let dirs = &cfg.directory;

    let src = storage::find_source(&dirs.source, problem_id, |ext| cfg.is_known_lang(ext))
        .context("Cannot determine the source file")?;
    let cmd = cfg
        .test_command_for(&src.lang)
        .with_context(|| format!("Unconfigured language '{}'", src.lang))?;

    fsutil::mkdir_all(&dirs.executable)?;
    let files = TargetFiles {
        problem_id: problem_id.clone(),
        source_file: src.path,
        output_file: dirs.executable.join(problem_id.as_str()),
    };
    let target = ExecutionTarget::bind(files, &cmd, cfg.test.shell.as_deref(), cfg.time_limit())
        .with_context(|| format!("Invalid commands in [lang.{}]", src.lang))?;

    let suite = ContestDir::new(&dirs.contest).load_suite(problem_id)?;
    if suite.is_empty() {
        log::warn!("No test case recorded for problem {}", problem_id);
    }

    log::info!("Running: {}", target.execute_command());
    let evaluator = CaseEvaluator::new().comparison(cfg.test.compare);
    let report = evaluator
        .run_with_listener(&target, &suite, &mut ConsoleListener::new())
        .await?;

    style::print_report(&report);
    Ok(report)
}

/// Copies `starter.<lang>` to `<source dir>/<PROBLEM>.<lang>`.
pub fn start_problem(
    problem_id: &ProblemId,
    lang: &str,
    cfg: &Config,
    assume_yes: bool,
) -> Result<PathBuf> {
    let lang = lang.trim_start_matches('.');
    let dirs = &cfg.directory;
    if !cfg.is_known_lang(lang) {
        log::warn!("No [lang.{}] entry in the config; `cfr run` will not work yet", lang);
    }

    let starter = dirs.starter.join("starter").with_extension(lang);
    ensure!(
        starter.is_file(),
        "No starter file for '{}' (expected {:?})",
        lang,
        starter
    );

    let dest = dirs.source.join(problem_id.as_str()).with_extension(lang);
    if dest.exists() {
        let prompt = format!("{:?} already exists. Overwrite it?", dest);
        if !interactive::confirm(&prompt, assume_yes)? {
            bail!("Aborted: {:?} is left untouched", dest);
        }
    }

    fsutil::copy_file_with_mkdir(&starter, &dest)?;
    Ok(dest)
}

/// Writes the example config and starter files into `dir`. Existing files are kept.
pub fn init(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if let Ok(config_filepath) = Config::find_file_in_ancestors(dir) {
        bail!(
            "Already governed by {:?}.\nIf it's intentional, remove it and then try again.",
            config_filepath
        );
    }

    let mut written = Vec::new();
    for name in Asset::iter() {
        let dest = dir.join(name.as_ref());
        if dest.exists() {
            log::info!("Keeping existing {:?}", dest);
            continue;
        }
        let file = Asset::get(name.as_ref())
            .with_context(|| format!("Embedded asset '{}' is missing", name))?;
        fsutil::write_with_mkdir(&dest, file.data.as_ref())?;
        written.push(dest);
    }
    Ok(written)
}
