use crate::error::*;
use async_trait::async_trait;

pub mod problem_id;
pub use problem_id::ProblemId;

pub use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Platform {
    Codeforces,
}

/// One problem page with its sample tests, in page order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProblemPage {
    pub platform: Platform,
    pub url: Url,
    pub contest_id: u32,
    pub problem_id: ProblemId,
    pub title: String,
    pub samples: Vec<SampleTestcase>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SampleTestcase {
    /// 1-origin position on the page.
    pub ord: u32,
    pub input: String,
    pub output: String,
}

/// Canonical form of a sample payload: leading and trailing blank lines are dropped and
/// a non-empty result ends with exactly one newline. Interior lines are kept verbatim.
pub fn strip_blank_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let lines: Vec<&str> = lines.into_iter().collect();
    let is_blank = |s: &&str| s.trim().is_empty();
    let Some(first) = lines.iter().position(|s| !is_blank(s)) else {
        return String::new();
    };
    let last = lines.iter().rposition(|s| !is_blank(s)).unwrap_or(first);
    let mut s = lines[first..=last].join("\n");
    s.push('\n');
    s
}

/// Where problem statements and sample tests come from.
#[async_trait]
pub trait ProblemSource: Send + Sync {
    fn platform(&self) -> Platform;

    fn problem_url(&self, contest_id: u32, problem_id: &ProblemId) -> Result<Url>;

    /// Problem ids of a contest, in the order the contest lists them.
    async fn fetch_problem_ids(&self, contest_id: u32) -> Result<Vec<ProblemId>>;

    async fn fetch_problem(&self, contest_id: u32, problem_id: &ProblemId) -> Result<ProblemPage>;
}
