use std::time::Duration;

use strum::IntoEnumIterator as _;

/// Classification of one case, in priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
pub enum Verdict {
    #[strum(serialize = "RE")]
    RuntimeError,
    #[strum(serialize = "TLE")]
    TimeLimitExceeded,
    #[strum(serialize = "WA")]
    WrongAnswer,
    #[strum(serialize = "AC")]
    Accepted,
}

impl Verdict {
    pub fn description(self) -> &'static str {
        use Verdict::*;
        match self {
            RuntimeError => "Runtime Error",
            TimeLimitExceeded => "Time Limit Exceeded",
            WrongAnswer => "Wrong Answer",
            Accepted => "Accepted",
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

/// What one execution of the program produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    /// `None` when killed by a signal or by the time limit.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
    pub timed_out: bool,
}

impl ExecutionOutcome {
    pub fn killed_at_time_limit(time_limit: Duration) -> Self {
        Self {
            exit_code: None,
            elapsed: time_limit,
            timed_out: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    pub exit_code: Option<i32>,
    /// Rendered command line; `None` when there was nothing to compile.
    pub invoked_command: Option<String>,
}

impl CompileResult {
    pub fn skipped() -> Self {
        Self {
            exit_code: Some(0),
            invoked_command: None,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub index: usize,
    pub verdict: Verdict,
    pub outcome: ExecutionOutcome,
    pub expected_output: String,
}

/// Per-run results. Built by the evaluator and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    cases: Vec<CaseRecord>,
    accepted_count: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CaseRecord) {
        if record.verdict.is_accepted() {
            self.accepted_count += 1;
        }
        self.cases.push(record);
    }

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn all_accepted(&self) -> bool {
        self.accepted_count == self.total()
    }

    pub fn count_of(&self, verdict: Verdict) -> usize {
        self.cases.iter().filter(|c| c.verdict == verdict).count()
    }

    /// Non-zero verdict counts, in priority order.
    pub fn verdict_counts(&self) -> Vec<(Verdict, usize)> {
        Verdict::iter()
            .map(|v| (v, self.count_of(v)))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// 0 when every case is accepted (including an empty run), else 1.
    pub fn exit_code(&self) -> i32 {
        if self.all_accepted() {
            0
        } else {
            1
        }
    }
}
