use super::{compare::Comparison, result::*, runner::*, target::*, testcase::*};

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Compile error: '{command}' exited with {}", exit_code_str(.exit_code))]
    CompileFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error(transparent)]
    Run(#[from] RunError),
}

fn exit_code_str(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_owned(),
    }
}

/// Progress hooks. Every method defaults to a no-op.
pub trait EvalListener {
    fn on_compile_start(&mut self, _command: &CommandLine) {}
    fn on_compile_finish(&mut self, _result: &CompileResult) {}
    fn on_case_start(&mut self, _index: usize, _case: &TestCase) {}
    fn on_case_finish(&mut self, _record: &CaseRecord) {}
}

impl EvalListener for () {}

/// Compiles once, then runs every case of a suite in order and classifies each one.
#[derive(Debug, Clone, Default)]
pub struct CaseEvaluator<R = ProcessRunner> {
    runner: R,
    comparison: Comparison,
}

impl CaseEvaluator<ProcessRunner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Runner> CaseEvaluator<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            comparison: Comparison::default(),
        }
    }

    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub async fn run(
        &self,
        target: &ExecutionTarget,
        suite: &TestSuite,
    ) -> Result<Report, EvalError> {
        self.run_with_listener(target, suite, &mut ()).await
    }

    pub async fn run_with_listener<L: EvalListener + ?Sized>(
        &self,
        target: &ExecutionTarget,
        suite: &TestSuite,
        listener: &mut L,
    ) -> Result<Report, EvalError> {
        if let Some(cmd) = target.compile_command() {
            listener.on_compile_start(cmd);
        }
        let compiled = self.runner.compile(target).await?;
        listener.on_compile_finish(&compiled);
        if !compiled.success() {
            return Err(EvalError::CompileFailed {
                command: compiled.invoked_command.unwrap_or_default(),
                exit_code: compiled.exit_code,
            });
        }

        let mut report = Report::new();
        for (index, case) in suite.iter().enumerate() {
            listener.on_case_start(index, case);

            let outcome = self.runner.execute(target, &case.input).await?;
            let verdict = self.classify(&outcome, &case.expected_output);
            log::debug!("Case #{}: {} in {:?}", index, verdict, outcome.elapsed);

            let record = CaseRecord {
                index,
                verdict,
                outcome,
                expected_output: case.expected_output.clone(),
            };
            listener.on_case_finish(&record);
            report.push(record);
        }
        Ok(report)
    }

    pub fn classify(&self, outcome: &ExecutionOutcome, expected: &str) -> Verdict {
        if !outcome.timed_out && outcome.exit_code != Some(0) {
            Verdict::RuntimeError
        } else if outcome.timed_out {
            Verdict::TimeLimitExceeded
        } else if self.comparison.matches(&outcome.stdout, expected) {
            Verdict::Accepted
        } else {
            Verdict::WrongAnswer
        }
    }
}
