#![cfg(unix)]

use std::{path::PathBuf, time::Duration};

use cfr_core::testing::{
    CaseEvaluator, EvalError, ExecutionTarget, TargetFiles, TestCase, TestCommand, TestSuite,
    Verdict,
};
use cfr_webclient::ProblemId;

fn target(compile: Option<&str>, execute: &str) -> ExecutionTarget {
    let files = TargetFiles {
        problem_id: ProblemId::parse("A").unwrap(),
        source_file: PathBuf::from("A.txt"),
        output_file: PathBuf::from("A"),
    };
    let cmd = TestCommand {
        compile: compile.map(str::to_owned),
        execute: execute.to_owned(),
        ..Default::default()
    };
    ExecutionTarget::bind(files, &cmd, None, Duration::from_secs(2)).unwrap()
}

fn suite() -> TestSuite {
    TestSuite::new(vec![
        TestCase::new("5\n", "5\n"),
        TestCase::new("hello\n", "world\n"),
    ])
}

#[tokio::test]
async fn cat_against_two_cases() {
    let report = CaseEvaluator::new()
        .run(&target(None, "cat"), &suite())
        .await
        .unwrap();

    let verdicts: Vec<_> = report.cases().iter().map(|c| c.verdict).collect();
    assert_eq!(verdicts, [Verdict::Accepted, Verdict::WrongAnswer]);
    assert_eq!(report.accepted_count(), 1);
    assert_eq!(report.total(), 2);
    assert_eq!(report.exit_code(), 1);

    let wa = &report.cases()[1];
    assert_eq!(wa.index, 1);
    assert_eq!(wa.outcome.stdout, "hello\n");
    assert_eq!(wa.expected_output, "world\n");
}

#[tokio::test]
async fn surrounding_whitespace_is_ignored() {
    let suite = TestSuite::new(vec![TestCase::new("  42  \n\n", "42\n")]);
    let report = CaseEvaluator::new()
        .run(&target(None, "cat"), &suite)
        .await
        .unwrap();
    assert_eq!(report.cases()[0].verdict, Verdict::Accepted);
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn runtime_error_and_time_limit() {
    let suite = TestSuite::new(vec![TestCase::new("5\n", "5\n")]);

    let re = CaseEvaluator::new()
        .run(&target(None, "sh -c 'cat; exit 2'"), &suite)
        .await
        .unwrap();
    assert_eq!(re.cases()[0].verdict, Verdict::RuntimeError);
    assert_eq!(re.cases()[0].outcome.stdout, "5\n");

    let files = TargetFiles {
        problem_id: ProblemId::parse("A").unwrap(),
        source_file: PathBuf::from("A.txt"),
        output_file: PathBuf::from("A"),
    };
    let cmd = TestCommand {
        execute: "sleep 5".to_owned(),
        ..Default::default()
    };
    let slow = ExecutionTarget::bind(files, &cmd, None, Duration::from_millis(200)).unwrap();
    let tle = CaseEvaluator::new().run(&slow, &suite).await.unwrap();
    assert_eq!(tle.cases()[0].verdict, Verdict::TimeLimitExceeded);
    assert!(tle.cases()[0].outcome.timed_out);
    assert_eq!(tle.exit_code(), 1);
}

#[tokio::test]
async fn compile_failure_aborts_before_any_case() {
    let err = CaseEvaluator::new()
        .run(&target(Some("sh -c 'exit 1'"), "cat"), &suite())
        .await
        .unwrap_err();
    match err {
        EvalError::CompileFailed { command, exit_code } => {
            assert_eq!(exit_code, Some(1));
            assert_eq!(command, "sh -c 'exit 1'");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn compile_step_produces_the_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("A.sh");
    let artifact = tmp.path().join("bin/A");
    std::fs::write(&source, "#!/bin/sh\nexec cat\n").unwrap();

    let files = TargetFiles {
        problem_id: ProblemId::parse("A").unwrap(),
        source_file: source,
        output_file: artifact.clone(),
    };
    let cmd = TestCommand {
        compile: Some(
            r#"sh -c 'mkdir -p "$(dirname "$1")" && cp "$0" "$1" && chmod +x "$1"' #{source_file} #{output_file}"#
                .to_owned(),
        ),
        execute: "#{output_file}".to_owned(),
        ..Default::default()
    };
    let t = ExecutionTarget::bind(files, &cmd, None, Duration::from_secs(2)).unwrap();

    let report = CaseEvaluator::new().run(&t, &suite()).await.unwrap();
    assert!(artifact.is_file());
    assert_eq!(report.accepted_count(), 1);
    assert_eq!(report.total(), 2);
}
