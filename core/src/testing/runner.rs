use std::{io, process::Stdio, time::Instant};

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, Command},
};

use super::{result::*, target::*};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to communicate with '{command}': {source}")]
    Communicate {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open {0} of the child process")]
    MissingPipe(&'static str),
}

/// Compiles and executes the program under test.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn compile(&self, target: &ExecutionTarget) -> Result<CompileResult, RunError>;

    async fn execute(
        &self,
        target: &ExecutionTarget,
        input: &str,
    ) -> Result<ExecutionOutcome, RunError>;
}

/// Runs real child processes. On unix every execution gets its own process group,
/// so a timeout takes down the grandchildren too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(cmdline: &CommandLine) -> Command {
        let mut std_cmd = std::process::Command::new(cmdline.program());
        std_cmd.args(cmdline.args());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt as _;
            std_cmd.process_group(0);
        }
        Command::from(std_cmd)
    }

    async fn terminate(child: &mut Child, pid: Option<u32>) {
        #[cfg(unix)]
        if let Some(pid) = pid {
            use nix::{sys::signal, unistd::Pid};
            if let Err(e) = signal::killpg(Pid::from_raw(pid as i32), signal::Signal::SIGKILL) {
                log::debug!("killpg({}) failed: {}", pid, e);
            }
        }
        #[cfg(not(unix))]
        let _ = pid;

        // The direct child may already be gone after killpg.
        if let Err(e) = child.start_kill() {
            log::debug!("Failed to kill child: {}", e);
        }
        if let Err(e) = child.wait().await {
            log::warn!("Failed to reap killed process: {}", e);
        }
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn compile(&self, target: &ExecutionTarget) -> Result<CompileResult, RunError> {
        let Some(cmdline) = target.compile_command() else {
            log::info!("No compile command for {}; skipping", target.problem_id());
            return Ok(CompileResult::skipped());
        };

        let command = cmdline.to_string();
        log::info!("Compiling: {}", command);

        let status = Self::command(cmdline)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| RunError::Spawn {
                command: command.clone(),
                source: e,
            })?;

        Ok(CompileResult {
            exit_code: status.code(),
            invoked_command: Some(command),
        })
    }

    async fn execute(
        &self,
        target: &ExecutionTarget,
        input: &str,
    ) -> Result<ExecutionOutcome, RunError> {
        let cmdline = target.execute_command();
        let time_limit = target.time_limit();

        let start_at = Instant::now();
        let mut child = Self::command(cmdline)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::Spawn {
                command: cmdline.to_string(),
                source: e,
            })?;
        let pid = child.id();

        let mut stdin = child.stdin.take().ok_or(RunError::MissingPipe("stdin"))?;
        let mut stdout = child.stdout.take().ok_or(RunError::MissingPipe("stdout"))?;
        let mut stderr = child.stderr.take().ok_or(RunError::MissingPipe("stderr"))?;

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let res = tokio::time::timeout(time_limit, async {
            let feed_stdin = async move {
                match stdin.write_all(input.as_bytes()).await {
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                    _ => (),
                }
                // closes the pipe so the child sees EOF
                drop(stdin);
                Ok(())
            };
            tokio::try_join!(
                feed_stdin,
                stdout.read_to_end(&mut stdout_buf),
                stderr.read_to_end(&mut stderr_buf),
                child.wait(),
            )
        })
        .await;
        let elapsed = start_at.elapsed();

        match res {
            Err(_) => {
                log::info!("Killing process group of '{}' (timed out)", cmdline);
                Self::terminate(&mut child, pid).await;
                Ok(ExecutionOutcome::killed_at_time_limit(time_limit))
            }

            Ok(Err(e)) => {
                Self::terminate(&mut child, pid).await;
                Err(RunError::Communicate {
                    command: cmdline.to_string(),
                    source: e,
                })
            }

            Ok(Ok((_, _, _, status))) => Ok(ExecutionOutcome {
                stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
                exit_code: status.code(),
                elapsed,
                timed_out: false,
            }),
        }
    }
}

#[cfg(all(test, unix))]
mod test {
    use std::{path::PathBuf, time::Duration};

    use cfr_webclient::ProblemId;

    use super::*;

    fn target(execute: &str, time_limit: Duration) -> ExecutionTarget {
        let files = TargetFiles {
            problem_id: ProblemId::parse("A").unwrap(),
            source_file: PathBuf::from("A.sh"),
            output_file: PathBuf::from("A"),
        };
        let cmd = TestCommand {
            compile: None,
            execute: execute.to_owned(),
            ..Default::default()
        };
        ExecutionTarget::bind(files, &cmd, None, time_limit).unwrap()
    }

    async fn run(execute: &str, input: &str) -> ExecutionOutcome {
        let t = target(execute, Duration::from_secs(2));
        dbg!(ProcessRunner.execute(&t, input).await).unwrap()
    }

    #[tokio::test]
    async fn compile_is_noop_without_command() {
        let t = target("cat", Duration::from_secs(1));
        let res = ProcessRunner.compile(&t).await.unwrap();
        assert!(res.success());
        assert_eq!(res.invoked_command, None);
    }

    #[tokio::test]
    async fn compile_reports_nonzero_exit() {
        let files = TargetFiles {
            problem_id: ProblemId::parse("A").unwrap(),
            source_file: PathBuf::from("A.sh"),
            output_file: PathBuf::from("A"),
        };
        let cmd = TestCommand {
            compile: Some("sh -c 'exit 3'".to_owned()),
            execute: "cat".to_owned(),
            ..Default::default()
        };
        let t = ExecutionTarget::bind(files, &cmd, None, Duration::from_secs(1)).unwrap();
        let res = ProcessRunner.compile(&t).await.unwrap();
        assert_eq!(res.exit_code, Some(3));
        assert!(!res.success());
        assert_eq!(res.invoked_command.as_deref(), Some("sh -c 'exit 3'"));
    }

    #[tokio::test]
    async fn echo_program_captures_stdout() {
        let out = run("cat", "1 2 3\n").await;
        assert_eq!(out.stdout, "1 2 3\n");
        assert_eq!(out.stderr, "");
        assert_eq!(out.exit_code, Some(0));
        assert!(!out.timed_out);
    }

    #[tokio::test]
    async fn nonzero_exit_status_is_kept_with_stdout() {
        let out = run("sh -c 'echo hello; echo oops >&2; exit 2'", "").await;
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.stderr, "oops\n");
        assert_eq!(out.exit_code, Some(2));
        assert!(!out.timed_out);
    }

    #[tokio::test]
    async fn input_not_read_is_fine() {
        let big_input = "9".repeat(1 << 20);
        let out = run("sh -c 'echo done'", &big_input).await;
        assert_eq!(out.stdout, "done\n");
        assert_eq!(out.exit_code, Some(0));
    }

    /// A zombie awaiting its reaper counts as dead.
    #[cfg(target_os = "linux")]
    fn is_running(pid: i32) -> bool {
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) else {
            return false;
        };
        let state = stat.rsplit(')').next().unwrap_or("").trim_start();
        !state.starts_with('Z')
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timeout_kills_the_whole_group() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!(
            "sh -c 'sleep 10 & echo $! > {}; wait'",
            pid_file.display()
        );
        let t = target(&script, Duration::from_millis(300));

        let out = ProcessRunner.execute(&t, "").await.unwrap();
        assert!(out.timed_out);
        assert_eq!(out.exit_code, None);
        assert_eq!(out.elapsed, Duration::from_millis(300));
        assert_eq!(out.stdout, "");

        let pid: i32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!is_running(pid));
    }

    #[tokio::test]
    async fn spawn_failure_is_an_error() {
        let t = target("/definitely/not/a/program", Duration::from_secs(1));
        let err = ProcessRunner.execute(&t, "").await.unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }
}
