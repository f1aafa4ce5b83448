use std::{
    collections::{BTreeMap, HashMap},
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use cfr_webclient::ProblemId;

use crate::str_interp::{self, InterpError, SplitError};

/// Command templates of one language, before placeholders are bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCommand {
    pub compile: Option<String>,
    pub execute: String,
    /// Extra placeholders provided by the language entry.
    pub vars: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Cannot bind placeholders of {kind} command '{template}': {source}")]
    Interp {
        kind: &'static str,
        template: String,
        #[source]
        source: InterpError,
    },

    #[error("Cannot split {kind} command '{template}' into words: {source}")]
    Split {
        kind: &'static str,
        template: String,
        #[source]
        source: SplitError,
    },

    #[error("Empty {0} command")]
    EmptyCommand(&'static str),

    #[error("Time limit must be positive (given {0:?})")]
    NonPositiveTimeLimit(Duration),
}

/// A fully bound command: program plus argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Binds `template` once. With a `shell`, the interpolated string becomes
    /// `<shell> -c <string>`; otherwise the template is split into words first and
    /// each word is interpolated on its own, so substituted paths never get re-split.
    fn bind(
        kind: &'static str,
        template: &str,
        vars: &HashMap<&str, &OsStr>,
        shell: Option<&Path>,
    ) -> Result<Self, TargetError> {
        let interp = |s: &str| {
            str_interp::interp(s, vars).map_err(|e| TargetError::Interp {
                kind,
                template: template.to_owned(),
                source: e,
            })
        };

        if let Some(shell) = shell {
            if template.trim().is_empty() {
                return Err(TargetError::EmptyCommand(kind));
            }
            let cmd = interp(template)?;
            return Ok(Self::new(shell.to_string_lossy(), ["-c".to_owned(), cmd]));
        }

        let words = str_interp::split_words(template).map_err(|e| TargetError::Split {
            kind,
            template: template.to_owned(),
            source: e,
        })?;
        let mut words = words
            .iter()
            .map(|w| interp(w.as_str()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let Some(program) = words.next() else {
            return Err(TargetError::EmptyCommand(kind));
        };
        Ok(Self::new(program, words))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn quoted(word: &str) -> String {
            let plain = !word.is_empty()
                && !word
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\'));
            if plain {
                word.to_owned()
            } else {
                format!("'{}'", word.replace('\'', r#"'"'"'"#))
            }
        }

        write!(f, "{}", quoted(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quoted(arg))?;
        }
        Ok(())
    }
}

/// Paths and identity of the program under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFiles {
    pub problem_id: ProblemId,
    pub source_file: PathBuf,
    pub output_file: PathBuf,
}

/// The program under test: bound commands plus its per-case time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTarget {
    files: TargetFiles,
    compile: Option<CommandLine>,
    execute: CommandLine,
    time_limit: Duration,
}

impl ExecutionTarget {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(2);

    /// Placeholder names every template may use, besides the language's own vars.
    pub const PLACEHOLDERS: [&'static str; 3] = ["source_file", "output_file", "problem_id"];

    pub fn bind(
        files: TargetFiles,
        cmd: &TestCommand,
        shell: Option<&Path>,
        time_limit: Duration,
    ) -> Result<Self, TargetError> {
        if time_limit.is_zero() {
            return Err(TargetError::NonPositiveTimeLimit(time_limit));
        }

        let vars = Self::make_cmd_interp_vars(&files, &cmd.vars);
        let compile = cmd
            .compile
            .as_deref()
            .filter(|tmpl| !tmpl.trim().is_empty())
            .map(|tmpl| CommandLine::bind("compile", tmpl, &vars, shell))
            .transpose()?;
        let execute = CommandLine::bind("execute", &cmd.execute, &vars, shell)?;

        Ok(Self {
            files,
            compile,
            execute,
            time_limit,
        })
    }

    fn make_cmd_interp_vars<'a>(
        files: &'a TargetFiles,
        lang_vars: &'a BTreeMap<String, String>,
    ) -> HashMap<&'a str, &'a OsStr> {
        let mut m: HashMap<&str, &OsStr> = lang_vars
            .iter()
            .map(|(k, v)| (k.as_str(), OsStr::new(v)))
            .collect();
        for name in Self::PLACEHOLDERS {
            if m.contains_key(name) {
                log::warn!("Language variable '{}' is shadowed by the builtin one", name);
            }
        }
        m.insert("source_file", files.source_file.as_os_str());
        m.insert("output_file", files.output_file.as_os_str());
        m.insert("problem_id", OsStr::new(files.problem_id.as_str()));
        m
    }

    pub fn problem_id(&self) -> &ProblemId {
        &self.files.problem_id
    }

    pub fn source_file(&self) -> &Path {
        &self.files.source_file
    }

    pub fn output_file(&self) -> &Path {
        &self.files.output_file
    }

    pub fn compile_command(&self) -> Option<&CommandLine> {
        self.compile.as_ref()
    }

    pub fn execute_command(&self) -> &CommandLine {
        &self.execute
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn files() -> TargetFiles {
        TargetFiles {
            problem_id: ProblemId::parse("a").unwrap(),
            source_file: PathBuf::from("/work/my src/A.cpp"),
            output_file: PathBuf::from("/work/bin/A"),
        }
    }

    fn cpp() -> TestCommand {
        TestCommand {
            compile: Some("g++ -std=#{std} -o #{output_file} #{source_file}".to_owned()),
            execute: "#{output_file}".to_owned(),
            vars: [("std".to_owned(), "c++17".to_owned())].into(),
        }
    }

    #[test]
    fn bind_builds_argv_without_resplitting_paths() {
        let t = ExecutionTarget::bind(files(), &cpp(), None, Duration::from_secs(2)).unwrap();

        let compile = t.compile_command().unwrap();
        assert_eq!(compile.program(), "g++");
        assert_eq!(
            compile.args(),
            ["-std=c++17", "-o", "/work/bin/A", "/work/my src/A.cpp"]
        );
        assert_eq!(
            compile.to_string(),
            "g++ -std=c++17 -o /work/bin/A '/work/my src/A.cpp'"
        );
        assert_eq!(t.execute_command(), &CommandLine::new("/work/bin/A", Vec::<String>::new()));
        assert_eq!(t.problem_id().as_str(), "A");
    }

    #[test]
    fn bind_through_shell() {
        let cmd = TestCommand {
            compile: None,
            execute: "python3 #{source_file} < /dev/stdin".to_owned(),
            ..Default::default()
        };
        let t = ExecutionTarget::bind(files(), &cmd, Some(Path::new("/bin/sh")), Duration::from_secs(1))
            .unwrap();
        assert_eq!(t.compile_command(), None);
        assert_eq!(t.execute_command().program(), "/bin/sh");
        assert_eq!(
            t.execute_command().args(),
            ["-c", "python3 /work/my src/A.cpp < /dev/stdin"]
        );
    }

    #[test]
    fn blank_compile_means_no_compile_step() {
        let cmd = TestCommand {
            compile: Some("  ".to_owned()),
            execute: "cat".to_owned(),
            ..Default::default()
        };
        let t = ExecutionTarget::bind(files(), &cmd, None, Duration::from_secs(2)).unwrap();
        assert!(t.compile_command().is_none());
    }

    #[test]
    fn bind_rejects_bad_templates() {
        let undefined = TestCommand {
            execute: "#{nope}".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            ExecutionTarget::bind(files(), &undefined, None, Duration::from_secs(2)),
            Err(TargetError::Interp { kind: "execute", .. })
        ));

        let empty = TestCommand::default();
        assert!(matches!(
            ExecutionTarget::bind(files(), &empty, None, Duration::from_secs(2)),
            Err(TargetError::EmptyCommand("execute"))
        ));

        let unclosed = TestCommand {
            execute: "echo 'oops".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            ExecutionTarget::bind(files(), &unclosed, None, Duration::from_secs(2)),
            Err(TargetError::Split { .. })
        ));
    }

    #[test]
    fn bind_rejects_zero_time_limit() {
        let cmd = TestCommand {
            execute: "cat".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            ExecutionTarget::bind(files(), &cmd, None, Duration::ZERO),
            Err(TargetError::NonPositiveTimeLimit(_))
        ));
    }
}
