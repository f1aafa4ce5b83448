use std::{fmt, str::FromStr};

use ::lazy_regex::{lazy_regex, Lazy, Regex};

static RE_PROBLEM_ID: Lazy<Regex> = lazy_regex!(r"^[A-Za-z][0-9A-Za-z]*$");

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid problem id '{0}' (expected a letter followed by letters or digits, e.g. 'A', 'F2')")]
pub struct ParseProblemIdError(String);

/// Problem identification inside a contest, normalized to upper case.
/// (e.g.) "A", "B", "F2"
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ProblemId(String);

impl ProblemId {
    pub fn parse(s: &str) -> Result<Self, ParseProblemIdError> {
        let s = s.trim();
        if !RE_PROBLEM_ID.is_match(s) {
            return Err(ParseProblemIdError(s.to_owned()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive comparison against a file stem such as `"a"` of `a.cpp`.
    pub fn matches_stem(&self, stem: &str) -> bool {
        self.0.eq_ignore_ascii_case(stem)
    }
}

impl FromStr for ProblemId {
    type Err = ParseProblemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProblemId {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<ProblemId> for String {
    fn from(value: ProblemId) -> Self {
        value.0
    }
}
