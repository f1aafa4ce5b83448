use std::slice;

use cfr_webclient::ProblemPage;

/// One sample: what to feed on stdin and what stdout should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// Test cases of one problem, in recording order. Index `i` is reported as "Case #i".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuite {
    source_url: Option<String>,
    cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self {
            source_url: None,
            cases,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, TestCase> {
        self.cases.iter()
    }
}

impl FromIterator<TestCase> for TestSuite {
    fn from_iter<I: IntoIterator<Item = TestCase>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<&ProblemPage> for TestSuite {
    fn from(page: &ProblemPage) -> Self {
        page.samples
            .iter()
            .map(|s| TestCase::new(s.input.as_str(), s.output.as_str()))
            .collect::<TestSuite>()
            .with_source_url(page.url.as_str())
    }
}

impl<'a> IntoIterator for &'a TestSuite {
    type Item = &'a TestCase;
    type IntoIter = slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
