use std::path::{Path, PathBuf};

use cfr_webclient::ProblemId;

use super::suite_xml::{self, SuiteError, SUITE_FILE_EXT};
use crate::testing::TestSuite;

#[derive(Debug, thiserror::Error)]
pub enum ContestError {
    #[error("No test cases for problem {problem_id} (expected '{}'); download them first", .path.display())]
    SuiteNotFound { problem_id: ProblemId, path: PathBuf },

    #[error("Cannot load test cases from '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: SuiteError,
    },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

pub type Result<T> = std::result::Result<T, ContestError>;

/// The directory holding one `<PROBLEM>.xml` suite per problem.
#[derive(Debug, Clone, Copy)]
pub struct ContestDir<'a> {
    dir: &'a Path,
}

impl<'a> ContestDir<'a> {
    #[inline]
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        self.dir
    }

    pub fn suite_file(&self, problem_id: &ProblemId) -> PathBuf {
        self.dir
            .join(problem_id.as_str())
            .with_extension(SUITE_FILE_EXT)
    }

    pub fn exists_suite(&self, problem_id: &ProblemId) -> bool {
        self.suite_file(problem_id).is_file()
    }

    pub fn load_suite(&self, problem_id: &ProblemId) -> Result<TestSuite> {
        let path = self.suite_file(problem_id);
        if !path.is_file() {
            return Err(ContestError::SuiteNotFound {
                problem_id: problem_id.clone(),
                path,
            });
        }
        let xml = fsutil::read_to_string(&path)?;
        let suite = suite_xml::parse(&xml).map_err(|e| ContestError::Malformed {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Loaded {} case(s) from {:?}", suite.len(), path);
        Ok(suite)
    }

    pub fn save_suite(&self, problem_id: &ProblemId, suite: &TestSuite) -> Result<PathBuf> {
        let path = self.suite_file(problem_id);
        fsutil::write_with_mkdir(&path, suite_xml::render(suite))?;
        log::info!("Saved {} case(s) to {:?}", suite.len(), path);
        Ok(path)
    }

    /// Suite files currently in the directory; empty when the directory does not exist.
    pub fn list_suite_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let files = fsutil::list_files(self.dir)?
            .into_iter()
            .filter(|p| p.extension().map_or(false, |ext| ext == SUITE_FILE_EXT))
            .collect();
        Ok(files)
    }

    /// Removes every suite file, leaving anything else alone. Returns how many were removed.
    pub fn wipe_suites(&self) -> Result<usize> {
        let files = self.list_suite_files()?;
        for f in &files {
            fsutil::remove_file(f)?;
        }
        Ok(files.len())
    }
}
