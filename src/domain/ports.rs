use crate::domain::model::{TestCase, TransformResult};
use crate::utils::error::{BatchError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a pipeline's results file is produced across test cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The whole report is written once, replacing any previous file.
    Overwrite,
    /// The file is truncated at start, then every test case block is appended.
    Append,
}

pub trait Storage {
    fn write_file(&self, name: &str, data: &[u8]) -> Result<PathBuf>;
    fn append_file(&self, name: &str, data: &[u8]) -> Result<PathBuf>;
}

/// One batch program: discover test cases, then extract, transform and
/// render each of them.
pub trait Pipeline {
    /// One input record as produced by `extract`.
    type Record;
    type Aggregate;

    fn results_file(&self) -> &str;

    fn write_mode(&self) -> WriteMode;

    fn discover(&self, input: &Path) -> Result<Vec<TestCase>>;

    fn extract(&self, case: &TestCase) -> Result<Vec<Self::Record>>;

    fn transform(
        &self,
        case: &TestCase,
        records: Vec<Self::Record>,
    ) -> TransformResult<Self::Aggregate>;

    fn render(
        &self,
        case: &TestCase,
        result: &TransformResult<Self::Aggregate>,
        elapsed: Duration,
    ) -> String;

    /// Section emitted when a single test case cannot be read.
    fn render_failure(&self, case: &TestCase, error: &BatchError) -> String {
        format!("\n=== Results for {} ===\nERROR: {}\n", case.name, error)
    }

    /// Text written ahead of the first test case, if any.
    fn preamble(&self) -> Option<String> {
        None
    }
}
