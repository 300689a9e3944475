use crate::core::loader::{self, TC_FILE_PATTERN};
use crate::core::{Diagnostic, ParseError, Pipeline, RawRecord, Result, TestCase, TransformResult, WriteMode};
use crate::utils::format;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const RESULTS_FILE: &str = "WordCountResults.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencies {
    counts: HashMap<String, usize>,
    total: usize,
}

impl WordFrequencies {
    pub fn add(&mut self, word: String) {
        *self.counts.entry(word).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Most frequent first; ties broken by the word itself.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

pub struct WordCountPipeline {
    case_sensitive: bool,
}

impl WordCountPipeline {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    fn normalize(&self, token: &str) -> String {
        if self.case_sensitive {
            token.to_string()
        } else {
            token.to_lowercase()
        }
    }
}

impl Default for WordCountPipeline {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Pipeline for WordCountPipeline {
    type Record = RawRecord;
    type Aggregate = WordFrequencies;

    fn results_file(&self) -> &str {
        RESULTS_FILE
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::Overwrite
    }

    fn discover(&self, input: &Path) -> Result<Vec<TestCase>> {
        loader::discover_files(input, &TC_FILE_PATTERN)
    }

    fn extract(&self, case: &TestCase) -> Result<Vec<RawRecord>> {
        loader::read_records(&case.path)
    }

    fn transform(&self, case: &TestCase, records: Vec<RawRecord>) -> TransformResult<WordFrequencies> {
        let mut result = TransformResult::new(WordFrequencies::default());

        for record in &records {
            let line = record.text.trim();
            if line.is_empty() {
                result.reject(Diagnostic::new(&case.name, record, line, ParseError::EmptyLine));
                continue;
            }
            for token in line.split_whitespace() {
                result.aggregate.add(self.normalize(token));
                result.accepted += 1;
            }
        }

        result
    }

    fn render(
        &self,
        case: &TestCase,
        result: &TransformResult<WordFrequencies>,
        elapsed: Duration,
    ) -> String {
        let words = &result.aggregate;
        let mut out = format!(
            "\n=== Results for {} ===\nWord Count Results\n------------------\n",
            case.name
        );
        for (word, count) in words.ranked() {
            out.push_str(&format!("{}: {}\n", word, count));
        }
        out.push_str(&format!(
            "Distinct words: {}\nTotal words: {}\n",
            words.distinct(),
            words.total()
        ));
        out.push_str(&format!("Invalid records: {}\n", result.diagnostics.len()));
        out.push_str(&format!("Elapsed time (seconds): {}\n", format::seconds(elapsed)));
        out
    }
}
