use crate::core::loader::{self, TC_FILE_PATTERN};
use crate::core::{Diagnostic, ParseError, Pipeline, RawRecord, Result, TestCase, TransformResult, WriteMode};
use crate::utils::format;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use std::time::Duration;

pub const RESULTS_FILE: &str = "StatisticsResults.txt";
pub const DEFAULT_PRECISION: usize = 6;

/// Denominator used for variance and standard deviation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum VarianceKind {
    /// n - 1
    #[default]
    Sample,
    /// n
    Population,
}

impl VarianceKind {
    pub fn label(&self) -> &'static str {
        match self {
            VarianceKind::Sample => "sample",
            VarianceKind::Population => "population",
        }
    }

    fn denominator(&self, n: usize) -> Option<f64> {
        let d = match self {
            VarianceKind::Sample => n.checked_sub(1)?,
            VarianceKind::Population => n,
        };
        (d > 0).then_some(d as f64)
    }
}

/// Every accepted value, in input order.
#[derive(Debug, Clone, Default)]
pub struct NumericSample {
    values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub modes: Vec<f64>,
    pub variance: Option<f64>,
    pub std_dev: Option<f64>,
}

impl NumericSample {
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let n = self.len() as f64;
        let sum: f64 = self.values.iter().sum();
        if sum.is_finite() {
            Some(sum / n)
        } else {
            Some(self.values.iter().map(|v| v / n).sum())
        }
    }

    /// Square of [`Self::std_dev`]; infinite when the true variance exceeds
    /// the `f64` range.
    pub fn variance(&self, kind: VarianceKind) -> Option<f64> {
        self.std_dev(kind).map(|sd| sd * sd)
    }

    /// Second pass over the values. Half-deviations are scaled by the largest
    /// one so neither the differences nor their squares overflow.
    pub fn std_dev(&self, kind: VarianceKind) -> Option<f64> {
        let denominator = kind.denominator(self.len())?;
        let half_mean = self.mean()? / 2.0;
        let halves: Vec<f64> = self.values.iter().map(|v| v / 2.0 - half_mean).collect();
        let scale = halves.iter().fold(0.0_f64, |max, d| max.max(d.abs()));
        if scale == 0.0 {
            return Some(0.0);
        }
        let squares: f64 = halves.iter().map(|d| (d / scale).powi(2)).sum();
        Some(2.0 * scale * (squares / denominator).sqrt())
    }

    fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    pub fn median(&self) -> Option<f64> {
        median_of_sorted(&self.sorted())
    }

    /// All values sharing the highest frequency, ascending. Empty when no value
    /// repeats.
    pub fn modes(&self) -> Vec<f64> {
        modes_of_sorted(&self.sorted())
    }

    pub fn summarize(&self, kind: VarianceKind) -> Option<Summary> {
        let sorted = self.sorted();
        Some(Summary {
            count: self.len(),
            mean: self.mean()?,
            median: median_of_sorted(&sorted)?,
            modes: modes_of_sorted(&sorted),
            variance: self.variance(kind),
            std_dev: self.std_dev(kind),
        })
    }
}

fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

fn modes_of_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut modes = Vec::new();
    let mut best = 1;
    let mut start = 0;

    while start < sorted.len() {
        let value = sorted[start];
        let run = sorted[start..]
            .iter()
            .take_while(|&&v| v.total_cmp(&value) == Ordering::Equal || v == value)
            .count();

        match run.cmp(&best) {
            Ordering::Greater => {
                best = run;
                modes.clear();
                modes.push(value);
            }
            Ordering::Equal if run > 1 => modes.push(value),
            _ => {}
        }
        start += run;
    }

    modes
}

pub struct StatisticsPipeline {
    variance: VarianceKind,
    precision: usize,
}

impl StatisticsPipeline {
    pub fn new(variance: VarianceKind, precision: usize) -> Self {
        Self {
            variance,
            precision,
        }
    }

    fn number(&self, value: f64) -> String {
        format::fixed(value, self.precision)
    }

    fn optional(&self, value: Option<f64>) -> String {
        value
            .map(|v| self.number(v))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl Default for StatisticsPipeline {
    fn default() -> Self {
        Self::new(VarianceKind::default(), DEFAULT_PRECISION)
    }
}

pub fn parse_number(token: &str) -> std::result::Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ParseError::NotANumber)
}

impl Pipeline for StatisticsPipeline {
    type Record = RawRecord;
    type Aggregate = NumericSample;

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

    fn transform(&self, case: &TestCase, records: Vec<RawRecord>) -> TransformResult<NumericSample> {
        let mut result = TransformResult::new(NumericSample::default());

        for record in &records {
            for token in loader::tokenize(&record.text) {
                match parse_number(token) {
                    Ok(value) => {
                        result.aggregate.push(value);
                        result.accepted += 1;
                    }
                    Err(reason) => {
                        result.reject(Diagnostic::new(&case.name, record, token, reason))
                    }
                }
            }
        }

        result
    }

    fn render(
        &self,
        case: &TestCase,
        result: &TransformResult<NumericSample>,
        elapsed: Duration,
    ) -> String {
        let mut out = format!(
            "\n=== Results for {} ===\nDescriptive Statistics Results\n-------------------------------\n",
            case.name
        );

        match result.aggregate.summarize(self.variance) {
            None => out.push_str("No valid numeric data found. No statistics computed.\n"),
            Some(summary) => {
                let modes = if summary.modes.is_empty() {
                    "No mode".to_string()
                } else {
                    summary
                        .modes
                        .iter()
                        .map(|m| self.number(*m))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let label = self.variance.label();

                out.push_str(&format!("Count: {}\n", summary.count));
                out.push_str(&format!("Mean: {}\n", self.number(summary.mean)));
                out.push_str(&format!("Median: {}\n", self.number(summary.median)));
                out.push_str(&format!("Mode: {}\n", modes));
                out.push_str(&format!(
                    "Variance ({}): {}\n",
                    label,
                    self.optional(summary.variance)
                ));
                out.push_str(&format!(
                    "Standard Deviation ({}): {}\n",
                    label,
                    self.optional(summary.std_dev)
                ));
            }
        }

        out.push_str(&format!("Invalid records: {}\n", result.diagnostics.len()));
        out.push_str(&format!("Elapsed time (seconds): {}\n", format::seconds(elapsed)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(values: &[f64]) -> NumericSample {
        let mut sample = NumericSample::default();
        for v in values {
            sample.push(*v);
        }
        sample
    }

    fn records(lines: &[&str]) -> Vec<RawRecord> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| RawRecord::new(i + 1, *line))
            .collect()
    }

    fn case() -> TestCase {
        TestCase::new(PathBuf::from("TC1.txt"))
    }

    #[test]
    fn test_one_to_four() {
        let s = sample(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.mean(), Some(2.5));
        assert_eq!(s.median(), Some(2.5));
        let sd = s.std_dev(VarianceKind::Sample).unwrap();
        assert!((sd - 1.2909944).abs() < 1e-6);
        let pop = s.variance(VarianceKind::Population).unwrap();
        assert!((pop - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_variance_is_deterministic() {
        let a = sample(&[3.5, 1.25, 9.0, 9.0, -4.0]);
        let b = sample(&[3.5, 1.25, 9.0, 9.0, -4.0]);
        assert_eq!(
            a.variance(VarianceKind::Sample),
            b.variance(VarianceKind::Sample)
        );
    }

    #[test]
    fn test_variance_with_large_offset() {
        let s = sample(&[1e9 + 4.0, 1e9 + 7.0, 1e9 + 13.0, 1e9 + 16.0]);
        let v = s.variance(VarianceKind::Sample).unwrap();
        assert!((v - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_huge_spread_never_collapses_to_zero() {
        let s = sample(&[1e150, -1e150]);
        let v = s.variance(VarianceKind::Sample).unwrap();
        assert!((v / 2e300 - 1.0).abs() < 1e-12);

        let s = sample(&[1e200, -1e200]);
        let sd = s.std_dev(VarianceKind::Sample).unwrap();
        assert!((sd / (2f64.sqrt() * 1e200) - 1.0).abs() < 1e-12);
        let v = s.variance(VarianceKind::Sample).unwrap();
        assert!(v.is_infinite() && v > 0.0);
    }

    #[test]
    fn test_mean_of_values_near_the_f64_limit() {
        let s = sample(&[f64::MAX, f64::MAX]);
        assert_eq!(s.mean(), Some(f64::MAX));
        assert_eq!(s.std_dev(VarianceKind::Population), Some(0.0));
    }

    #[test]
    fn test_single_value_has_no_sample_variance() {
        let s = sample(&[5.0]);
        assert_eq!(s.variance(VarianceKind::Sample), None);
        assert_eq!(s.variance(VarianceKind::Population), Some(0.0));
    }

    #[test]
    fn test_odd_median() {
        assert_eq!(sample(&[9.0, 1.0, 5.0]).median(), Some(5.0));
    }

    #[test]
    fn test_modes_report_all_ties() {
        assert_eq!(sample(&[3.0, 1.0, 3.0, 1.0, 2.0]).modes(), vec![1.0, 3.0]);
        assert_eq!(sample(&[2.0, 2.0, 2.0, 1.0, 1.0]).modes(), vec![2.0]);
        assert!(sample(&[1.0, 2.0, 3.0]).modes().is_empty());
    }

    #[test]
    fn test_malformed_token_yields_one_diagnostic() {
        let pipeline = StatisticsPipeline::default();
        let clean = pipeline.transform(&case(), records(&["1", "2", "3"]));
        let dirty = pipeline.transform(&case(), records(&["1", "abc", "2", "3"]));

        assert_eq!(dirty.diagnostics.len(), 1);
        assert_eq!(dirty.diagnostics[0].line, 2);
        assert_eq!(dirty.diagnostics[0].content, "abc");
        assert_eq!(dirty.aggregate.len(), clean.aggregate.len());
        assert_eq!(dirty.aggregate.mean(), clean.aggregate.mean());
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        assert!(parse_number("inf").is_err());
        assert!(parse_number("NaN").is_err());
        assert_eq!(parse_number("-1.5e2"), Ok(-150.0));
    }

    #[test]
    fn test_comma_separated_values_and_blank_lines() {
        let pipeline = StatisticsPipeline::default();
        let result = pipeline.transform(&case(), records(&["1, 2", "", "3 4"]));
        assert_eq!(result.accepted, 4);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_render_fixed_precision() {
        let pipeline = StatisticsPipeline::default();
        let result = pipeline.transform(&case(), records(&["1", "2", "3", "4"]));
        let text = pipeline.render(&case(), &result, Duration::from_millis(1));

        assert!(text.contains("=== Results for TC1.txt ==="));
        assert!(text.contains("Count: 4\n"));
        assert!(text.contains("Mean: 2.500000\n"));
        assert!(text.contains("Median: 2.500000\n"));
        assert!(text.contains("Mode: No mode\n"));
        assert!(text.contains("Variance (sample): 1.666667\n"));
        assert!(text.contains("Standard Deviation (sample): 1.290994\n"));
        assert!(text.ends_with("Elapsed time (seconds): 0.001000\n"));
    }

    #[test]
    fn test_render_without_valid_data() {
        let pipeline = StatisticsPipeline::default();
        let result = pipeline.transform(&case(), records(&["x", "y"]));
        let text = pipeline.render(&case(), &result, Duration::ZERO);
        assert!(text.contains("No valid numeric data found."));
        assert!(text.contains("Invalid records: 2\n"));
    }
}
