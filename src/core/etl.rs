use crate::core::{Pipeline, Storage, TestCase, WriteMode};
use crate::utils::error::Result;
use crate::utils::format;
use crate::utils::monitor::SystemMonitor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub test_cases: usize,
    pub failed_cases: usize,
    pub diagnostics: usize,
    pub elapsed: Duration,
}

struct CaseOutcome {
    section: String,
    diagnostics: usize,
    failed: bool,
}

pub struct EtlEngine<P: Pipeline, S: Storage> {
    pipeline: P,
    storage: S,
    monitor_enabled: bool,
}

impl<P: Pipeline, S: Storage> EtlEngine<P, S> {
    pub fn new(pipeline: P, storage: S) -> Self {
        Self::new_with_monitoring(pipeline, storage, false)
    }

    pub fn new_with_monitoring(pipeline: P, storage: S, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            storage,
            monitor_enabled,
        }
    }

    /// Runs every test case under `input`, printing each section to stdout and
    /// writing the consolidated results file.
    pub fn run(&self, input: &Path) -> Result<RunSummary> {
        let run_start = Instant::now();
        let mut monitor = SystemMonitor::new(self.monitor_enabled);

        tracing::info!("Starting batch run on {}", input.display());
        let cases = self.pipeline.discover(input)?;
        tracing::info!("Discovered {} test case(s)", cases.len());

        let results_file = self.pipeline.results_file();
        let mode = self.pipeline.write_mode();
        let mut report = self.pipeline.preamble().unwrap_or_default();
        print!("{}", report);

        let append_path = match mode {
            WriteMode::Append => {
                let path = self.storage.write_file(results_file, report.as_bytes())?;
                report.clear();
                Some(path)
            }
            WriteMode::Overwrite => None,
        };

        let mut diagnostics = 0;
        let mut failed_cases = 0;
        for case in &cases {
            let outcome = self.process(case);
            diagnostics += outcome.diagnostics;
            if outcome.failed {
                failed_cases += 1;
            }

            print!("{}", outcome.section);
            match mode {
                WriteMode::Append => {
                    self.storage
                        .append_file(results_file, outcome.section.as_bytes())?;
                }
                WriteMode::Overwrite => report.push_str(&outcome.section),
            }
            monitor.log_stats(&case.name);
        }

        let elapsed = run_start.elapsed();
        let output_path = match append_path {
            Some(path) => path,
            None => {
                let footer = format!(
                    "\n=== Total elapsed time (seconds): {} ===\n",
                    format::seconds(elapsed)
                );
                print!("{}", footer);
                report.push_str(&footer);
                self.storage.write_file(results_file, report.as_bytes())?
            }
        };
        monitor.log_final_stats();

        tracing::info!(
            "Processed {} test case(s), {} invalid record(s), {} unreadable",
            cases.len(),
            diagnostics,
            failed_cases
        );

        Ok(RunSummary {
            output_path,
            test_cases: cases.len(),
            failed_cases,
            diagnostics,
            elapsed,
        })
    }

    fn process(&self, case: &TestCase) -> CaseOutcome {
        tracing::debug!("Processing {}", case.path.display());
        let start = Instant::now();

        let records = match self.pipeline.extract(case) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("❌ Could not read {}: {}", case.name, e);
                println!("ERROR: {}: {}", case.name, e);
                return CaseOutcome {
                    section: self.pipeline.render_failure(case, &e),
                    diagnostics: 0,
                    failed: true,
                };
            }
        };

        let line_count = records.len();
        let result = self.pipeline.transform(case, records);
        let elapsed = start.elapsed();

        tracing::debug!(
            "{}: {} lines, {} accepted, {} rejected in {:?}",
            case.name,
            line_count,
            result.accepted,
            result.diagnostics.len(),
            elapsed
        );
        for diagnostic in &result.diagnostics {
            println!("ERROR: {}", diagnostic);
        }

        CaseOutcome {
            section: self.pipeline.render(case, &result, elapsed),
            diagnostics: result.diagnostics.len(),
            failed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader;
    use crate::core::{Diagnostic, ParseError, RawRecord, TransformResult};
    use crate::utils::error::BatchError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn get_file(&self, name: &str) -> Option<String> {
            self.files
                .borrow()
                .get(name)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        fn write_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
            self.files
                .borrow_mut()
                .insert(name.to_string(), data.to_vec());
            Ok(PathBuf::from(name))
        }

        fn append_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
            self.files
                .borrow_mut()
                .entry(name.to_string())
                .or_default()
                .extend_from_slice(data);
            Ok(PathBuf::from(name))
        }
    }

    /// Counts lines that parse as integers.
    struct CountingPipeline {
        mode: WriteMode,
    }

    impl Pipeline for CountingPipeline {
        type Record = RawRecord;
        type Aggregate = i64;

        fn results_file(&self) -> &str {
            "Counts.txt"
        }

        fn write_mode(&self) -> WriteMode {
            self.mode
        }

        fn discover(&self, input: &Path) -> Result<Vec<TestCase>> {
            loader::discover_files(input, &loader::TC_FILE_PATTERN)
        }

        fn extract(&self, case: &TestCase) -> Result<Vec<RawRecord>> {
            loader::read_records(&case.path)
        }

        fn transform(&self, case: &TestCase, records: Vec<RawRecord>) -> TransformResult<i64> {
            let mut result = TransformResult::new(0);
            for record in records {
                match record.text.trim().parse::<i64>() {
                    Ok(value) => {
                        result.aggregate += value;
                        result.accepted += 1;
                    }
                    Err(_) => result.reject(Diagnostic::new(
                        &case.name,
                        &record,
                        &record.text,
                        ParseError::NotAnInteger,
                    )),
                }
            }
            result
        }

        fn render(&self, case: &TestCase, result: &TransformResult<i64>, _: Duration) -> String {
            format!("{}: {}\n", case.name, result.aggregate)
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("TC1.txt"), "1\n2\nx\n").unwrap();
        std::fs::write(dir.path().join("TC2.txt"), "10\n").unwrap();
        dir
    }

    #[test]
    fn test_overwrite_mode_writes_one_report_with_total() {
        let dir = fixture();
        let engine = EtlEngine::new(
            CountingPipeline {
                mode: WriteMode::Overwrite,
            },
            MockStorage::default(),
        );

        let summary = engine.run(dir.path()).unwrap();
        assert_eq!(summary.test_cases, 2);
        assert_eq!(summary.diagnostics, 1);
        assert_eq!(summary.output_path, PathBuf::from("Counts.txt"));

        let report = engine.storage.get_file("Counts.txt").unwrap();
        assert!(report.starts_with("TC1.txt: 3\nTC2.txt: 10\n"));
        assert!(report.contains("=== Total elapsed time (seconds): "));
    }

    #[test]
    fn test_append_mode_accumulates_sections_without_total() {
        let dir = fixture();
        let engine = EtlEngine::new(
            CountingPipeline {
                mode: WriteMode::Append,
            },
            MockStorage::default(),
        );
        engine.storage.write_file("Counts.txt", b"stale").unwrap();

        engine.run(dir.path()).unwrap();

        let report = engine.storage.get_file("Counts.txt").unwrap();
        assert_eq!(report, "TC1.txt: 3\nTC2.txt: 10\n");
    }

    #[test]
    fn test_missing_input_aborts_run() {
        let dir = TempDir::new().unwrap();
        let engine = EtlEngine::new(
            CountingPipeline {
                mode: WriteMode::Overwrite,
            },
            MockStorage::default(),
        );

        let err = engine.run(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, BatchError::MissingInput { .. }));
        assert!(engine.storage.get_file("Counts.txt").is_none());
    }
}
