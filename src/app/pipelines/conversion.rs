use crate::core::loader::{self, TC_FILE_PATTERN};
use crate::core::{Diagnostic, ParseError, Pipeline, RawRecord, Result, TestCase, TransformResult, WriteMode};
use crate::utils::format;
use std::path::Path;
use std::time::Duration;

pub const RESULTS_FILE: &str = "ConvertionResults.txt";

const DIGITS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// Sign-magnitude rendering by repeated division: negative values get a
/// leading `-` followed by the digits of their magnitude.
pub fn to_base(value: i64, base: u64) -> String {
    debug_assert!((2..=16).contains(&base));

    let mut magnitude = value.unsigned_abs();
    if magnitude == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(DIGITS[(magnitude % base) as usize]);
        magnitude /= base;
    }
    if value < 0 {
        digits.push('-');
    }

    digits.iter().rev().collect()
}

pub fn to_binary(value: i64) -> String {
    to_base(value, 2)
}

pub fn to_hex(value: i64) -> String {
    to_base(value, 16)
}

/// Accepts an optional `+`/`-` followed by ASCII digits only.
pub fn parse_integer(token: &str) -> std::result::Result<i64, ParseError> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::NotAnInteger);
    }
    token.parse::<i64>().map_err(|_| ParseError::IntegerOutOfRange)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub decimal: i64,
    pub binary: String,
    pub hex: String,
}

impl Conversion {
    pub fn new(decimal: i64) -> Self {
        Self {
            decimal,
            binary: to_binary(decimal),
            hex: to_hex(decimal),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConversionPipeline;

impl ConversionPipeline {
    pub fn new() -> Self {
        Self
    }
}

impl Pipeline for ConversionPipeline {
    type Record = RawRecord;
    type Aggregate = Vec<Conversion>;

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

    fn transform(&self, case: &TestCase, records: Vec<RawRecord>) -> TransformResult<Vec<Conversion>> {
        let mut result = TransformResult::new(Vec::new());

        for record in &records {
            for token in loader::tokenize(&record.text) {
                match parse_integer(token) {
                    Ok(value) => {
                        result.aggregate.push(Conversion::new(value));
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
        result: &TransformResult<Vec<Conversion>>,
        elapsed: Duration,
    ) -> String {
        let mut out = format!(
            "\n=== Results for {} ===\nConversion Results\n------------------\nDecimal\tBinary\tHexadecimal\n-------\t------\t-----------\n",
            case.name
        );
        for row in &result.aggregate {
            out.push_str(&format!("{}\t{}\t{}\n", row.decimal, row.binary, row.hex));
        }
        out.push_str(&format!("Invalid records: {}\n", result.diagnostics.len()));
        out.push_str(&format!("Elapsed time (seconds): {}\n", format::seconds(elapsed)));
        out
    }
}
