use crate::domain::model::{RawRecord, TestCase};
use crate::utils::error::{BatchError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub static TC_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^tc.*\.txt$").expect("valid TC file pattern"));

pub static TC_DIR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^tc").expect("valid TC folder pattern"));

/// A single file is its own test case; a folder yields its matching files in
/// name order.
pub fn discover_files(input: &Path, pattern: &Regex) -> Result<Vec<TestCase>> {
    if !input.exists() {
        return Err(BatchError::MissingInput {
            path: input.to_path_buf(),
        });
    }

    if !input.is_dir() {
        return Ok(vec![TestCase::new(input.to_path_buf())]);
    }

    let cases = matching_entries(input, pattern, |path| path.is_file())?;
    if cases.is_empty() {
        return Err(BatchError::NoTestCases {
            path: input.to_path_buf(),
            pattern: pattern.as_str().to_string(),
        });
    }

    tracing::debug!("Found {} test case files in {}", cases.len(), input.display());
    Ok(cases.into_iter().map(TestCase::new).collect())
}

pub fn discover_dirs(input: &Path, pattern: &Regex) -> Result<Vec<TestCase>> {
    if !input.exists() {
        return Err(BatchError::MissingInput {
            path: input.to_path_buf(),
        });
    }

    let cases = if input.is_dir() {
        matching_entries(input, pattern, |path| path.is_dir())?
    } else {
        Vec::new()
    };

    if cases.is_empty() {
        return Err(BatchError::NoTestCases {
            path: input.to_path_buf(),
            pattern: pattern.as_str().to_string(),
        });
    }

    tracing::debug!("Found {} test case folders in {}", cases.len(), input.display());
    Ok(cases.into_iter().map(TestCase::new).collect())
}

/// Regular files in `dir` whose name matches, sorted by name.
pub fn find_files(dir: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    matching_entries(dir, pattern, |path| path.is_file())
}

/// First regular file in `dir` whose name matches, by name order.
pub fn find_file(dir: &Path, pattern: &Regex) -> Result<Option<PathBuf>> {
    Ok(find_files(dir, pattern)?.into_iter().next())
}

fn matching_entries(
    dir: &Path,
    pattern: &Regex,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.is_match(name));
        if matches && keep(&path) {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    Ok(content
        .lines()
        .enumerate()
        .map(|(index, line)| RawRecord::new(index + 1, line))
        .collect())
}

/// Splits a line on commas and whitespace, dropping empty pieces.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_files_sorts_and_filters() {
        let dir = TempDir::new().unwrap();
        for name in ["TC3.txt", "tc1.TXT", "TC2.txt", "notes.txt", "TC4.csv"] {
            fs::write(dir.path().join(name), "1\n").unwrap();
        }

        let cases = discover_files(dir.path(), &TC_FILE_PATTERN).unwrap();
        let names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["TC2.txt", "TC3.txt", "tc1.TXT"]);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data.txt");
        fs::write(&file, "1\n").unwrap();

        let cases = discover_files(&file, &TC_FILE_PATTERN).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "data.txt");
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = discover_files(&dir.path().join("absent.txt"), &TC_FILE_PATTERN).unwrap_err();
        assert!(matches!(err, BatchError::MissingInput { .. }));
    }

    #[test]
    fn test_empty_folder_has_no_test_cases() {
        let dir = TempDir::new().unwrap();
        let err = discover_files(dir.path(), &TC_FILE_PATTERN).unwrap_err();
        assert!(matches!(err, BatchError::NoTestCases { .. }));
    }

    #[test]
    fn test_discover_dirs_ignores_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("TC2")).unwrap();
        fs::create_dir(dir.path().join("TC1")).unwrap();
        fs::create_dir(dir.path().join("scratch")).unwrap();
        fs::write(dir.path().join("TC9.txt"), "").unwrap();

        let cases = discover_dirs(dir.path(), &TC_DIR_PATTERN).unwrap();
        let names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["TC1", "TC2"]);
    }

    #[test]
    fn test_read_records_numbers_lines_from_one() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("TC1.txt");
        fs::write(&file, "\u{feff}10\n\nabc\r\n").unwrap();

        let records = read_records(&file).unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new(1, "10"),
                RawRecord::new(2, ""),
                RawRecord::new(3, "abc"),
            ]
        );
    }

    #[test]
    fn test_tokenize_commas_and_whitespace() {
        let tokens: Vec<&str> = tokenize(" 1, 2,,3\t4 ").collect();
        assert_eq!(tokens, vec!["1", "2", "3", "4"]);
    }
}
