use crate::core::loader;
use crate::core::{Diagnostic, ParseError, RawRecord};
use crate::utils::error::{BatchError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Product identifiers compare trimmed and lower-cased.
pub fn normalize_product(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Splits `<identifier> <value>` at the last whitespace run; the identifier
/// itself may contain spaces.
pub fn split_entry(text: &str) -> Option<(&str, &str)> {
    let (id, value) = text.trim().rsplit_once(char::is_whitespace)?;
    let id = id.trim_end();
    (!id.is_empty()).then_some((id, value))
}

/// Parses a positive, finite amount.
pub fn parse_amount(
    value: &str,
    invalid: ParseError,
    non_positive: ParseError,
) -> std::result::Result<f64, ParseError> {
    let amount = value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(invalid)?;
    if amount <= 0.0 {
        return Err(non_positive);
    }
    Ok(amount)
}

/// One `<identifier> <value>` pair and the line it was read from. A missing
/// identifier leaves `id` empty; a missing or null value leaves `value` unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub record: RawRecord,
    pub id: String,
    pub value: Option<String>,
}

impl Entry {
    pub fn from_text(record: RawRecord) -> Self {
        let (id, value) = match split_entry(&record.text) {
            Some((id, value)) => (id.to_string(), Some(value.to_string())),
            None => (String::new(), None),
        };
        Self { record, id, value }
    }

    pub fn is_blank(&self) -> bool {
        self.record.text.trim().is_empty()
    }

    /// Normalised identifier and positive amount.
    pub fn amount(
        &self,
        malformed: ParseError,
        invalid: ParseError,
        non_positive: ParseError,
    ) -> std::result::Result<(String, f64), ParseError> {
        if self.id.is_empty() {
            return Err(malformed);
        }
        let Some(value) = self.value.as_deref() else {
            return Err(invalid);
        };
        let amount = parse_amount(value, invalid, non_positive)?;
        Ok((normalize_product(&self.id), amount))
    }
}

/// Reads entries from a text file of `<identifier> <value>` lines, or from a
/// JSON array of objects holding `id_key` and `value_key` (matched
/// case-insensitively).
pub fn read_entries(path: &Path, id_key: &str, value_key: &str) -> Result<Vec<Entry>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if !is_json {
        return Ok(loader::read_records(path)?
            .into_iter()
            .map(Entry::from_text)
            .collect());
    }

    let content = std::fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(content.trim_start_matches('\u{feff}'))?;
    let Value::Array(items) = data else {
        return Err(BatchError::ConfigError {
            message: format!("{} must contain a JSON array", path.display()),
        });
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| Entry {
            record: RawRecord::new(index + 1, item.to_string()),
            id: field(item, id_key).unwrap_or_default(),
            value: field(item, value_key),
        })
        .collect())
}

fn field(item: &Value, key: &str) -> Option<String> {
    let Value::Object(map) = item else {
        return None;
    };
    match map.iter().find(|(k, _)| k.eq_ignore_ascii_case(key))? {
        (_, Value::String(s)) => Some(s.trim().to_string()),
        (_, Value::Null) => None,
        (_, other) => Some(other.to_string()),
    }
}

/// Product price list, read once per run and only borrowed afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    source: String,
    prices: HashMap<String, f64>,
}

impl Catalogue {
    pub fn load(path: &Path) -> Result<(Self, Vec<Diagnostic>)> {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let entries = read_entries(path, "title", "price")?;
        Ok(Self::from_entries(&source, &entries))
    }

    pub fn from_entries(source: &str, entries: &[Entry]) -> (Self, Vec<Diagnostic>) {
        let mut catalogue = Self {
            source: source.to_string(),
            prices: HashMap::new(),
        };
        let mut diagnostics = Vec::new();

        for entry in entries {
            if entry.is_blank() {
                continue;
            }
            let parsed = entry.amount(
                ParseError::MalformedCatalogueEntry,
                ParseError::InvalidPrice,
                ParseError::NonPositivePrice,
            );

            let reason = match parsed {
                Ok((product, _)) if catalogue.prices.contains_key(&product) => {
                    ParseError::DuplicateProduct { product }
                }
                Ok((product, price)) => {
                    catalogue.prices.insert(product, price);
                    continue;
                }
                Err(reason) => reason,
            };

            let record = &entry.record;
            let diagnostic = Diagnostic::new(source, record, record.text.trim(), reason);
            tracing::warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }

        tracing::info!("Catalogue {} loaded with {} products", source, catalogue.len());
        (catalogue, diagnostics)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn price(&self, product: &str) -> Option<f64> {
        self.prices.get(product).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
