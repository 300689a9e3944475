use crate::app::pipelines::catalogue::{self, Catalogue, Entry};
use crate::core::loader::{self, TC_DIR_PATTERN};
use crate::core::{Diagnostic, ParseError, Pipeline, Result, TestCase, TransformResult, WriteMode};
use crate::utils::error::BatchError;
use crate::utils::format;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const RESULTS_FILE: &str = "SalesResults.txt";

static CATALOGUE_DIR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^tc1$").expect("valid catalogue folder pattern"));

static PRODUCT_LIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)productlist.*\.(json|txt)$").expect("valid product list pattern")
});

static SALES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sales.*\.(json|txt)$").expect("valid sales pattern"));

const RULE: &str =
    "================================================================================";

#[derive(Debug, Clone, PartialEq)]
pub struct ProductTotal {
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
}

/// Per-product running totals for one test case.
#[derive(Debug, Clone, Default)]
pub struct SalesTotals {
    found: HashMap<String, ProductTotal>,
    missing: HashMap<String, f64>,
}

impl SalesTotals {
    pub fn add_sale(&mut self, product: &str, quantity: f64, unit_price: f64) {
        let entry = self
            .found
            .entry(product.to_string())
            .or_insert_with(|| ProductTotal {
                product: product.to_string(),
                quantity: 0.0,
                unit_price,
                total_cost: 0.0,
            });
        entry.quantity += quantity;
        entry.total_cost += quantity * unit_price;
    }

    pub fn add_missing(&mut self, product: &str, quantity: f64) {
        *self.missing.entry(product.to_string()).or_insert(0.0) += quantity;
    }

    pub fn product(&self, product: &str) -> Option<&ProductTotal> {
        self.found.get(product)
    }

    /// Highest total cost first.
    pub fn ranked(&self) -> Vec<&ProductTotal> {
        let mut ranked: Vec<&ProductTotal> = self.found.values().collect();
        ranked.sort_by(|a, b| {
            b.total_cost
                .total_cmp(&a.total_cost)
                .then_with(|| a.product.cmp(&b.product))
        });
        ranked
    }

    /// Largest quantity first.
    pub fn missing(&self) -> Vec<(&str, f64)> {
        let mut missing: Vec<(&str, f64)> =
            self.missing.iter().map(|(p, q)| (p.as_str(), *q)).collect();
        missing.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(b.0),
            other => other,
        });
        missing
    }

    pub fn total_cost(&self) -> f64 {
        self.ranked().iter().map(|p| p.total_cost).sum()
    }
}

pub struct SalesPipeline {
    catalogue: Catalogue,
    catalogue_diagnostics: Vec<Diagnostic>,
}

impl SalesPipeline {
    pub fn new(catalogue: Catalogue, catalogue_diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            catalogue,
            catalogue_diagnostics,
        }
    }

    /// Loads the catalogue from `catalogue_path`, or from the `*ProductList*`
    /// file inside the `TC1` folder of `input`.
    pub fn from_input(input: &Path, catalogue_path: Option<&Path>) -> Result<Self> {
        if !input.exists() {
            return Err(BatchError::MissingInput {
                path: input.to_path_buf(),
            });
        }

        let path = match catalogue_path {
            Some(path) if path.is_file() => path.to_path_buf(),
            Some(path) => {
                return Err(BatchError::MissingCatalogue {
                    message: format!("{} does not exist", path.display()),
                })
            }
            None => locate_catalogue(input)?,
        };

        tracing::info!("Loading catalogue from {}", path.display());
        let (catalogue, diagnostics) = Catalogue::load(&path)?;
        Ok(Self::new(catalogue, diagnostics))
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    fn banner(title: &str) -> String {
        format!("{RULE}\n{title}\n{RULE}\n\n")
    }
}

fn locate_catalogue(input: &Path) -> Result<std::path::PathBuf> {
    let tc1 = loader::discover_dirs(input, &CATALOGUE_DIR_PATTERN)
        .ok()
        .and_then(|dirs| dirs.into_iter().next())
        .ok_or_else(|| BatchError::MissingCatalogue {
            message: format!("TC1 folder not found inside {}", input.display()),
        })?;

    loader::find_file(&tc1.path, &PRODUCT_LIST_PATTERN)?.ok_or_else(|| {
        BatchError::MissingCatalogue {
            message: format!("ProductList file not found inside {}", tc1.path.display()),
        }
    })
}

fn is_results_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(RESULTS_FILE))
}

fn parse_sale(entry: &Entry) -> std::result::Result<(String, f64), ParseError> {
    entry.amount(
        ParseError::MalformedSale,
        ParseError::InvalidQuantity,
        ParseError::NonPositiveQuantity,
    )
}

impl Pipeline for SalesPipeline {
    type Record = Entry;
    type Aggregate = SalesTotals;

    fn results_file(&self) -> &str {
        RESULTS_FILE
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::Append
    }

    fn discover(&self, input: &Path) -> Result<Vec<TestCase>> {
        loader::discover_dirs(input, &TC_DIR_PATTERN)
    }

    fn extract(&self, case: &TestCase) -> Result<Vec<Entry>> {
        // A results file written into the test case folder is never an input.
        let sales_file = loader::find_files(&case.path, &SALES_PATTERN)?
            .into_iter()
            .find(|path| !is_results_file(path))
            .ok_or_else(|| BatchError::MissingInput {
                path: case.path.clone(),
            })?;
        tracing::debug!("{}: reading {}", case.name, sales_file.display());
        catalogue::read_entries(&sales_file, "product", "quantity")
    }

    fn transform(&self, case: &TestCase, entries: Vec<Entry>) -> TransformResult<SalesTotals> {
        let mut result = TransformResult::new(SalesTotals::default());

        for entry in &entries {
            if entry.is_blank() {
                continue;
            }
            let record = &entry.record;
            let text = record.text.trim();

            let (product, quantity) = match parse_sale(entry) {
                Ok(sale) => sale,
                Err(reason) => {
                    result.reject(Diagnostic::new(&case.name, record, text, reason));
                    continue;
                }
            };

            match self.catalogue.price(&product) {
                Some(price) => {
                    result.aggregate.add_sale(&product, quantity, price);
                    result.accepted += 1;
                }
                None => {
                    result.aggregate.add_missing(&product, quantity);
                    result.reject(Diagnostic::new(
                        &case.name,
                        record,
                        text,
                        ParseError::UnknownProduct { product },
                    ));
                }
            }
        }

        result
    }

    fn render(
        &self,
        case: &TestCase,
        result: &TransformResult<SalesTotals>,
        elapsed: Duration,
    ) -> String {
        let totals = &result.aggregate;
        let mut out = Self::banner(&format!("TC: {}", case.name));

        let ranked = totals.ranked();
        if ranked.is_empty() {
            out.push_str("RESULT:\nNo valid sales could be computed after cleaning and matching.\n\n");
        } else {
            out.push_str("RESULT (per product):\n");
            out.push_str(&format!(
                "{:<40} {:>10} {:>12} {:>14}\n",
                "PRODUCT", "QUANTITY", "UNIT PRICE", "TOTAL COST"
            ));
            for line in ranked {
                out.push_str(&format!(
                    "{:<40} {:>10} {:>12} {:>14}\n",
                    line.product,
                    format::quantity(line.quantity),
                    format::money(line.unit_price),
                    format::money(line.total_cost)
                ));
            }
            out.push('\n');
        }

        out.push_str(&format!("TOTAL COST: {}\n\n", format::money(totals.total_cost())));

        let missing = totals.missing();
        if !missing.is_empty() {
            out.push_str("WARNING: Sales products missing from catalogue:\n");
            out.push_str(&format!("{:<40} {:>10}\n", "PRODUCT", "QUANTITY"));
            for (product, quantity) in missing {
                out.push_str(&format!("{:<40} {:>10}\n", product, format::quantity(quantity)));
            }
            out.push('\n');
        }

        if result.diagnostics.is_empty() {
            out.push_str("No invalid records were found.\n\n");
        } else {
            out.push_str(&format!("INVALID RECORDS ({}):\n", result.diagnostics.len()));
            for diagnostic in &result.diagnostics {
                out.push_str(&format!(
                    "line {}: '{}' ({})\n",
                    diagnostic.line, diagnostic.content, diagnostic.reason
                ));
            }
            out.push('\n');
        }

        out.push_str(&format!("TIME ELAPSED (seconds): {}\n{RULE}\n\n", format::seconds(elapsed)));
        out
    }

    fn render_failure(&self, case: &TestCase, error: &BatchError) -> String {
        let mut out = Self::banner(&format!("TC: {}", case.name));
        match error {
            BatchError::MissingInput { .. } => out.push_str("ERROR: Missing Sales file.\n\n"),
            other => out.push_str(&format!("ERROR processing {}: {}\n\n", case.name, other)),
        }
        out
    }

    fn preamble(&self) -> Option<String> {
        let mut out = Self::banner(&format!(
            "CATALOGUE: {} ({} products)",
            self.catalogue.source(),
            self.catalogue.len()
        ));
        if self.catalogue_diagnostics.is_empty() {
            out.push_str("No invalid catalogue records were found.\n\n");
        } else {
            out.push_str(&format!(
                "INVALID CATALOGUE RECORDS ({}):\n",
                self.catalogue_diagnostics.len()
            ));
            for diagnostic in &self.catalogue_diagnostics {
                out.push_str(&format!(
                    "line {}: '{}' ({})\n",
                    diagnostic.line, diagnostic.content, diagnostic.reason
                ));
            }
            out.push('\n');
        }
        Some(out)
    }
}
