use crate::app::pipelines::VarianceKind;
use crate::config::toml_config::Settings;
use crate::utils::error::Result;
use crate::utils::logger;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Input file, or folder holding TC test cases
    pub input: PathBuf,

    /// Directory receiving the results file
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log process memory after every test case")]
    pub monitor: bool,
}

impl CommonArgs {
    pub fn init_logging(&self) {
        if self.json_logs {
            logger::init_json_logger(self.verbose);
        } else {
            logger::init_cli_logger(self.verbose);
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        settings.monitor |= self.monitor;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "compute_statistics", version)]
#[command(about = "Mean, median, mode, variance and standard deviation of numeric files")]
pub struct StatisticsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Variance denominator
    #[arg(long, value_enum)]
    pub variance: Option<VarianceKind>,

    /// Decimal places in the report
    #[arg(long)]
    pub precision: Option<usize>,
}

impl StatisticsArgs {
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = self.common.settings()?;
        if let Some(variance) = self.variance {
            settings.variance = variance;
        }
        if let Some(precision) = self.precision {
            settings.precision = precision;
        }
        Ok(settings)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "convert_numbers", version)]
#[command(about = "Binary and hexadecimal conversion of integer files")]
pub struct ConversionArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl ConversionArgs {
    pub fn settings(&self) -> Result<Settings> {
        self.common.settings()
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "word_count", version)]
#[command(about = "Distinct words and their frequency in text files")]
pub struct WordCountArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Count "Word" and "word" separately
    #[arg(long)]
    pub case_sensitive: bool,
}

impl WordCountArgs {
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = self.common.settings()?;
        settings.case_sensitive |= self.case_sensitive;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "compute_sales", version)]
#[command(about = "Total sales cost per TC folder against a product catalogue")]
pub struct SalesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Catalogue file; defaults to the *ProductList* file in TC1
    #[arg(long)]
    pub catalogue: Option<PathBuf>,
}

impl SalesArgs {
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = self.common.settings()?;
        if let Some(catalogue) = &self.catalogue {
            settings.catalogue = Some(catalogue.clone());
        }
        Ok(settings)
    }
}
