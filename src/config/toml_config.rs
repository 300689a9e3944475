use crate::app::pipelines::statistics::{VarianceKind, DEFAULT_PRECISION};
use crate::utils::error::{BatchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const MAX_PRECISION: usize = 12;

/// Optional settings file shared by all four programs. Every key may be
/// omitted; command-line flags win over file values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output: OutputConfig,
    pub statistics: StatisticsConfig,
    pub word_count: WordCountConfig,
    pub sales: SalesConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticsConfig {
    pub variance: Option<VarianceKind>,
    pub precision: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordCountConfig {
    pub case_sensitive: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SalesConfig {
    pub catalogue: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitoringConfig {
    pub enabled: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BatchError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BatchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Effective settings after merging defaults, the file and the flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub output_dir: String,
    pub variance: VarianceKind,
    pub precision: usize,
    pub case_sensitive: bool,
    pub catalogue: Option<PathBuf>,
    pub monitor: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_file_config(&FileConfig::default())
    }
}

impl Settings {
    pub fn from_file_config(file: &FileConfig) -> Self {
        Self {
            output_dir: file
                .output
                .dir
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            variance: file.statistics.variance.unwrap_or_default(),
            precision: file.statistics.precision.unwrap_or(DEFAULT_PRECISION),
            case_sensitive: file.word_count.case_sensitive.unwrap_or(false),
            catalogue: file.sales.catalogue.as_ref().map(PathBuf::from),
            monitor: file.monitoring.enabled.unwrap_or(false),
        }
    }

    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                Ok(Self::from_file_config(&FileConfig::from_file(path)?))
            }
            None => Ok(Self::default()),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output.dir", &self.output_dir)?;
        validation::validate_range("statistics.precision", self.precision, 0, MAX_PRECISION)?;
        if let Some(catalogue) = &self.catalogue {
            validation::validate_path("sales.catalogue", &catalogue.to_string_lossy())?;
        }
        Ok(())
    }
}
