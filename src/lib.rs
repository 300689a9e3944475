pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::pipelines::{
    Catalogue, ConversionPipeline, SalesPipeline, StatisticsPipeline, VarianceKind,
    WordCountPipeline,
};
pub use config::{LocalStorage, Settings};
pub use core::etl::{EtlEngine, RunSummary};
pub use utils::error::{BatchError, Result};
