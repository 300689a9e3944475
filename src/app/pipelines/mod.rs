pub mod catalogue;
pub mod conversion;
pub mod sales;
pub mod statistics;
pub mod word_count;

pub use catalogue::Catalogue;
pub use conversion::ConversionPipeline;
pub use sales::SalesPipeline;
pub use statistics::{StatisticsPipeline, VarianceKind};
pub use word_count::WordCountPipeline;
