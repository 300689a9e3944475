pub mod etl;
pub mod loader;

pub use crate::domain::model::{Diagnostic, ParseError, RawRecord, TestCase, TransformResult};
pub use crate::domain::ports::{Pipeline, Storage, WriteMode};
pub use crate::utils::error::Result;
