pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod service;

pub use crate::config::{AppConfig, FilterConfig, TerminationPolicy};
pub use error::{ExtractError, Result};
pub use files::{FsResources, ResourceProvider};
pub use models::{ExtractionSummary, InvoiceKeySet, SampleKeySet, Stage, StageStats};
pub use service::Extractor;
