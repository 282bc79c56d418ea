pub mod key_set;
pub mod record;
pub mod stats;

pub use key_set::{InvoiceKeySet, SampleKeySet};
pub use record::{Record, FIELD_DELIMITER};
pub use stats::{ExtractionSummary, Stage, StageStats};
