pub mod customer_filter;
pub mod invoice_filter;
pub mod invoice_item_filter;
pub mod pipeline;
pub mod sample;

pub use customer_filter::filter_customers;
pub use invoice_filter::{filter_invoices, InvoiceFilterOutput};
pub use invoice_item_filter::filter_invoice_items;
pub use pipeline::Extractor;
pub use sample::parse_sample_keys;
