use crate::config::FilterConfig;
use crate::error::Result;
use crate::files::ResourceProvider;
use crate::models::{ExtractionSummary, InvoiceKeySet, SampleKeySet, Stage, StageStats};
use crate::service::{filter_customers, filter_invoice_items, filter_invoices, parse_sample_keys};
use chrono::Utc;

/// 测试数据抽取服务：样本客户 → 客户 → 发票 → 发票明细
///
/// 各阶段严格顺序执行。每个阶段打开自己的输入输出，结束后（无论成败）即释放；
/// 阶段之间只传递两个只读的 key set。
pub struct Extractor<P> {
    resources: P,
    filter: FilterConfig,
}

impl<P: ResourceProvider> Extractor<P> {
    pub fn new(resources: P, filter: FilterConfig) -> Self {
        Self { resources, filter }
    }

    /// 执行完整抽取；任一阶段失败即中止后续阶段
    pub fn run(&self) -> Result<ExtractionSummary> {
        let started_at = Utc::now();

        let sample = self.load_sample().inspect_err(|e| {
            tracing::error!("Sample parsing failed: {}", e);
        })?;

        let customers = self.extract_customers(&sample).inspect_err(|e| {
            tracing::error!("Customer extraction failed: {}", e);
        })?;

        let (invoices, invoice_keys) = self.extract_invoices(&sample).inspect_err(|e| {
            tracing::error!("Invoice extraction failed: {}", e);
        })?;

        let invoice_items = self.extract_invoice_items(&invoice_keys).inspect_err(|e| {
            tracing::error!("Invoice item extraction failed: {}", e);
        })?;

        let summary = ExtractionSummary {
            sample_customers: sample.len(),
            customers,
            invoices,
            invoice_items,
            invoice_keys: invoice_keys.len(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "抽取完成: 客户 {}/{}, 发票 {}, 发票明细 {}",
            summary.customers.rows_written,
            summary.sample_customers,
            summary.invoices.rows_written,
            summary.invoice_items.rows_written
        );

        Ok(summary)
    }

    pub fn load_sample(&self) -> Result<SampleKeySet> {
        let input = self.resources.open_input(Stage::Sample)?;
        parse_sample_keys(input, self.filter.sample_column)
    }

    pub fn extract_customers(&self, sample: &SampleKeySet) -> Result<StageStats> {
        let input = self.resources.open_input(Stage::Customers)?;
        let output = self.resources.create_output(Stage::Customers)?;
        filter_customers(input, output, sample, self.filter.termination)
    }

    pub fn extract_invoices(&self, sample: &SampleKeySet) -> Result<(StageStats, InvoiceKeySet)> {
        let input = self.resources.open_input(Stage::Invoices)?;
        let output = self.resources.create_output(Stage::Invoices)?;
        let result = filter_invoices(input, output, sample)?;
        Ok((result.stats, result.invoice_keys))
    }

    pub fn extract_invoice_items(&self, invoices: &InvoiceKeySet) -> Result<StageStats> {
        let input = self.resources.open_input(Stage::InvoiceItems)?;
        let output = self.resources.create_output(Stage::InvoiceItems)?;
        filter_invoice_items(input, output, invoices)
    }
}
