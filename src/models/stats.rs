use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 流水线中的数据集 / 阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Sample,
    Customers,
    Invoices,
    InvoiceItems,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Sample => "sample",
            Stage::Customers => "customers",
            Stage::Invoices => "invoices",
            Stage::InvoiceItems => "invoice_items",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个过滤阶段的统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStats {
    pub stage: Stage,
    pub header_present: bool,
    pub rows_read: usize,    // 不含表头
    pub rows_written: usize, // 不含表头
    pub stopped_early: bool,
}

impl StageStats {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            header_present: false,
            rows_read: 0,
            rows_written: 0,
            stopped_early: false,
        }
    }
}

/// 一次完整抽取的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub sample_customers: usize,
    pub customers: StageStats,
    pub invoices: StageStats,
    pub invoice_items: StageStats,
    pub invoice_keys: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExtractionSummary {
    pub fn stages(&self) -> [&StageStats; 3] {
        [&self.customers, &self.invoices, &self.invoice_items]
    }
}
