use crate::config::AppConfig;
use crate::error::{ExtractError, Result};
use crate::models::Stage;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// 输入/输出流的提供者；每个阶段获取自己的流，用完即释放
pub trait ResourceProvider {
    fn open_input(&self, stage: Stage) -> Result<Box<dyn BufRead + '_>>;

    /// 样本阶段没有输出
    fn create_output(&self, stage: Stage) -> Result<Box<dyn Write + '_>>;
}

/// 基于文件系统路径的实现
#[derive(Debug, Clone)]
pub struct FsResources {
    sample: PathBuf,
    customers_in: PathBuf,
    invoices_in: PathBuf,
    invoice_items_in: PathBuf,
    customers_out: PathBuf,
    invoices_out: PathBuf,
    invoice_items_out: PathBuf,
}

impl FsResources {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let input = &config.input;
        let required = |path: &Option<PathBuf>, name: &str| {
            path.clone()
                .ok_or_else(|| ExtractError::Config(format!("missing input path: {}", name)))
        };

        Ok(Self {
            sample: required(&input.sample, "sample")?,
            customers_in: required(&input.customers, "customers")?,
            invoices_in: required(&input.invoices, "invoices")?,
            invoice_items_in: required(&input.invoice_items, "invoice_items")?,
            customers_out: config.output.customers_path(),
            invoices_out: config.output.invoices_path(),
            invoice_items_out: config.output.invoice_items_path(),
        })
    }

    pub fn input_path(&self, stage: Stage) -> &PathBuf {
        match stage {
            Stage::Sample => &self.sample,
            Stage::Customers => &self.customers_in,
            Stage::Invoices => &self.invoices_in,
            Stage::InvoiceItems => &self.invoice_items_in,
        }
    }

    pub fn output_path(&self, stage: Stage) -> Option<&PathBuf> {
        match stage {
            Stage::Sample => None,
            Stage::Customers => Some(&self.customers_out),
            Stage::Invoices => Some(&self.invoices_out),
            Stage::InvoiceItems => Some(&self.invoice_items_out),
        }
    }
}

impl ResourceProvider for FsResources {
    fn open_input(&self, stage: Stage) -> Result<Box<dyn BufRead + '_>> {
        let path = self.input_path(stage);
        let file = File::open(path).map_err(|source| ExtractError::Open {
            stage,
            resource: path.display().to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create_output(&self, stage: Stage) -> Result<Box<dyn Write + '_>> {
        let path = self
            .output_path(stage)
            .ok_or_else(|| ExtractError::Config(format!("stage {} has no output", stage)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ExtractError::Open {
                stage,
                resource: parent.display().to_string(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| ExtractError::Open {
            stage,
            resource: path.display().to_string(),
            source,
        })?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
