use crate::error::{ExtractError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 环境变量前缀，例如 EXTRACT_INPUT__SAMPLE
pub const ENV_PREFIX: &str = "EXTRACT";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// 四个输入文件路径（全量抽取文件 + 样本客户）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub sample: Option<PathBuf>,
    pub customers: Option<PathBuf>,
    pub invoices: Option<PathBuf>,
    pub invoice_items: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub customers: PathBuf,
    pub invoices: PathBuf,
    pub invoice_items: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            customers: PathBuf::from("customer_test.csv"),
            invoices: PathBuf::from("invoice_test.csv"),
            invoice_items: PathBuf::from("invoice_item_test.csv"),
        }
    }
}

impl OutputConfig {
    pub fn customers_path(&self) -> PathBuf {
        self.resolve(&self.customers)
    }

    pub fn invoices_path(&self) -> PathBuf {
        self.resolve(&self.invoices)
    }

    pub fn invoice_items_path(&self) -> PathBuf {
        self.resolve(&self.invoice_items)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.join(file),
            None => file.to_path_buf(),
        }
    }
}

/// 客户过滤的提前终止策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// 所有样本客户都找到后停止读取
    #[default]
    StopWhenComplete,
    /// 始终读到文件末尾
    ScanToEnd,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub termination: TerminationPolicy,
    /// 样本文件取第几列作为客户编号；None 表示整行
    #[serde(default)]
    pub sample_column: Option<usize>,
}

impl AppConfig {
    /// 分层加载：默认值 < 配置文件 < 环境变量
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = OutputConfig::default();
        let mut builder = Config::builder()
            .set_default("output.customers", path_str(&defaults.customers))?
            .set_default("output.invoices", path_str(&defaults.invoices))?
            .set_default("output.invoice_items", path_str(&defaults.invoice_items))?
            .set_default("filter.termination", "stop_when_complete")?;

        if let Some(path) = file {
            if !path.exists() {
                return Err(ExtractError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 校验必需的输入路径
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("sample", &self.input.sample),
            ("customers", &self.input.customers),
            ("invoices", &self.input.invoices),
            ("invoice_items", &self.input.invoice_items),
        ]
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(ExtractError::Config(format!(
                "missing input path(s): {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
