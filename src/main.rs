use anyhow::Context;
use clap::Parser;
use fixture_extract::files::export_report;
use fixture_extract::{AppConfig, Extractor, FsResources, TerminationPolicy};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// 从全量抽取文件中按样本客户生成小型测试数据文件
#[derive(Parser, Debug)]
#[command(name = "fixture-extract", version, about)]
struct Cli {
    /// 样本客户文件（表头 + 每行一个客户编号）
    sample: Option<PathBuf>,
    /// 全量客户文件
    customers: Option<PathBuf>,
    /// 全量发票文件
    invoices: Option<PathBuf>,
    /// 全量发票明细文件
    invoice_items: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    customers_out: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    invoices_out: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    invoice_items_out: Option<PathBuf>,

    /// 读完整个客户文件，不在找到全部样本客户后提前停止
    #[arg(long)]
    scan_to_end: bool,

    /// 样本文件中客户编号所在列（从 0 开始）
    #[arg(long, value_name = "N")]
    sample_column: Option<usize>,

    /// 将各阶段统计写入 CSV 报告
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Cli {
    /// 命令行参数覆盖配置文件与环境变量
    fn apply(self, config: &mut AppConfig) -> Option<PathBuf> {
        let input = &mut config.input;
        input.sample = self.sample.or(input.sample.take());
        input.customers = self.customers.or(input.customers.take());
        input.invoices = self.invoices.or(input.invoices.take());
        input.invoice_items = self.invoice_items.or(input.invoice_items.take());

        let output = &mut config.output;
        if self.output_dir.is_some() {
            output.dir = self.output_dir;
        }
        if let Some(path) = self.customers_out {
            output.customers = path;
        }
        if let Some(path) = self.invoices_out {
            output.invoices = path;
        }
        if let Some(path) = self.invoice_items_out {
            output.invoice_items = path;
        }

        if self.scan_to_end {
            config.filter.termination = TerminationPolicy::ScanToEnd;
        }
        if self.sample_column.is_some() {
            config.filter.sample_column = self.sample_column;
        }

        self.report
    }
}

fn main() -> anyhow::Result<()> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    // 加载配置
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let report = cli.apply(&mut config);
    info!("Starting extraction with config: {:?}", config);

    let resources = FsResources::from_config(&config).context("invalid configuration")?;
    let extractor = Extractor::new(resources, config.filter.clone());

    let summary = extractor.run().context("extraction aborted")?;
    info!("Summary: {}", serde_json::to_string(&summary)?);

    if let Some(path) = report {
        export_report(&summary, &path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
