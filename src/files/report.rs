use crate::error::{ExtractError, Result};
use crate::models::ExtractionSummary;
use std::path::Path;

/// 导出各阶段统计到 CSV 文件
pub fn export_report(summary: &ExtractionSummary, output_path: &Path) -> Result<()> {
    use csv::Writer;

    let mut writer = Writer::from_path(output_path)?;
    writer.write_record(["stage", "header_present", "rows_read", "rows_written", "stopped_early"])?;

    for stats in summary.stages() {
        writer.write_record(&[
            stats.stage.to_string(),
            stats.header_present.to_string(),
            stats.rows_read.to_string(),
            stats.rows_written.to_string(),
            stats.stopped_early.to_string(),
        ])?;
    }

    writer.flush().map_err(|e| ExtractError::Report(e.into()))?;
    Ok(())
}
