use crate::error::Result;
use crate::files::{LineReader, LineWriter};
use crate::models::{InvoiceKeySet, Stage, StageStats};
use std::io::{BufRead, Write};

/// 发票明细过滤：输出发票编号属于上一阶段发票集合的明细行
pub fn filter_invoice_items<R: BufRead, W: Write>(
    input: R,
    output: W,
    invoices: &InvoiceKeySet,
) -> Result<StageStats> {
    let mut reader = LineReader::new(input, Stage::InvoiceItems);
    let mut writer = LineWriter::new(output, Stage::InvoiceItems);
    let mut stats = StageStats::new(Stage::InvoiceItems);

    tracing::info!("[InvoiceItem] 开始过滤, 发票 {} 张", invoices.len());

    if let Some(header) = reader.next_record()? {
        writer.write_record(&header)?;
        stats.header_present = true;

        while let Some(rec) = reader.next_record()? {
            stats.rows_read += 1;
            if rec.field(0).map_or(false, |invoice| invoices.contains(invoice)) {
                writer.write_record(&rec)?;
                stats.rows_written += 1;
            }
        }
    }

    writer.finish()?;

    tracing::info!(
        "[InvoiceItem] 完成: 读取 {} 行, 输出 {} 行",
        stats.rows_read, stats.rows_written
    );
    Ok(stats)
}
