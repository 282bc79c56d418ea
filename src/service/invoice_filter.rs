use crate::error::Result;
use crate::files::{LineReader, LineWriter};
use crate::models::{InvoiceKeySet, SampleKeySet, Stage, StageStats};
use std::io::{BufRead, Write};

/// 发票关联字段位置
const CUSTOMER_FIELD: usize = 0;
const INVOICE_FIELD: usize = 1;

/// 发票过滤的结果：统计 + 样本客户的发票编号集合
#[derive(Debug, Clone)]
pub struct InvoiceFilterOutput {
    pub stats: StageStats,
    pub invoice_keys: InvoiceKeySet,
}

/// 发票过滤：输出样本客户的发票行，同时收集其发票编号
///
/// 每个客户的发票数量没有上限，因此总是读完整个输入。
pub fn filter_invoices<R: BufRead, W: Write>(
    input: R,
    output: W,
    sample: &SampleKeySet,
) -> Result<InvoiceFilterOutput> {
    let mut reader = LineReader::new(input, Stage::Invoices);
    let mut writer = LineWriter::new(output, Stage::Invoices);
    let mut stats = StageStats::new(Stage::Invoices);
    let mut invoice_keys = InvoiceKeySet::new();

    tracing::info!("[Invoice] 开始过滤, 样本客户 {} 个", sample.len());

    if let Some(header) = reader.next_record()? {
        writer.write_record(&header)?;
        stats.header_present = true;

        while let Some(rec) = reader.next_record()? {
            stats.rows_read += 1;

            let matched = rec
                .field(CUSTOMER_FIELD)
                .map_or(false, |customer| sample.contains(customer));
            if !matched {
                continue;
            }

            let invoice = rec.key(INVOICE_FIELD, Stage::Invoices)?;
            invoice_keys.insert(invoice);
            writer.write_record(&rec)?;
            stats.rows_written += 1;
        }
    }

    writer.finish()?;

    tracing::info!(
        "[Invoice] 完成: 读取 {} 行, 输出 {} 行, 发票 {} 张",
        stats.rows_read, stats.rows_written, invoice_keys.len()
    );

    Ok(InvoiceFilterOutput {
        stats,
        invoice_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    const HEADER: &str = "\"CUSTOMER_CODE\",\"INVOICE_CODE\",\"AMOUNT\",\"DATE\"";

    fn sample(keys: &[&str]) -> SampleKeySet {
        keys.iter().copied().collect()
    }

    #[test]
    fn collects_invoice_keys_of_matched_rows() {
        let input = format!(
            "{HEADER}\n\"CUST0000010231\",\"IN0000001\",\"105.50\",\"01-Jan-2016\"\n\
             \"CUST0000010239\",\"IN0000013\",\"0.0\",\"01-Jan-2000\"\n\
             \"CUST0000010231\",\"IN0000002\",\"3.00\",\"02-Jan-2016\"\n"
        );
        let mut out = Vec::new();
        let result = filter_invoices(input.as_bytes(), &mut out, &sample(&["\"CUST0000010231\""])).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "{HEADER}\n\"CUST0000010231\",\"IN0000001\",\"105.50\",\"01-Jan-2016\"\n\
                 \"CUST0000010231\",\"IN0000002\",\"3.00\",\"02-Jan-2016\"\n"
            )
        );
        let keys: Vec<_> = result.invoice_keys.iter().collect();
        assert_eq!(keys, vec!["\"IN0000001\"", "\"IN0000002\""]);
        assert_eq!(result.stats.rows_read, 3);
        assert_eq!(result.stats.rows_written, 2);
        assert!(!result.stats.stopped_early);
    }

    #[test]
    fn customer_without_invoices_is_header_only() {
        let input = format!("{HEADER}\n\"CUST0000010236\",\"IN0000011\",\"0.0\",\"01-Jan-2000\"\n");
        let mut out = Vec::new();
        let result = filter_invoices(input.as_bytes(), &mut out, &sample(&["\"CUST0000010235\""])).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{HEADER}\n"));
        assert!(result.invoice_keys.is_empty());
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let mut out = Vec::new();
        let result = filter_invoices(&b""[..], &mut out, &sample(&["A"])).unwrap();
        assert!(out.is_empty());
        assert!(!result.stats.header_present);
        assert!(result.invoice_keys.is_empty());
    }

    #[test]
    fn matched_row_without_invoice_field_fails() {
        let input = format!("{HEADER}\nA,IN1\nB\nA\n");
        let mut out = Vec::new();
        let err = filter_invoices(input.as_bytes(), &mut out, &sample(&["A"])).unwrap_err();
        match err {
            ExtractError::MalformedRecord { stage, line, field, .. } => {
                assert_eq!(stage, Stage::Invoices);
                assert_eq!(line, 4);
                assert_eq!(field, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        // 出错前已写出的内容保留
        assert_eq!(String::from_utf8(out).unwrap(), format!("{HEADER}\nA,IN1\n"));
    }
}
