use crate::config::TerminationPolicy;
use crate::error::Result;
use crate::files::{LineReader, LineWriter};
use crate::models::{SampleKeySet, Stage, StageStats};
use std::io::{BufRead, Write};

/// 客户过滤：输出表头和样本客户的行
///
/// `StopWhenComplete` 下，所有样本客户都找到后立即停止读取，剩余输入不再消费。
/// 完成度按不同客户编号计数，重复行不会导致提前停止。
pub fn filter_customers<R: BufRead, W: Write>(
    input: R,
    output: W,
    sample: &SampleKeySet,
    policy: TerminationPolicy,
) -> Result<StageStats> {
    let mut reader = LineReader::new(input, Stage::Customers);
    let mut writer = LineWriter::new(output, Stage::Customers);
    let mut stats = StageStats::new(Stage::Customers);

    tracing::info!("[Customer] 开始过滤, 样本客户 {} 个, 策略 {:?}", sample.len(), policy);

    match reader.next_record()? {
        Some(header) => {
            writer.write_record(&header)?;
            stats.header_present = true;
        }
        None => {
            writer.finish()?;
            tracing::info!("[Customer] 输入为空");
            return Ok(stats);
        }
    }

    let stop_when_complete = policy == TerminationPolicy::StopWhenComplete;
    let mut found = vec![false; sample.len()];
    let mut found_count = 0usize;

    loop {
        if stop_when_complete && found_count == sample.len() {
            stats.stopped_early = true;
            break;
        }

        let Some(rec) = reader.next_record()? else {
            break;
        };
        stats.rows_read += 1;

        let Some(idx) = rec.field(0).and_then(|key| sample.index_of(key)) else {
            continue;
        };

        writer.write_record(&rec)?;
        stats.rows_written += 1;
        if !found[idx] {
            found[idx] = true;
            found_count += 1;
        }
    }

    writer.finish()?;

    if stats.stopped_early {
        tracing::info!(
            "[Customer] 所有样本客户已找到, 在第 {} 行后停止读取",
            reader.lines_read()
        );
    }
    if found_count < sample.len() {
        tracing::warn!(
            "[Customer] {} sample customers not found in customer file",
            sample.len() - found_count
        );
    }
    tracing::info!(
        "[Customer] 完成: 读取 {} 行, 输出 {} 行",
        stats.rows_read, stats.rows_written
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\"CUSTOMER_CODE\",\"FIRSTNAME\",\"LASTNAME\"";

    fn sample(keys: &[&str]) -> SampleKeySet {
        keys.iter().copied().collect()
    }

    fn run(input: &str, keys: &[&str], policy: TerminationPolicy) -> (String, StageStats) {
        let mut out = Vec::new();
        let stats = filter_customers(input.as_bytes(), &mut out, &sample(keys), policy).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let (out, stats) = run("", &["\"CUST1\""], TerminationPolicy::StopWhenComplete);
        assert_eq!(out, "");
        assert!(!stats.header_present);
    }

    #[test]
    fn no_matches_is_header_only() {
        let input = format!("{HEADER}\n\"CUST0000010231\",\"Maria\",\"Alba\"\n\"CUST0000010233\",\"Jamie\",\"Hayes\"\n");
        let (out, stats) = run(&input, &["\"CUST0000010240\""], TerminationPolicy::StopWhenComplete);
        assert_eq!(out, format!("{HEADER}\n"));
        assert_eq!(stats.rows_read, 2);
        assert_eq!(stats.rows_written, 0);
        assert!(!stats.stopped_early);
    }

    #[test]
    fn match_at_end_of_file() {
        let input = format!(
            "{HEADER}\n\"CUST0000010231\",\"Maria\",\"Alba\"\n\"CUST0000010233\",\"Jamie\",\"Hayes\"\n\
             \"CUST0000010236\",\"Stephanie\",\"James\"\n\"CUST0000010235\",\"George\",\"Lucas\"\n"
        );
        let (out, _) = run(&input, &["\"CUST0000010235\""], TerminationPolicy::StopWhenComplete);
        assert_eq!(out, format!("{HEADER}\n\"CUST0000010235\",\"George\",\"Lucas\"\n"));
    }

    #[test]
    fn stops_after_all_sample_customers_found() {
        // 第 K 个匹配之后的内容无论是什么都不影响输出，非法 UTF-8 也不会被读到
        let mut input = format!("{HEADER}\nA,1\nX,2\nB,3\nA,dup\n").into_bytes();
        input.extend_from_slice(b"\xff\xfe\n");
        let mut out = Vec::new();
        let stats =
            filter_customers(&input[..], &mut out, &sample(&["A", "B"]), TerminationPolicy::StopWhenComplete)
                .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{HEADER}\nA,1\nB,3\n"));
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_written, 2);
        assert!(stats.stopped_early);
    }

    #[test]
    fn duplicate_rows_do_not_stop_early() {
        let input = format!("{HEADER}\nA,1\nA,2\nB,3\n");
        let (out, stats) = run(&input, &["A", "B"], TerminationPolicy::StopWhenComplete);
        assert_eq!(out, format!("{HEADER}\nA,1\nA,2\nB,3\n"));
        assert!(stats.stopped_early);
    }

    #[test]
    fn scan_to_end_reads_everything() {
        let input = format!("{HEADER}\nA,1\nB,3\nA,dup\nC,4\n");
        let (out, stats) = run(&input, &["A", "B"], TerminationPolicy::ScanToEnd);
        assert_eq!(out, format!("{HEADER}\nA,1\nB,3\nA,dup\n"));
        assert_eq!(stats.rows_read, 4);
        assert!(!stats.stopped_early);
    }

    #[test]
    fn write_failure_aborts_the_stage() {
        use crate::error::ExtractError;
        use crate::files::testing::FailingWriter;

        // 表头两次 write 成功，第一条数据行写出失败
        let input = format!("{HEADER}\nX,0\nA,1\nB,2\n");
        let mut out = FailingWriter::failing_write(3);
        let err = filter_customers(input.as_bytes(), &mut out, &sample(&["A", "B"]), TerminationPolicy::ScanToEnd)
            .unwrap_err();

        assert!(matches!(err, ExtractError::Io { stage: Stage::Customers, line: 3, .. }));
        assert_eq!(String::from_utf8(out.written).unwrap(), format!("{HEADER}\n"));
    }

    #[test]
    fn flush_failure_is_reported() {
        use crate::files::testing::FailingWriter;

        let input = format!("{HEADER}\nA,1\n");
        let mut out = FailingWriter::failing_flush();
        let err = filter_customers(input.as_bytes(), &mut out, &sample(&["A"]), TerminationPolicy::StopWhenComplete)
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Customers));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn empty_sample_stops_after_header() {
        let input = format!("{HEADER}\nA,1\n");
        let (out, stats) = run(&input, &[], TerminationPolicy::StopWhenComplete);
        assert_eq!(out, format!("{HEADER}\n"));
        assert_eq!(stats.rows_read, 0);
        assert!(stats.stopped_early);
    }
}
