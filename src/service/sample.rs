use crate::error::{ExtractError, Result};
use crate::files::LineReader;
use crate::models::{SampleKeySet, Stage};
use std::io::BufRead;

/// 解析样本客户文件：跳过表头，其余非空行去空白后作为客户编号
///
/// `column` 指定时只取该列（逗号分隔）；缺少该列的行视为格式错误。
pub fn parse_sample_keys<R: BufRead>(input: R, column: Option<usize>) -> Result<SampleKeySet> {
    let mut reader = LineReader::new(input, Stage::Sample);
    let mut keys = SampleKeySet::new();

    // 表头
    if reader.next_record()?.is_none() {
        tracing::info!("[Sample] 样本文件为空");
        return Ok(keys);
    }

    let mut duplicates = 0usize;
    while let Some(rec) = reader.next_record()? {
        if rec.as_str().trim().is_empty() {
            continue;
        }
        let key = match column {
            Some(idx) => {
                let key = rec.key(idx, Stage::Sample)?.trim();
                // 只有空白的列不能成为客户编号，否则会匹配客户文件中的空行
                if key.is_empty() {
                    return Err(ExtractError::MalformedRecord {
                        stage: Stage::Sample,
                        line: rec.line_no(),
                        field: idx,
                        found: rec.field_count(),
                    });
                }
                key
            }
            None => rec.as_str().trim(),
        };
        if !keys.insert(key) {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        tracing::warn!("[Sample] {} duplicate customer keys ignored", duplicates);
    }
    tracing::info!("[Sample] 样本客户: {}", keys.len());
    Ok(keys)
}
