use crate::error::{ExtractError, Result};
use crate::models::Stage;

/// 字段分隔符，不处理引号与转义
pub const FIELD_DELIMITER: char = ',';

/// 输入文件中的一行记录，字段按位置访问，内容原样透传
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    line: &'a str,
    line_no: usize,
}

impl<'a> Record<'a> {
    pub fn new(line: &'a str, line_no: usize) -> Self {
        Self { line, line_no }
    }

    pub fn as_str(&self) -> &'a str {
        self.line
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.line.split(FIELD_DELIMITER).nth(index)
    }

    pub fn field_count(&self) -> usize {
        self.line.split(FIELD_DELIMITER).count()
    }

    /// 取关联键；字段缺失或为空视为格式错误
    pub fn key(&self, index: usize, stage: Stage) -> Result<&'a str> {
        match self.field(index) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ExtractError::MalformedRecord {
                stage,
                line: self.line_no,
                field: index,
                found: self.field_count(),
            }),
        }
    }
}
