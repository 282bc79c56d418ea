use crate::error::{ExtractError, Result};
use crate::models::{Record, Stage};
use std::io::{BufRead, Write};

/// 逐行读取输入，跟踪行号并把 I/O 错误归属到阶段
pub struct LineReader<R> {
    inner: R,
    stage: Stage,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, stage: Stage) -> Self {
        Self {
            inner,
            stage,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// 读取下一行，去掉 `\n` 或 `\r\n`；输入结束时返回 None
    pub fn next_record(&mut self) -> Result<Option<Record<'_>>> {
        self.buf.clear();
        let read = self
            .inner
            .read_line(&mut self.buf)
            .map_err(|source| ExtractError::Io {
                stage: self.stage,
                line: self.line_no + 1,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        if self.buf.ends_with('\n') {
            self.buf.pop();
            if self.buf.ends_with('\r') {
                self.buf.pop();
            }
        }
        Ok(Some(Record::new(&self.buf, self.line_no)))
    }

    /// 已读取的行数（含表头）
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

/// 逐行写出，每行（含表头）以 `\n` 结尾
///
/// 写出失败时报告的行号是正在写出的那条输入记录的行号。
pub struct LineWriter<W: Write> {
    inner: W,
    stage: Stage,
    lines_written: usize,
    last_input_line: usize,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W, stage: Stage) -> Self {
        Self {
            inner,
            stage,
            lines_written: 0,
            last_input_line: 0,
        }
    }

    pub fn write_record(&mut self, record: &Record<'_>) -> Result<()> {
        let line_no = record.line_no();
        self.inner
            .write_all(record.as_str().as_bytes())
            .and_then(|_| self.inner.write_all(b"\n"))
            .map_err(|source| self.io_error(line_no, source))?;
        self.lines_written += 1;
        self.last_input_line = line_no;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// 刷新缓冲并交还底层 writer；出错时报告最后写出记录的输入行号
    pub fn finish(mut self) -> Result<W> {
        let line_no = self.last_input_line;
        self.inner
            .flush()
            .map_err(|source| self.io_error(line_no, source))?;
        Ok(self.inner)
    }

    fn io_error(&self, line: usize, source: std::io::Error) -> ExtractError {
        ExtractError::Io {
            stage: self.stage,
            line,
            source,
        }
    }
}
