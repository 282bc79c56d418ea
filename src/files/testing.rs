use std::io::{self, Write};

/// 第 `fail_at` 次 write 调用起返回错误；`fail_flush` 时 flush 失败
#[derive(Debug)]
pub(crate) struct FailingWriter {
    pub written: Vec<u8>,
    writes: usize,
    fail_at: Option<usize>,
    fail_flush: bool,
}

impl FailingWriter {
    pub(crate) fn failing_write(fail_at: usize) -> Self {
        Self {
            written: Vec::new(),
            writes: 0,
            fail_at: Some(fail_at),
            fail_flush: false,
        }
    }

    pub(crate) fn failing_flush() -> Self {
        Self {
            written: Vec::new(),
            writes: 0,
            fail_at: None,
            fail_flush: true,
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        if self.fail_at.is_some_and(|n| self.writes >= n) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.fail_flush {
            return Err(io::Error::new(io::ErrorKind::Other, "flush failed"));
        }
        Ok(())
    }
}
