//! First-error-wins output wrapper.

use std::fmt;
use std::io::{self, Write};

/// Wraps a sink so that the first failed write disarms it.
///
/// After a failure every later write is skipped and the original error is
/// kept for the caller to collect with [`ErrorWriter::take_error`]. This
/// lets rendering code write unconditionally and check once at the end.
pub struct ErrorWriter<W: Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: Write> ErrorWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    /// Entry point for `write!`/`writeln!`.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.inner.write_fmt(args) {
            self.error = Some(err);
        }
    }

    pub fn flush(&mut self) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.inner.flush() {
            self.error = Some(err);
        }
    }

    /// Take the first write error.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `budget` writes, then fails every call.
    struct FlakySink {
        budget: usize,
        calls: usize,
        written: Vec<u8>,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls > self.budget {
                return Err(io::Error::other(format!("write {} failed", self.calls)));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn passes_writes_through() {
        let mut out = ErrorWriter::new(Vec::new());
        write!(out, "a");
        write!(out, "{}-{}", 1, 2);
        writeln!(out);
        out.flush();
        assert!(out.take_error().is_none());
        assert_eq!(out.into_inner(), b"a1-2\n");
    }

    #[test]
    fn keeps_first_error_and_skips_later_writes() {
        let mut out = ErrorWriter::new(FlakySink {
            budget: 1,
            calls: 0,
            written: Vec::new(),
        });
        write!(out, "ok");
        write!(out, "lost");
        write!(out, "also lost");
        writeln!(out, "{}", "skipped");
        out.flush();

        assert_eq!(out.get_ref().calls, 2);
        assert_eq!(out.get_ref().written, b"ok");

        let err = out.take_error().unwrap();
        assert_eq!(err.to_string(), "write 2 failed");
        assert!(out.take_error().is_none());
    }
}
