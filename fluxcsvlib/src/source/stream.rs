//! Closable byte streams.
//!
//! The decoder reads from a [`Source`]: any [`Read`] that can also be closed
//! explicitly, reporting failures on close. Transports that need to release
//! a connection or report a trailing error implement `close`; plain readers
//! use the default no-op.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Stdin, StdinLock};

/// A readable byte stream with an explicit, fallible close.
///
/// The decoder calls `close` exactly once.
pub trait Source: Read {
    /// Release the underlying stream.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Source for File {}

impl Source for Stdin {}

impl Source for StdinLock<'_> {}

impl Source for &[u8] {}

impl<T: AsRef<[u8]>> Source for Cursor<T> {}

impl<R: Read> Source for BufReader<R> {}

impl<S: Source + ?Sized> Source for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts a reader and a close callback into a [`Source`].
///
/// ```rust
/// use std::io::Read;
/// use fluxcsvlib::source::{CloseWith, Source};
///
/// let mut source = CloseWith::new("a,b\n".as_bytes(), || Ok(()));
/// let mut text = String::new();
/// source.read_to_string(&mut text).unwrap();
/// assert!(source.close().is_ok());
/// ```
pub struct CloseWith<R, F> {
    reader: R,
    on_close: F,
}

impl<R, F> CloseWith<R, F>
where
    R: Read,
    F: FnMut() -> io::Result<()>,
{
    pub fn new(reader: R, on_close: F) -> Self {
        Self { reader, on_close }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read, F> Read for CloseWith<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R, F> Source for CloseWith<R, F>
where
    R: Read,
    F: FnMut() -> io::Result<()>,
{
    fn close(&mut self) -> io::Result<()> {
        (self.on_close)()
    }
}
