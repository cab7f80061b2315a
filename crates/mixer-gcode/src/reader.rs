//! Byte-exact line streaming.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Streams lines as raw bytes, terminator included.
///
/// Lines are handed out by reference into an internal buffer, so a whole
/// print file is never held in memory.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl LineReader<BufReader<File>> {
    /// Open a file for line streaming.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(256),
        }
    }

    /// Next line including its `\n` (the final line may lack one).
    pub fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        let n = self.inner.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(&self.buf))
    }
}

/// Text view of a raw line for pattern matching.
pub fn line_text(line: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(line)
}
