// src/exec/output.rs

//! Lossily-decoded line reader over a child's combined stdout/stderr pipe.

use std::io::{self, PipeReader};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::warn;

#[cfg(unix)]
pub type PipeStream = tokio::net::unix::pipe::Receiver;
#[cfg(not(unix))]
pub type PipeStream = tokio::fs::File;

/// Read end of the pipe both of the child's output streams write into.
#[derive(Debug)]
pub struct OutputPipe(PipeStream);

impl OutputPipe {
    /// Register the read end with the runtime. Must be called from within
    /// a Tokio context.
    #[cfg(unix)]
    pub fn open(reader: PipeReader) -> io::Result<Self> {
        use std::os::fd::OwnedFd;
        tokio::net::unix::pipe::Receiver::from_owned_fd(OwnedFd::from(reader)).map(Self)
    }

    #[cfg(not(unix))]
    pub fn open(reader: PipeReader) -> io::Result<Self> {
        use std::os::windows::io::OwnedHandle;
        let file = std::fs::File::from(OwnedHandle::from(reader));
        Ok(Self(tokio::fs::File::from_std(file)))
    }

    pub fn into_lines(self) -> OutputLines<PipeStream> {
        OutputLines::new(self.0)
    }
}

/// A byte stream, read line by line.
///
/// Bytes are accumulated in `buf` across calls, so `next_line` can be
/// cancelled (e.g. inside `tokio::select!`) without losing data.
#[derive(Debug)]
pub struct OutputLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> OutputLines<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    /// Next complete line, or the trailing unterminated one at EOF.
    /// `None` once the stream is closed and empty.
    pub async fn next_line(&mut self) -> Option<String> {
        match self.reader.read_until(b'\n', &mut self.buf).await {
            Ok(_) if self.buf.is_empty() => None,
            Ok(_) => Some(decode_line(std::mem::take(&mut self.buf))),
            Err(err) => {
                // Windows reports a closed pipe as BrokenPipe rather than EOF.
                if err.kind() != io::ErrorKind::BrokenPipe {
                    warn!(error = %err, "error reading process output; closing pipe");
                }
                if self.buf.is_empty() {
                    None
                } else {
                    Some(decode_line(std::mem::take(&mut self.buf)))
                }
            }
        }
    }
}

/// Strip the line terminator and replace invalid UTF-8.
fn decode_line(bytes: Vec<u8>) -> String {
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_suffix('\n').unwrap_or(&text);
    let text = text.strip_suffix('\r').unwrap_or(text);
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_strips_terminators_and_replaces_bad_bytes() {
        assert_eq!(decode_line(b"hello\r\n".to_vec()), "hello");
        assert_eq!(decode_line(b"tail".to_vec()), "tail");
        assert_eq!(decode_line(b"bad \xff byte\n".to_vec()), "bad \u{FFFD} byte");
        assert_eq!(decode_line(b"\n".to_vec()), "");
    }

    #[tokio::test]
    async fn reads_lines_then_trailing_fragment() {
        let out: &[u8] = b"a1\n\na2\r\na3";
        let mut lines = OutputLines::new(out);

        let mut got = Vec::new();
        while let Some(line) = lines.next_line().await {
            got.push(line);
        }

        assert_eq!(got, vec!["a1", "", "a2", "a3"]);
    }

    #[tokio::test]
    async fn empty_stream_has_no_lines() {
        let mut lines = OutputLines::new(&b""[..]);
        assert_eq!(lines.next_line().await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipe_reports_eof_after_all_writers_close() {
        use std::io::Write;

        let (reader, mut writer) = io::pipe().unwrap();
        let mut lines = OutputPipe::open(reader).unwrap().into_lines();

        let mut second = writer.try_clone().unwrap();
        writer.write_all(b"from stdout\n").unwrap();
        second.write_all(b"from stderr\n").unwrap();
        drop(writer);
        drop(second);

        assert_eq!(lines.next_line().await.as_deref(), Some("from stdout"));
        assert_eq!(lines.next_line().await.as_deref(), Some("from stderr"));
        assert_eq!(lines.next_line().await, None);
    }
}
