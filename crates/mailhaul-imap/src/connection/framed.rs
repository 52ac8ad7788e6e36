//! Line-oriented I/O for the IMAP protocol.
//!
//! The server side of every exchange this engine performs is a sequence of
//! CRLF-terminated text lines; literals are out of scope. This module
//! provides buffered line reading, flush-immediately command writing, and
//! the tag correlator that collects response lines until the completion
//! line arrives.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::Result;

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum line length to prevent memory exhaustion.
const MAX_LINE_LENGTH: usize = 1024 * 1024; // 1 MB

/// Line-framed connection for the IMAP protocol.
pub struct LineStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> LineStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new line stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
        }
    }

    /// Reads a single line, returning it without its terminator.
    ///
    /// A connection closed before a terminator arrives yields
    /// `io::ErrorKind::UnexpectedEof` so callers waiting on a tag can tell
    /// a dropped connection from a slow server.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Err(crate::Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }

            if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&buf[..=pos]);
                self.reader.consume(pos + 1);
                break;
            }

            // No terminator yet, consume all and continue
            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > MAX_LINE_LENGTH {
                return Err(crate::Error::Protocol("line too long".to_string()));
            }
        }

        if line.ends_with(b"\n") {
            line.pop();
        }
        if line.ends_with(b"\r") {
            line.pop();
        }

        let text = String::from_utf8_lossy(&line).into_owned();
        tracing::trace!("S: {text}");
        Ok(text)
    }

    /// Writes a command line and flushes immediately.
    ///
    /// Each command must reach the server before the corresponding read
    /// begins; nothing is buffered across calls.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        tracing::trace!("C: {}", String::from_utf8_lossy(data).trim_end());

        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(data);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buffer).await?;
        stream.flush().await?;

        Ok(())
    }

    /// Gets a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }

    /// Consumes the line stream and returns the inner stream.
    ///
    /// Note: Any buffered data will be lost.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// A response reader that collects lines until the completion line carrying
/// a given tag arrives.
///
/// Correlation is textual: a line terminates the response if it contains
/// the tag anywhere as a substring. Only one command is ever in flight, so
/// every line read before the completion line belongs to that command's
/// response.
pub struct ResponseAccumulator {
    tag: String,
    lines: Vec<String>,
}

impl ResponseAccumulator {
    /// Creates a new response accumulator for the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            lines: Vec::new(),
        }
    }

    /// Reads lines until one contains the tag, returning every line read
    /// (terminator included) in arrival order. The result is never empty.
    pub async fn read_until_tag<S>(&mut self, stream: &mut LineStream<S>) -> Result<Vec<String>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let line = stream.read_line().await?;
            let done = line.contains(&self.tag);
            self.lines.push(line);
            if done {
                break;
            }
        }

        Ok(std::mem::take(&mut self.lines))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn test_read_line_strips_terminator() {
        let mock = Builder::new().read(b"* OK ready\r\n").build();
        let mut stream = LineStream::new(mock);

        let line = stream.read_line().await.unwrap();
        assert_eq!(line, "* OK ready");
    }

    #[tokio::test]
    async fn test_read_line_across_chunks() {
        let mock = Builder::new().read(b"* OK re").read(b"ady\r\n").build();
        let mut stream = LineStream::new(mock);

        let line = stream.read_line().await.unwrap();
        assert_eq!(line, "* OK ready");
    }

    #[tokio::test]
    async fn test_read_line_eof() {
        let mock = Builder::new().build();
        let mut stream = LineStream::new(mock);

        let err = stream.read_line().await.unwrap_err();
        match err {
            crate::Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_command() {
        let mock = Builder::new().write(b"A1 LOGIN user pass\r\n").build();
        let mut stream = LineStream::new(mock);

        stream.write_command(b"A1 LOGIN user pass\r\n").await.unwrap();
    }

    #[tokio::test]
    async fn test_accumulator_collects_through_tag() {
        let mock = Builder::new()
            .read(b"* CAPABILITY IMAP4rev1\r\n")
            .read(b"* OK still here\r\n")
            .read(b"A1 OK Success\r\n")
            .build();

        let mut stream = LineStream::new(mock);
        let mut accumulator = ResponseAccumulator::new("A1");

        let lines = accumulator.read_until_tag(&mut stream).await.unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "* CAPABILITY IMAP4rev1");
        assert_eq!(lines[1], "* OK still here");
        assert_eq!(lines[2], "A1 OK Success");
    }

    #[tokio::test]
    async fn test_accumulator_stops_at_first_tag_line() {
        let mock = Builder::new()
            .read(b"A1 OK done\r\nA2 OK should not be read\r\n")
            .build();

        let mut stream = LineStream::new(mock);
        let mut accumulator = ResponseAccumulator::new("A1");

        let lines = accumulator.read_until_tag(&mut stream).await.unwrap();
        assert_eq!(lines, vec!["A1 OK done".to_string()]);
    }

    #[tokio::test]
    async fn test_accumulator_matches_tag_as_substring() {
        let mock = Builder::new().read(b"prefix A9 OK suffix\r\n").build();

        let mut stream = LineStream::new(mock);
        let mut accumulator = ResponseAccumulator::new("A9");

        let lines = accumulator.read_until_tag(&mut stream).await.unwrap();
        assert_eq!(lines, vec!["prefix A9 OK suffix".to_string()]);
    }

    #[tokio::test]
    async fn test_accumulator_eof_before_tag() {
        let mock = Builder::new().read(b"* untagged noise\r\n").build();

        let mut stream = LineStream::new(mock);
        let mut accumulator = ResponseAccumulator::new("A1");

        let result = accumulator.read_until_tag(&mut stream).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_line_length_limit() {
        let long_line = "A".repeat(MAX_LINE_LENGTH + 100);
        let mock = Builder::new().read(long_line.as_bytes()).build();
        let mut stream = LineStream::new(mock);

        let result = stream.read_line().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("line too long"));
    }
}
