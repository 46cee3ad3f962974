//! Incremental part reader over a raw body stream

use super::{ContentDisposition, MultipartError};
use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::future::poll_fn;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Reads a multipart body as a lazy, finite, forward-only sequence of
/// [`Part`]s.
///
/// The reader borrows the request's body stream for its whole lifetime
/// and never buffers more than one inbound chunk plus a delimiter-sized
/// tail. Calling [`next_part`](Self::next_part) drains whatever is left
/// of the previous part's body, so a caller may abandon a body at any
/// point without corrupting the sequence.
pub struct PartReader<S> {
    stream: S,
    buf: BytesMut,
    /// `\r\n--{boundary}`
    delimiter: Vec<u8>,
    state: ReaderState,
    max_header_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Inside a part body, or the preamble before the first boundary
    InBody,
    /// A delimiter was just consumed; the boundary line's tail has not
    /// been examined yet
    Boundary,
    /// The closing delimiter was seen, or the stream failed
    Finished,
}

impl<S> PartReader<S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    /// Open a part sequence over `body` with the given boundary token.
    pub fn new(body: S, boundary: &str, max_header_bytes: usize) -> Self {
        let mut delimiter = Vec::with_capacity(boundary.len() + 4);
        delimiter.extend_from_slice(b"\r\n--");
        delimiter.extend_from_slice(boundary.as_bytes());

        // Seed the buffer with a CRLF so the first boundary, which may
        // appear at the very start of the body without a preceding
        // CRLF, matches the same delimiter as every later one. The
        // seed is discarded along with the preamble.
        let mut buf = BytesMut::with_capacity(delimiter.len() + 2);
        buf.extend_from_slice(b"\r\n");

        Self {
            stream: body,
            buf,
            delimiter,
            state: ReaderState::InBody,
            max_header_bytes,
        }
    }

    /// Advance to the next part, draining any unread remainder of the
    /// previous one. Returns `Ok(None)` after the closing boundary.
    pub async fn next_part(&mut self) -> Result<Option<Part<'_, S>>, MultipartError> {
        match self.state {
            ReaderState::Finished => return Ok(None),
            ReaderState::InBody => {
                while let Some(chunk) = poll_fn(|cx| self.poll_chunk(cx)).await {
                    chunk?;
                }
            }
            ReaderState::Boundary => {}
        }

        // The delimiter has been consumed; what follows is either the
        // close marker or (after optional padding) a CRLF and headers.
        while self.buf.len() < 2 {
            if !self.fill().await? {
                self.state = ReaderState::Finished;
                return Err(MultipartError::Truncated);
            }
        }
        if &self.buf[..2] == b"--" {
            self.state = ReaderState::Finished;
            return Ok(None);
        }

        let mut header_bytes = 0usize;
        // Rest of the boundary line is transport padding.
        self.read_line(&mut header_bytes).await?;

        let mut disposition = None;
        let mut content_type = None;
        loop {
            let line = self.read_line(&mut header_bytes).await?;
            if line.is_empty() {
                break;
            }
            let Ok(line) = std::str::from_utf8(&line) else {
                continue;
            };
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "content-disposition" => disposition = ContentDisposition::parse(value.trim()),
                "content-type" => content_type = Some(value.trim().to_string()),
                _ => {}
            }
        }

        self.state = ReaderState::InBody;
        Ok(Some(Part {
            disposition,
            content_type,
            reader: self,
        }))
    }

    /// Produce the next chunk of the current part's body. `None` means
    /// the body is finished (its delimiter has been consumed).
    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Bytes, MultipartError>>> {
        loop {
            if self.state != ReaderState::InBody {
                return Poll::Ready(None);
            }

            if let Some(pos) = find(&self.buf, &self.delimiter) {
                if pos > 0 {
                    return Poll::Ready(Some(Ok(self.buf.split_to(pos).freeze())));
                }
                // A delimiter is only a boundary when followed by CRLF,
                // the close marker, or transport padding; otherwise the
                // body just happens to contain the token. Two bytes of
                // lookahead decide.
                if self.buf.len() < self.delimiter.len() + 2 {
                    match ready!(Pin::new(&mut self.stream).poll_next(cx)) {
                        Some(Ok(chunk)) => {
                            self.buf.extend_from_slice(&chunk);
                            continue;
                        }
                        Some(Err(e)) => {
                            self.state = ReaderState::Finished;
                            return Poll::Ready(Some(Err(MultipartError::Body(e))));
                        }
                        None => {
                            self.state = ReaderState::Finished;
                            return Poll::Ready(Some(Err(MultipartError::Truncated)));
                        }
                    }
                }
                let next = &self.buf[self.delimiter.len()..self.delimiter.len() + 2];
                if next == b"--" || next == b"\r\n" || next[0] == b' ' || next[0] == b'\t' {
                    self.buf.advance(self.delimiter.len());
                    self.state = ReaderState::Boundary;
                    return Poll::Ready(None);
                }
                return Poll::Ready(Some(Ok(self.buf.split_to(1).freeze())));
            }

            // No full delimiter buffered. Emit everything except a tail
            // one byte shorter than the delimiter, which could still be
            // the start of one split across inbound chunks.
            let emit = self.buf.len().saturating_sub(self.delimiter.len() - 1);
            if emit > 0 {
                return Poll::Ready(Some(Ok(self.buf.split_to(emit).freeze())));
            }

            match ready!(Pin::new(&mut self.stream).poll_next(cx)) {
                Some(Ok(chunk)) => self.buf.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    self.state = ReaderState::Finished;
                    return Poll::Ready(Some(Err(MultipartError::Body(e))));
                }
                None => {
                    self.state = ReaderState::Finished;
                    return Poll::Ready(Some(Err(MultipartError::Truncated)));
                }
            }
        }
    }

    /// Pull one chunk from the underlying stream into the buffer.
    /// Returns `false` at end of stream.
    async fn fill(&mut self) -> Result<bool, MultipartError> {
        match self.stream.next().await {
            Some(Ok(chunk)) => {
                self.buf.extend_from_slice(&chunk);
                Ok(true)
            }
            Some(Err(e)) => {
                self.state = ReaderState::Finished;
                Err(MultipartError::Body(e))
            }
            None => Ok(false),
        }
    }

    /// Read one CRLF-terminated header line, enforcing the per-part
    /// header budget.
    async fn read_line(&mut self, header_bytes: &mut usize) -> Result<Bytes, MultipartError> {
        loop {
            if let Some(pos) = find(&self.buf, b"\r\n") {
                *header_bytes += pos + 2;
                if *header_bytes > self.max_header_bytes {
                    return Err(MultipartError::HeaderTooLarge {
                        max: self.max_header_bytes,
                    });
                }
                let line = self.buf.split_to(pos).freeze();
                self.buf.advance(2);
                return Ok(line);
            }
            if *header_bytes + self.buf.len() > self.max_header_bytes {
                return Err(MultipartError::HeaderTooLarge {
                    max: self.max_header_bytes,
                });
            }
            if !self.fill().await? {
                self.state = ReaderState::Finished;
                return Err(MultipartError::Truncated);
            }
        }
    }
}

/// One boundary-delimited section of a multipart body.
///
/// The part borrows the reader mutably, so its body is only readable
/// until the next part is requested; the borrow checker enforces the
/// single-consumption lifecycle. The body is exposed both as an async
/// [`chunk`](Self::chunk) method and as a [`Stream`] of byte chunks.
pub struct Part<'a, S> {
    disposition: Option<ContentDisposition>,
    content_type: Option<String>,
    reader: &'a mut PartReader<S>,
}

impl<S> Part<'_, S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    /// The `name` parameter of the Content-Disposition header
    pub fn name(&self) -> Option<&str> {
        self.disposition.as_ref().and_then(|d| d.name.as_deref())
    }

    /// The raw `filename` parameter, exactly as sent (quotes included)
    pub fn file_name(&self) -> Option<&str> {
        self.disposition.as_ref().and_then(|d| d.file_name.as_deref())
    }

    /// Whether this part carries an uploaded file rather than a plain
    /// form field
    pub fn is_file(&self) -> bool {
        self.disposition.as_ref().is_some_and(|d| d.is_file())
    }

    /// The part's own Content-Type header, if any
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Next chunk of the body, or `None` once the body is complete
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, MultipartError> {
        poll_fn(|cx| self.reader.poll_chunk(cx)).await.transpose()
    }
}

impl<S> Stream for Part<'_, S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    type Item = Result<Bytes, MultipartError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().reader.poll_chunk(cx)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
