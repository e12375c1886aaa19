//! Server-Sent Events (SSE) streaming parser.
//!
//! The Gemini API delivers streamed replies as SSE when asked with
//! `alt=sse`. This module parses a reqwest response body into events and
//! exposes the result as a lazy fragment stream the session can consume.

use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::{ChatError, ReplyStream};

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone)]
pub struct SseEvent {
    /// The event type, when the server sends one.
    pub event: Option<String>,
    /// The event data (one or more `data:` lines, newline-joined).
    pub data: String,
}

/// Incremental line-level SSE parser.
///
/// Feed it one line at a time; a completed event pops out whenever a
/// blank line terminates one. Handles CRLF endings, multi-line `data:`
/// fields, comment lines, and the optional space after the field colon.
#[derive(Debug, Default)]
pub struct SseParser {
    event: Option<String>,
    data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line; returns a complete event if this line closed one.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.take_event();
        }
        if line.starts_with(':') {
            // Comment / keep-alive
            return None;
        }

        if let Some(value) = field_value(line, "event") {
            self.event = Some(value.to_string());
        } else if let Some(value) = field_value(line, "data") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(value);
        }
        // Other fields (id:, retry:) are ignored
        None
    }

    /// Flush a trailing event not terminated by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.take_event()
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            self.event = None;
            return None;
        }
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}

/// Extract the value of `field: value` (the space after the colon is
/// optional per the SSE spec).
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Parse an SSE response body, calling `on_event` for each complete event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), ChatError> {
    let byte_stream = response.bytes_stream().map(|result| {
        result.map_err(|e| {
            if e.is_timeout() {
                std::io::Error::new(std::io::ErrorKind::TimedOut, e)
            } else {
                std::io::Error::other(e)
            }
        })
    });
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    let mut lines = reader.lines();
    let mut parser = SseParser::new();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                return Err(ChatError::Timeout);
            }
            Err(e) => return Err(ChatError::Network(e.to_string())),
        };
        if let Some(event) = parser.push_line(&line) {
            on_event(event);
        }
    }

    if let Some(event) = parser.finish() {
        on_event(event);
    }

    Ok(())
}

/// Turn an SSE response into a lazy fragment stream.
///
/// `extract` maps each event to the text fragment it carries:
/// `Ok(None)` for events with no text, `Err` for events that should
/// not occur on a healthy stream. The body is pumped in a background
/// task; fragments arrive in parse order and a failure surfaces as a
/// single trailing `Err` item.
pub(crate) fn fragment_stream<F>(response: reqwest::Response, extract: F) -> ReplyStream
where
    F: Fn(&SseEvent) -> Result<Option<String>, ChatError> + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<Result<String, ChatError>>();

    tokio::spawn(async move {
        let mut failed = false;
        let result = parse_sse_stream(response, |event| {
            if failed {
                return;
            }
            match extract(&event) {
                Ok(Some(text)) if !text.is_empty() => {
                    let _ = tx.send(Ok(text));
                }
                Ok(_) => {}
                Err(e) => {
                    failed = true;
                    let _ = tx.send(Err(e));
                }
            }
        })
        .await;
        if let Err(e) = result {
            if !failed {
                let _ = tx.send(Err(e));
            }
        }
    });

    Box::pin(futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(raw: &str) -> Vec<SseEvent> {
        let mut parser = SseParser::new();
        let mut events: Vec<SseEvent> = raw.lines().filter_map(|l| parser.push_line(l)).collect();
        events.extend(parser.finish());
        events
    }

    #[test]
    fn parses_simple_events() {
        let events = parse_all("data: one\n\ndata: two\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "one");
        assert_eq!(events[1].data, "two");
    }

    #[test]
    fn parses_event_type() {
        let events = parse_all("event: delta\ndata: {\"x\":1}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("delta"));
        assert_eq!(events[0].data, "{\"x\":1}");
    }

    #[test]
    fn event_type_does_not_leak_into_next_event() {
        let events = parse_all("event: delta\ndata: a\n\ndata: b\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.as_deref(), Some("delta"));
        assert!(events[1].event.is_none());
    }

    #[test]
    fn joins_multi_line_data() {
        let events = parse_all("data: line one\ndata: line two\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line one\nline two");
    }

    #[test]
    fn flushes_final_event_without_blank_line() {
        let events = parse_all("data: tail");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "tail");
    }

    #[test]
    fn blank_lines_without_data_emit_nothing() {
        assert!(parse_all("\n\n\n").is_empty());
        assert!(parse_all("event: noop\n\n").is_empty());
    }

    #[test]
    fn ignores_comments_and_unknown_fields() {
        let events = parse_all(": keep-alive\nid: 7\nretry: 100\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn colon_without_space_is_accepted() {
        let events = parse_all("data:compact\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "compact");
    }

    #[test]
    fn crlf_lines_are_handled() {
        let events = parse_all("data: a\r\n\r\ndata: b\r\n\r\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "a");
        assert_eq!(events[1].data, "b");
    }
}
