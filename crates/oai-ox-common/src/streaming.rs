use futures_util::StreamExt;

use crate::{error::CommonRequestError, transport::ByteStream};

/// Sentinel payload that ends an OpenAI-style event stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Server-Sent Events parser for streaming responses.
///
/// Yields the raw `data:` payload of every event, in order. Parsing stops at
/// the `[DONE]` sentinel; anything sent after it is never read.
pub struct SseParser {
    byte_stream: ByteStream,
    buffer: Vec<u8>,
    data_lines: Vec<String>,
    finished: bool,
}

impl SseParser {
    pub fn new(byte_stream: ByteStream) -> Self {
        Self {
            byte_stream,
            buffer: Vec::new(),
            data_lines: Vec::new(),
            finished: false,
        }
    }

    /// Whether the `[DONE]` sentinel (or the end of the body) has been reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Get the next event payload from the stream
    pub async fn next_event(&mut self) -> Result<Option<String>, CommonRequestError> {
        loop {
            if self.finished {
                return Ok(None);
            }

            if let Some(event) = self.try_parse_event_from_buffer()? {
                return Ok(Some(event));
            }

            if self.finished {
                return Ok(None);
            }

            match self.byte_stream.next().await {
                Some(chunk_result) => {
                    let chunk = chunk_result?;
                    self.buffer.extend_from_slice(&chunk);
                }
                None => {
                    // Body ended without an explicit terminator
                    let event = self.try_parse_final_event()?;
                    self.finished = true;
                    return Ok(event);
                }
            }
        }
    }

    /// Try to parse an event from the current buffer
    fn try_parse_event_from_buffer(&mut self) -> Result<Option<String>, CommonRequestError> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let line = String::from_utf8(line_bytes)?;

            if let Some(event) = self.process_line(&line) {
                return Ok(Some(event));
            }

            if self.finished {
                return Ok(None);
            }
        }

        Ok(None)
    }

    /// Try to parse any remaining data as final event
    fn try_parse_final_event(&mut self) -> Result<Option<String>, CommonRequestError> {
        if !self.buffer.is_empty() {
            let line = String::from_utf8(std::mem::take(&mut self.buffer))?;
            if let Some(event) = self.process_line(&line) {
                return Ok(Some(event));
            }
        }

        Ok(self.finalize_event())
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.trim_end().is_empty() {
            return self.finalize_event();
        }

        if line.starts_with(':') {
            return None;
        }

        if let Some(rest) = line.strip_prefix("data:") {
            let data = rest.strip_prefix(' ').unwrap_or(rest);

            if data.trim() == DONE_SENTINEL {
                log::debug!("event stream reached {DONE_SENTINEL}");
                self.data_lines.clear();
                self.finished = true;
                return None;
            }

            self.data_lines.push(data.to_string());
        }

        // Other SSE fields (event, id, retry) carry nothing we use
        None
    }

    fn finalize_event(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }

        let payload = self.data_lines.join("\n");
        self.data_lines.clear();

        if payload.trim().is_empty() {
            return None;
        }

        Some(payload)
    }
}

/// Parse every event payload contained in a complete SSE body
pub fn parse_sse_events(chunk: &str) -> Vec<String> {
    let mut events = Vec::new();
    let mut data_lines: Vec<String> = Vec::new();

    for line in chunk.lines() {
        let line = line.trim_end_matches('\r');

        if line.is_empty() {
            if !data_lines.is_empty() {
                events.push(data_lines.join("\n"));
                data_lines.clear();
            }
            continue;
        }

        if line.starts_with(':') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("data:") {
            let data = rest.strip_prefix(' ').unwrap_or(rest);

            if data.trim() == DONE_SENTINEL {
                data_lines.clear();
                return events;
            }

            data_lines.push(data.to_string());
        }
    }

    if !data_lines.is_empty() {
        events.push(data_lines.join("\n"));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use bytes::Bytes;

    fn byte_stream(chunks: &[&'static str]) -> ByteStream {
        let items: Vec<Result<Bytes, TransportError>> = chunks
            .iter()
            .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
            .collect();
        futures_util::stream::iter(items).boxed()
    }

    async fn collect(mut parser: SseParser) -> Vec<String> {
        let mut events = Vec::new();
        while let Some(event) = parser.next_event().await.expect("valid stream") {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn yields_each_event_then_stops_at_done() {
        let parser = SseParser::new(byte_stream(&[
            "data: {\"n\":1}\n\n",
            "data: {\"n\":2}\n\n",
            "data: {\"n\":3}\n\n",
            "data: [DONE]\n\n",
        ]));

        let events = collect(parser).await;
        assert_eq!(events, vec!["{\"n\":1}", "{\"n\":2}", "{\"n\":3}"]);
    }

    #[tokio::test]
    async fn handles_events_split_across_chunks() {
        let parser = SseParser::new(byte_stream(&[
            "da",
            "ta: {\"a\":",
            "1}\r\n",
            "\r\ndata: {\"b\":2}\n",
            "\ndata: [DO",
            "NE]\n\n",
        ]));

        let events = collect(parser).await;
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[tokio::test]
    async fn ignores_comments_and_other_fields() {
        let parser = SseParser::new(byte_stream(&[
            ": keep-alive\n\n",
            "event: message\nid: 7\ndata: {\"ok\":true}\n\n",
            "data: [DONE]\n\n",
        ]));

        assert_eq!(collect(parser).await, vec!["{\"ok\":true}"]);
    }

    #[tokio::test]
    async fn nothing_after_done_is_read() {
        let mut parser = SseParser::new(byte_stream(&[
            "data: {\"n\":1}\n\ndata: [DONE]\n\ndata: {\"n\":2}\n\n",
        ]));

        assert_eq!(parser.next_event().await.unwrap(), Some("{\"n\":1}".to_string()));
        assert_eq!(parser.next_event().await.unwrap(), None);
        assert!(parser.is_finished());
        assert_eq!(parser.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn flushes_trailing_event_without_blank_line() {
        let parser = SseParser::new(byte_stream(&["data: {\"tail\":1}"]));
        assert_eq!(collect(parser).await, vec!["{\"tail\":1}"]);
    }

    #[tokio::test]
    async fn joins_multiline_data() {
        let parser = SseParser::new(byte_stream(&["data: {\"a\":\ndata: 1}\n\n"]));
        assert_eq!(collect(parser).await, vec!["{\"a\":\n1}"]);
    }

    #[test]
    fn test_parse_sse_events_empty() {
        assert!(parse_sse_events("").is_empty());
    }

    #[test]
    fn test_parse_sse_events_done_message() {
        assert!(parse_sse_events("data: [DONE]\n").is_empty());
    }

    #[test]
    fn test_parse_sse_events_stops_at_done() {
        let events = parse_sse_events("data: {\"test\": \"value\"}\n\ndata: [DONE]\n\ndata: {}\n\n");
        assert_eq!(events, vec!["{\"test\": \"value\"}"]);
    }
}
