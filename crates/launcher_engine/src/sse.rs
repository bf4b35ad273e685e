use bytes::{Buf, BytesMut};
use serde_json::Value;

/// One decoded frame of an OpenAI-compatible chat completion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    Done,
    Error(String),
}

/// Incremental parser for `text/event-stream` chat completion bodies.
///
/// Bytes are buffered until a blank line closes the frame, so multi-byte
/// characters split across network chunks decode intact.
#[derive(Debug, Default)]
pub struct ChatStreamParser {
    buffer: BytesMut,
}

impl ChatStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some((end, separator_len)) = find_frame_end(&self.buffer) {
            let frame = self.buffer.split_to(end);
            self.buffer.advance(separator_len);
            if let Some(event) = parse_frame(&String::from_utf8_lossy(&frame)) {
                events.push(event);
            }
        }

        events
    }

    /// Flush a trailing frame left unterminated when the body ended.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = self.buffer.split();
        parse_frame(&String::from_utf8_lossy(&rest))
            .into_iter()
            .collect()
    }
}

fn find_frame_end(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer
        .windows(2)
        .position(|window| window == b"\n\n")
        .map(|index| (index, 2));
    let crlf = buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|index| (index, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if crlf.0 < lf.0 { crlf } else { lf }),
        (lf, crlf) => lf.or(crlf),
    }
}

fn parse_frame(frame: &str) -> Option<StreamEvent> {
    let data_lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.trim_end_matches('\r').strip_prefix("data:"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect();
    if data_lines.is_empty() {
        return None;
    }

    let payload = data_lines.join("\n");
    if payload == "[DONE]" {
        return Some(StreamEvent::Done);
    }

    let value: Value = serde_json::from_str(&payload).ok()?;
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| error.to_string());
        return Some(StreamEvent::Error(message));
    }

    let content = value
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;
    if content.is_empty() {
        None
    } else {
        Some(StreamEvent::Delta(content.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatStreamParser, StreamEvent};

    fn delta_frame(content: &str) -> String {
        format!("data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n")
    }

    #[test]
    fn parses_deltas_and_done() {
        let mut parser = ChatStreamParser::default();
        let mut events = parser.feed(delta_frame("Hel").as_bytes());
        events.extend(parser.feed(delta_frame("lo").as_bytes()));
        events.extend(parser.feed(b"data: [DONE]\n\n"));

        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hel".to_string()),
                StreamEvent::Delta("lo".to_string()),
                StreamEvent::Done,
            ]
        );
        assert!(parser.finish().is_empty());
    }

    #[test]
    fn frames_split_across_chunks() {
        let body = delta_frame("héllo");
        let bytes = body.as_bytes();
        let mut parser = ChatStreamParser::default();
        let mut events = Vec::new();
        for chunk in bytes.chunks(3) {
            events.extend(parser.feed(chunk));
        }

        assert_eq!(events, vec![StreamEvent::Delta("héllo".to_string())]);
    }

    #[test]
    fn role_only_and_comment_frames_are_skipped() {
        let mut parser = ChatStreamParser::default();
        let events = parser.feed(
            b": keep-alive\n\ndata: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        );
        assert!(events.is_empty());
    }

    #[test]
    fn crlf_frames_and_error_payloads() {
        let mut parser = ChatStreamParser::default();
        let events = parser.feed(b"data: {\"error\":{\"message\":\"model not loaded\"}}\r\n\r\n");
        assert_eq!(
            events,
            vec![StreamEvent::Error("model not loaded".to_string())]
        );
    }

    #[test]
    fn finish_flushes_unterminated_frame() {
        let mut parser = ChatStreamParser::default();
        let frame = delta_frame("tail");
        assert!(parser.feed(frame.trim_end().as_bytes()).is_empty());
        assert_eq!(parser.finish(), vec![StreamEvent::Delta("tail".to_string())]);
    }
}
