//! Incremental `text/event-stream` parser.
//!
//! Fed one line at a time; a blank line dispatches the event accumulated so
//! far. Handles `LF` and `CRLF` line endings.

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type; `"message"` when the server sent no `event:` field.
    pub event: String,
    /// Data lines joined with `\n`.
    pub data: String,
    /// Last event id seen on the stream, if any.
    pub id: Option<String>,
}

const DEFAULT_EVENT: &str = "message";

#[derive(Debug, Default)]
pub struct SseParser {
    event: String,
    data: String,
    has_data: bool,
    last_id: Option<String>,
    retry_ms: Option<u64>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconnection delay requested by the server, if any.
    pub fn retry_ms(&self) -> Option<u64> {
        self.retry_ms
    }

    /// Id of the last event seen, sent back as `Last-Event-ID` on reconnect.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Drops a partially received event. The last id and retry delay survive.
    pub fn discard_pending(&mut self) {
        self.event.clear();
        self.data.clear();
        self.has_data = false;
    }

    /// Consumes one line (with or without its terminator).
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = value.to_string(),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse() {
                    self.retry_ms = Some(ms);
                }
            }
            other => log::trace!("ignoring sse field {other:?}"),
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = std::mem::take(&mut self.event);
        if !self.has_data {
            return None;
        }

        self.has_data = false;
        Some(SseEvent {
            event: if event.is_empty() {
                DEFAULT_EVENT.to_string()
            } else {
                event
            },
            data: std::mem::take(&mut self.data),
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<SseEvent> {
        let mut parser = SseParser::new();
        text.split_inclusive('\n')
            .filter_map(|line| parser.feed_line(line))
            .collect()
    }

    #[test]
    fn named_event() {
        let events = parse("event: files-changed\ndata: triangle.wgsl\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "files-changed");
        assert_eq!(events[0].data, "triangle.wgsl");
    }

    #[test]
    fn unnamed_event_is_message() {
        let events = parse("data: hi\n\n");
        assert_eq!(events[0].event, "message");
    }

    #[test]
    fn multi_line_data_joined() {
        let events = parse("data: a\ndata: b\ndata\n\n");
        assert_eq!(events[0].data, "a\nb\n");
    }

    #[test]
    fn crlf_lines() {
        let events = parse("event: files-changed\r\ndata: x\r\n\r\n");
        assert_eq!(events[0].event, "files-changed");
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn comments_and_keepalives_dispatch_nothing() {
        assert!(parse(": ping\n\n: ping\n\n").is_empty());
    }

    #[test]
    fn event_without_data_is_dropped_and_type_reset() {
        let events = parse("event: files-changed\n\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
    }

    #[test]
    fn only_one_leading_space_stripped() {
        let events = parse("data:  two\n\n");
        assert_eq!(events[0].data, " two");
    }

    #[test]
    fn id_persists_across_events() {
        let events = parse("id: 7\ndata: a\n\ndata: b\n\n");
        assert_eq!(events[0].id.as_deref(), Some("7"));
        assert_eq!(events[1].id.as_deref(), Some("7"));
    }

    #[test]
    fn retry_must_be_numeric() {
        let mut parser = SseParser::new();
        parser.feed_line("retry: soon\n");
        assert_eq!(parser.retry_ms(), None);
        parser.feed_line("retry: 1500\n");
        assert_eq!(parser.retry_ms(), Some(1500));
    }

    #[test]
    fn trailing_event_without_blank_line_is_not_dispatched() {
        assert!(parse("event: files-changed\ndata: x\n").is_empty());
    }

    #[test]
    fn reconnect_keeps_id_but_drops_partial_event() {
        let mut parser = SseParser::new();
        for line in ["id: 7
", "data: done
", "
", "event: files-changed
", "data: half
"] {
            parser.feed_line(line);
        }

        parser.discard_pending();

        assert_eq!(parser.last_event_id(), Some("7"));
        let event = parser.feed_line("data: fresh
").or_else(|| parser.feed_line("
"));
        let event = event.unwrap();
        assert_eq!(event.event, "message");
        assert_eq!(event.data, "fresh");
    }
}
