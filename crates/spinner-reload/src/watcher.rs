use crate::sse::SseEvent;

/// Event type the file server sends when something in its directory changed.
pub const FILES_CHANGED: &str = "files-changed";

/// The stream side of the watcher: something that can be closed.
pub trait EventStream {
    fn close(&mut self);
    fn is_closed(&self) -> bool;
}

/// The page side: whatever "reload" means for the host.
pub trait Reload {
    fn reload(&mut self);
}

impl<F: FnMut()> Reload for F {
    fn reload(&mut self) {
        self()
    }
}

/// What arrived on the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Message(SseEvent),
    Error(String),
}

/// Whether the reader should keep pulling events.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Reacts to stream events.
///
/// - `files-changed`: close the stream, then reload. Both happen once.
/// - error: logged; the stream is left as it is and nothing reloads.
/// - anything else: ignored.
pub struct ReloadWatcher<S, R> {
    source: String,
    stream: S,
    reload: R,
    reloaded: bool,
}

impl<S: EventStream, R: Reload> ReloadWatcher<S, R> {
    /// `source` names the stream in log lines, e.g. `events`.
    pub fn new(source: impl Into<String>, stream: S, reload: R) -> Self {
        Self {
            source: source.into(),
            stream,
            reload,
            reloaded: false,
        }
    }

    pub fn has_reloaded(&self) -> bool {
        self.reloaded
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    pub fn handle(&mut self, event: StreamEvent) -> Flow {
        match event {
            StreamEvent::Message(msg) if msg.event == FILES_CHANGED => {
                if self.reloaded {
                    return Flow::Stop;
                }
                log::info!("{} reported changed files: {}", self.source, msg.data);
                self.reloaded = true;
                self.stream.close();
                self.reload.reload();
                Flow::Stop
            }
            StreamEvent::Message(msg) => {
                log::trace!("ignoring '{}' event from {}", msg.event, self.source);
                Flow::Continue
            }
            StreamEvent::Error(reason) => {
                log::warn!("{}", failure_message(&self.source, &reason));
                Flow::Continue
            }
        }
    }
}

fn failure_message(source: &str, reason: &str) -> String {
    format!("server-sent event source '{source}' failed: {reason}")
}
