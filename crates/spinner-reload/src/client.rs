use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::header::ACCEPT;

use crate::sse::SseParser;
use crate::watcher::{EventStream, Flow, Reload, ReloadWatcher, StreamEvent};

/// Path of the event stream, relative to the server's base URL.
pub const EVENTS_PATH: &str = "events";

/// Reconnection delay when the server never sent a `retry:` field.
pub const DEFAULT_RETRY: Duration = Duration::from_secs(3);

const LAST_EVENT_ID: &str = "Last-Event-ID";

/// Shared close flag for one event stream.
///
/// The reader thread checks it between events; the page side sets it on
/// unload. Closing twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct StreamHandle {
    closed: Arc<AtomicBool>,
}

impl EventStream for StreamHandle {
    fn close(&mut self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            log::debug!("event stream closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Page-side handle to a running watcher.
pub struct ReloadHandle {
    url: Url,
    stream: StreamHandle,
}

impl ReloadHandle {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    /// Closes the stream ahead of the host tearing down, so the reader does
    /// not report the teardown as a stream error.
    pub fn unload(&mut self) {
        self.stream.close();
    }
}

impl Drop for ReloadHandle {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Resolves the event stream URL against the server's base URL.
pub fn events_url(base: &str) -> Result<Url> {
    let base = Url::parse(base).with_context(|| format!("invalid reload base URL {base:?}"))?;
    base.join(EVENTS_PATH)
        .with_context(|| format!("cannot resolve {EVENTS_PATH:?} against {base}"))
}

/// Opens the event stream at `base` + `events` on a background thread.
///
/// `reload` runs on that thread, at most once, when the server reports
/// changed files. A dropped connection is retried after the server's `retry`
/// delay (default [`DEFAULT_RETRY`]); an error status ends the watcher.
pub fn watch<R>(base: &str, reload: R) -> Result<ReloadHandle>
where
    R: Reload + Send + 'static,
{
    let url = events_url(base)?;
    let stream = StreamHandle::default();

    let reader_url = url.clone();
    let reader_stream = stream.clone();
    thread::Builder::new()
        .name("spinner-reload".to_string())
        .spawn(move || read_events(reader_url, reader_stream, reload))
        .context("failed to spawn event stream reader")?;

    log::info!("watching {url} for changes");
    Ok(ReloadHandle { url, stream })
}

/// How one connection to the event stream ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Session {
    /// The watcher closed the stream (reload or unload).
    Closed,
    /// The connection failed or ended; try again after the retry delay.
    Dropped,
    /// The server answered with a non-success status. Not retried.
    Refused,
}

fn read_events<R: Reload>(url: Url, stream: StreamHandle, reload: R) {
    let mut watcher = ReloadWatcher::new(EVENTS_PATH, stream, reload);

    let client = match reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            watcher.handle(StreamEvent::Error(e.to_string()));
            return;
        }
    };

    let mut parser = SseParser::new();
    loop {
        match read_session(&client, &url, &mut parser, &mut watcher) {
            Session::Closed | Session::Refused => break,
            Session::Dropped => {
                let delay = parser
                    .retry_ms()
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_RETRY);
                log::debug!("reconnecting to {url} in {delay:?}");
                if !sleep_unless_closed(&watcher, delay) {
                    break;
                }
            }
        }
    }
}

/// Connects once and feeds lines to `watcher` until the connection ends.
fn read_session<S: EventStream, R: Reload>(
    client: &reqwest::blocking::Client,
    url: &Url,
    parser: &mut SseParser,
    watcher: &mut ReloadWatcher<S, R>,
) -> Session {
    parser.discard_pending();

    let mut request = client.get(url.clone()).header(ACCEPT, "text/event-stream");
    if let Some(id) = parser.last_event_id() {
        request = request.header(LAST_EVENT_ID, id);
    }

    let response = match request.send() {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            watcher.handle(StreamEvent::Error(format!("HTTP status {}", r.status())));
            return Session::Refused;
        }
        Err(e) => {
            watcher.handle(StreamEvent::Error(e.to_string()));
            return Session::Dropped;
        }
    };

    let mut reader = BufReader::new(response);
    let mut line = String::new();

    while !watcher.is_closed() {
        line.clear();
        let reason = match reader.read_line(&mut line) {
            Ok(0) => "stream ended".to_string(),
            Ok(_) => {
                if let Some(event) = parser.feed_line(&line) {
                    if watcher.handle(StreamEvent::Message(event)) == Flow::Stop {
                        return Session::Closed;
                    }
                }
                continue;
            }
            Err(e) => e.to_string(),
        };

        if watcher.is_closed() {
            break;
        }
        watcher.handle(StreamEvent::Error(reason));
        return Session::Dropped;
    }

    Session::Closed
}

/// Waits out `delay` in short steps. Returns `false` if the stream was closed
/// meanwhile.
fn sleep_unless_closed<S: EventStream, R: Reload>(
    watcher: &ReloadWatcher<S, R>,
    delay: Duration,
) -> bool {
    const STEP: Duration = Duration::from_millis(50);

    let mut waited = Duration::ZERO;
    while waited < delay {
        if watcher.is_closed() {
            return false;
        }
        let step = STEP.min(delay - waited);
        thread::sleep(step);
        waited += step;
    }
    !watcher.is_closed()
}
