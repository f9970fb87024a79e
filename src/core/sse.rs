//! Server-Sent Events support
//!
//! [`SseParser`] turns a byte stream into dispatched [`SseEvent`]s. The
//! connection itself is opened by `SecureApiClient::event_source`, which
//! drives the parser and the [`SseHandlers`] callbacks on a background task.

use crate::core::types::ApiError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// One dispatched event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field, `None` means the default `message` type
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
    /// Reconnection time requested by the server, in milliseconds
    pub retry: Option<u64>,
}

impl SseEvent {
    /// Event type with the `message` default applied
    pub fn event_type(&self) -> &str {
        self.event.as_deref().unwrap_or("message")
    }

    /// Decode the data payload as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.data)
    }
}

/// Incremental `text/event-stream` parser
///
/// Bytes may arrive split anywhere, including inside a line. Incomplete lines
/// are buffered until their terminator shows up.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    current: SseEvent,
    has_data: bool,
    last_id: Option<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        let Some(pos) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return events;
        };

        // only whole lines are decoded, so a code point split across chunks
        // stays intact in the buffer
        let rest = self.buffer.split_off(pos + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        for line in complete[..pos].split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if let Some(event) = self.process_line(&String::from_utf8_lossy(line)) {
                events.push(event);
            }
        }
        events
    }

    /// Dispatch whatever is pending once the stream has ended
    pub fn finish(&mut self) -> Option<SseEvent> {
        let line = std::mem::take(&mut self.buffer);
        let mut event = None;
        if !line.is_empty() {
            let line = line.strip_suffix(b"\r").unwrap_or(&line[..]);
            event = self.process_line(&String::from_utf8_lossy(line));
        }
        event.or_else(|| self.dispatch())
    }

    /// Last `id:` seen on the stream
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.find(':') {
            Some(pos) => {
                let value = &line[pos + 1..];
                (&line[..pos], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "data" => {
                if self.has_data {
                    self.current.data.push('\n');
                }
                self.current.data.push_str(value);
                self.has_data = true;
            }
            "event" => self.current.event = Some(value.to_string()),
            "id" => {
                // ids containing NUL are ignored
                if !value.contains('\0') {
                    self.current.id = Some(value.to_string());
                    self.last_id = Some(value.to_string());
                }
            }
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.current.retry = Some(ms);
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = std::mem::take(&mut self.current);
        if !std::mem::take(&mut self.has_data) {
            return None;
        }
        Some(event)
    }
}

/// Connection state of an event source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closed = 2,
}

impl ReadyState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            _ => ReadyState::Closed,
        }
    }
}

type OpenHandler = Box<dyn Fn() + Send + Sync>;
type MessageHandler = Box<dyn Fn(SseEvent) + Send + Sync>;
type ErrorHandler = Box<dyn Fn(&ApiError) + Send + Sync>;

/// Callbacks invoked by an event source
#[derive(Default)]
pub struct SseHandlers {
    pub(crate) on_open: Option<OpenHandler>,
    pub(crate) on_message: Option<MessageHandler>,
    pub(crate) on_error: Option<ErrorHandler>,
}

impl std::fmt::Debug for SseHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseHandlers")
            .field("on_open", &self.on_open.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl SseHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_message(mut self, f: impl Fn(SseEvent) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ApiError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn open(&self) {
        if let Some(f) = &self.on_open {
            f();
        }
    }

    pub(crate) fn message(&self, event: SseEvent) {
        if let Some(f) = &self.on_message {
            f(event);
        }
    }

    pub(crate) fn error(&self, error: &ApiError) {
        if let Some(f) = &self.on_error {
            f(error);
        }
    }
}

/// Options for opening an event source
#[derive(Debug, Clone, Default)]
pub struct SseOptions {
    /// Close the source if it is still connecting after this long
    pub connect_timeout: Option<Duration>,
    pub skip_auth: bool,
}

impl SseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

/// Shared connection state between the handle and its reader task
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ReadyState::Connecting as u8)))
    }

    pub(crate) fn get(&self) -> ReadyState {
        ReadyState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ReadyState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move Connecting to Open; fails if the source was closed meanwhile
    pub(crate) fn open(&self) -> bool {
        self.0
            .compare_exchange(
                ReadyState::Connecting as u8,
                ReadyState::Open as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Handle to a running event source. Dropping it closes the connection.
#[derive(Debug)]
pub struct EventSourceHandle {
    state: SharedState,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EventSourceHandle {
    pub(crate) fn new(state: SharedState, task: Option<JoinHandle<()>>) -> Self {
        Self {
            state,
            task: Mutex::new(task),
        }
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.get()
    }

    /// Close the connection. Idempotent.
    pub fn close(&self) {
        self.state.set(ReadyState::Closed);
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }

    /// Wait for the reader task to end on its own (stream ended or failed)
    pub async fn closed(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

impl Drop for EventSourceHandle {
    fn drop(&mut self) {
        self.close();
    }
}
