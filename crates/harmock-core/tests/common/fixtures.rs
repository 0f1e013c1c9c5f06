//! Shared archives and a diagnostics recorder for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use harmock_core::diagnostics::Diagnostics;
use harmock_core::ProviderOptions;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Records every diagnostic it receives.
#[derive(Default)]
pub struct Recorder {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Recorder {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(level, _)| *level == Level::WARN)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Diagnostics for Recorder {
    fn log(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

/// Captures every `tracing` event as `LEVEL target`.
#[derive(Clone, Default)]
struct Events(Arc<Mutex<Vec<String>>>);

impl<S: Subscriber> Layer<S> for Events {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        self.0
            .lock()
            .unwrap()
            .push(format!("{} {}", metadata.level(), metadata.target()));
    }
}

/// Runs `f` under a subscriber that records every event it emits.
pub fn tracing_events_while(f: impl FnOnce()) -> Vec<String> {
    let events = Events::default();
    let subscriber = tracing_subscriber::registry().with(events.clone());
    tracing::subscriber::with_default(subscriber, f);
    let seen = events.0.lock().unwrap().clone();
    seen
}

pub fn recorded_options() -> (ProviderOptions, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let options = ProviderOptions::default().with_diagnostics(recorder.clone());
    (options, recorder)
}

/// A small browser-style session: JSON listing, login with cookies, binary
/// asset, a PATCH, and CORS-enabled API call.
pub const SESSION_HAR: &str = r#"{
  "log": {
    "version": "1.2",
    "creator": { "name": "browser", "version": "1" },
    "entries": [
      {
        "request": { "method": "GET", "url": "https://api.example.com/users?page=1", "headers": [] },
        "response": {
          "status": 200,
          "headers": [
            { "name": "Content-Type", "value": "application/json" },
            { "name": "Content-Length", "value": "999" }
          ],
          "content": { "text": "[{\"id\":1}]", "mimeType": "application/json" }
        },
        "time": 0
      },
      {
        "request": { "method": "POST", "url": "https://api.example.com/login", "headers": [] },
        "response": {
          "status": 204,
          "headers": [
            { "name": "Set-Cookie", "value": "session=abc%20123; Path=/; HttpOnly; Secure; Expires=Wed, 09 Jun 2021 10:18:14 GMT" },
            { "name": "set-cookie", "value": "theme=dark; Path=/settings" },
            { "name": "X-Request-Id", "value": "r-1" }
          ],
          "content": { "text": "" }
        }
      },
      {
        "request": { "method": "GET", "url": "https://cdn.example.com/logo.bin", "headers": [] },
        "response": {
          "status": 200,
          "headers": [ { "name": "Content-Type", "value": "application/octet-stream" } ],
          "content": { "text": "AAEC/w==", "encoding": "base64" }
        },
        "time": 5
      },
      {
        "request": { "method": "patch", "url": "https://api.example.com/users/1", "headers": [] },
        "response": { "status": 200, "headers": [], "content": { "text": "{}" } }
      },
      {
        "request": { "method": "GET", "url": "https://api.example.com/cors", "headers": [] },
        "response": {
          "status": 200,
          "headers": [ { "name": "Access-Control-Allow-Origin", "value": "https://app.example.com" } ],
          "content": { "text": "ok" }
        }
      }
    ]
  }
}"#;
