//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production, stderr on the host).  Cycle reports
//! are serialized as JSON at `debug` level so a capture can be replayed
//! without parsing free text.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(kind) => {
                info!("START | strategy={kind}");
            }
            AppEvent::Cycle(report) => match serde_json::to_string(report) {
                Ok(json) => debug!("CYCLE | {json}"),
                Err(e) => warn!("CYCLE | #{} (encode failed: {e})", report.cycle),
            },
            AppEvent::Halted(fatal) => {
                error!("HALT | {fatal}");
            }
        }
    }
}
