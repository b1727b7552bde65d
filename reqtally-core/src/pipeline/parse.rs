use crate::message::{MessageKind, MessageParser};
use crate::pipeline::Context;
use crate::pipeline::events::Event;
use crate::pipeline::lines::LineWindow;
use crate::runtime::StopToken;
use std::sync::Arc;
use tracing::{debug, trace};

/// Turns ready line windows into request and response events.
///
/// Owns the only [`MessageParser`], so a message split across two windows is
/// stitched back together.
#[derive(Debug)]
pub struct LineProcessor {
    ctx: Arc<Context>,
    parser: MessageParser,
}

impl LineProcessor {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self {
            ctx,
            parser: MessageParser::new(),
        }
    }

    /// Parse every ready line window, oldest first. Returns how many were consumed.
    pub fn process_ready_windows(&mut self) -> usize {
        let mut processed = 0;
        while let Some((key, window)) = self.ctx.ready_lines.oldest() {
            self.process_window(key, &window);
            self.ctx.ready_lines.remove(&window);
            self.ctx.counters.line_windows_parsed.bump();
            self.ctx.responses.notify_data_available();
            processed += 1;
        }
        processed
    }

    fn process_window(&mut self, key: i64, window: &LineWindow) {
        debug!(window = key, lines = window.len(), "parsing line window");

        for line in window.lines().iter() {
            if !self.parser.process_line(&line.text) {
                continue;
            }

            // events carry the arrival window, not the parse time
            let event = Event {
                kind: self.parser.kind(),
                trace_id: self.parser.trace_id().clone(),
                payload: self.parser.payload().to_string(),
                timestamp: key,
            };
            trace!(
                kind = ?event.kind,
                trace_id = %event.trace_id,
                payload = %event.payload,
                received_at = line.received_at,
                "message complete"
            );

            match event.kind {
                MessageKind::Request => {
                    self.ctx.requests.push(event);
                    self.ctx.counters.requests_parsed.bump();
                }
                MessageKind::Response => {
                    self.ctx.responses.push(event);
                    self.ctx.counters.responses_parsed.bump();
                }
            }
        }
    }

    /// Drain ready windows until stop is requested and nothing is left.
    pub fn run(mut self, stop: &StopToken) {
        let wait = self.ctx.config.wait_timeout();
        loop {
            self.process_ready_windows();
            if stop.stop_requested() && self.ctx.ready_lines.is_empty() {
                break;
            }
            self.ctx.ready_lines.wait_for_data(wait);
        }
        debug!("parser drained");
    }
}
