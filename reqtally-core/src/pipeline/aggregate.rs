use crate::pipeline::Context;
use crate::pipeline::events::{Event, EventWindow};
use crate::pipeline::stats::UNDEFINED_REQUEST;
use crate::runtime::{StopToken, quantize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Correlates responses with their requests and counts them per output interval.
#[derive(Debug)]
pub struct Aggregator {
    ctx: Arc<Context>,
}

impl Aggregator {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    /// Consume every response window, oldest first. Returns how many
    /// responses were counted.
    pub fn process_response_windows(&self) -> usize {
        let mut counted = 0;
        while let Some((key, window)) = self.ctx.responses.oldest() {
            counted += self.drain_window(key, &window);
            self.ctx.responses.remove(&window);
        }
        if counted > 0 {
            self.ctx.stats.notify_data_available();
        }
        counted
    }

    fn drain_window(&self, key: i64, window: &EventWindow) -> usize {
        let mut counted = 0;
        // the window only leaves the store once it is sealed empty, so the
        // output gate keeps waiting while increments are outstanding
        loop {
            let events = window.drain();
            if events.is_empty() && window.seal_if_empty() {
                break;
            }
            for event in events {
                self.count(&event);
                counted += 1;
            }
        }
        debug!(window = key, responses = counted, "response window aggregated");
        counted
    }

    fn count(&self, response: &Event) {
        let interval = quantize(response.timestamp, self.ctx.config.output_interval());
        // looked up every time: the gate may have retired the previous one
        let stats = self.ctx.stats.get_or_create(interval);

        // requests stay in place until cleanup evicts their window
        let request = self.ctx.requests.find_by_trace_id(response.trace_id.as_str());
        let path = match &request {
            Some(request) => {
                self.ctx.counters.responses_matched.bump();
                request.payload.as_str()
            }
            None => {
                self.ctx.counters.responses_undefined.bump();
                UNDEFINED_REQUEST
            }
        };

        trace!(interval, trace_id = %response.trace_id, path, code = %response.payload, "count response");
        stats.increment(path, &response.payload);
    }

    pub fn run(self, stop: &StopToken) {
        let wait = self.ctx.config.wait_timeout();
        loop {
            self.process_response_windows();
            if stop.stop_requested() && self.ctx.responses.is_empty() {
                break;
            }
            self.ctx.responses.wait_for_data(wait);
        }
        debug!("aggregator drained");
    }
}
