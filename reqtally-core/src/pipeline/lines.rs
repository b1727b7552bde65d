//! Input segmentation into per-second line windows.
//!
//! Lines are stamped with their arrival time and grouped into windows of
//! `line_window_seconds`. A window is only closed where a message boundary
//! is known: the previous line was blank and the new one is not. A message
//! whose blank terminator straddles a second boundary therefore stays in one
//! window, at the cost of waiting for the next message to start.

use crate::pipeline::Context;
use crate::runtime::{StopToken, display_time, quantize};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// One input line and the second it was received.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Line {
    pub text: String,
    pub received_at: i64,
}

/// Ordered lines sharing one window key.
///
/// Only the reader appends, and only while the window is filling.
#[derive(Debug)]
pub struct LineWindow {
    key: i64,
    lines: RwLock<Vec<Line>>,
}

impl LineWindow {
    pub fn new(key: i64) -> Self {
        Self {
            key,
            lines: RwLock::new(Vec::new()),
        }
    }

    pub fn key(&self) -> i64 {
        self.key
    }

    pub fn push(&self, line: Line) {
        self.lines.write().push(line);
    }

    pub fn lines(&self) -> RwLockReadGuard<'_, Vec<Line>> {
        self.lines.read()
    }

    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }
}

/// Move every filling line window into the ready store and wake the parser.
///
/// A window is registered as ready before it leaves the filling store, so an
/// observer always sees it in at least one of the two.
pub fn flush_line_windows(ctx: &Context) {
    while let Some((key, window)) = ctx.filling_lines.oldest() {
        submit_ready(ctx, key, &window);
        ctx.filling_lines.remove(&window);
    }
    ctx.ready_lines.notify_data_available();
}

/// Register `window` as ready under `key`.
///
/// If a ready window with the same key still exists (the clock stepped back),
/// block until the parser has consumed it; the parser may be reading that
/// window right now, so it is never appended to.
fn submit_ready(ctx: &Context, key: i64, window: &Arc<LineWindow>) {
    let mut warned = false;
    loop {
        let ready = ctx.ready_lines.add(key, Arc::clone(window));
        if Arc::ptr_eq(&ready, window) {
            return;
        }
        if !warned {
            warn!(window = key, "ready line window already present, waiting for it to be parsed");
            warned = true;
        }
        ctx.ready_lines.notify_data_available();
        thread::sleep(ctx.config.wait_timeout());
    }
}

#[derive(Debug, Default)]
struct WindowingState {
    current: Option<Arc<LineWindow>>,
    prev_blank: bool,
    // set once the final flush happened; later lines are dropped
    closed: bool,
}

/// Single producer feeding the line window stores.
///
/// Clones share the windowing state, so the control flow can close the
/// reader from another thread. Closing and windowing a line take the same
/// lock, so no window is created or appended to after the final flush.
#[derive(Debug, Clone)]
pub struct LineReader {
    ctx: Arc<Context>,
    state: Arc<Mutex<WindowingState>>,
}

impl LineReader {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self {
            ctx,
            state: Arc::default(),
        }
    }

    /// Window one line of input, stamped with the current wall time.
    ///
    /// Returns `false` if the reader was already closed and the line dropped.
    pub fn push_line(&self, text: String) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            debug!("reader closed, dropping line");
            return false;
        }

        let now = self.ctx.now();
        let key = quantize(now, self.ctx.config.line_window());

        let window = match state.current.clone() {
            Some(window) if window.key() == key || !state.prev_blank || text.is_empty() => window,
            _ => self.start_window(&mut state, key),
        };

        state.prev_blank = text.is_empty();
        window.push(Line {
            text,
            received_at: now,
        });
        self.ctx.counters.lines_read.bump();
        true
    }

    fn start_window(&self, state: &mut WindowingState, key: i64) -> Arc<LineWindow> {
        if let Some(previous) = &state.current {
            debug!(
                window = previous.key(),
                at = %display_time(previous.key()),
                lines = previous.len(),
                "end collecting lines"
            );
        }

        // submit what was collected so far
        flush_line_windows(&self.ctx);

        let window = self
            .ctx
            .filling_lines
            .add(key, Arc::new(LineWindow::new(key)));
        debug!(window = key, at = %display_time(key), "start collecting lines");

        state.current = Some(Arc::clone(&window));
        window
    }

    /// Submit the filling windows and refuse any further lines.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.current = None;
        flush_line_windows(&self.ctx);
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Read `input` until it ends, fails, or `stop` is requested, then close.
    pub fn run<R: BufRead>(&self, mut input: R, stop: &StopToken) {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    debug!("input closed");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read input, stopping reader");
                    break;
                }
            }

            if stop.stop_requested() || !self.push_line(decode_line(&buf)) {
                break;
            }
        }

        self.close();
    }
}

/// Strip the line terminator (`\n` or `\r\n`) and decode lossily.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
