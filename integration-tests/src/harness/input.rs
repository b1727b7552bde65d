use reqtally_core::runtime::ManualClock;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// Serve at most one line per `read` call, bytes still pending first.
fn serve(pending: &mut Vec<u8>, buf: &mut [u8]) -> usize {
    let n = pending.len().min(buf.len());
    buf[..n].copy_from_slice(&pending[..n]);
    pending.drain(..n);
    n
}

/// Input that sets the clock to each line's timestamp as the line is read.
///
/// Wrap it in a `BufReader`: one line is handed out per read, so the reader
/// sees the clock value belonging to the line it just received.
#[derive(Debug)]
pub struct ScriptedInput {
    clock: Arc<ManualClock>,
    lines: VecDeque<(i64, String)>,
    pending: Vec<u8>,
}

impl ScriptedInput {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            lines: VecDeque::new(),
            pending: Vec::new(),
        }
    }

    /// Queue one message (lines plus a blank terminator) arriving at `at`.
    pub fn message(mut self, at: i64, lines: &[&str]) -> Self {
        for line in lines.iter().copied().chain([""]) {
            self.lines.push_back((at, format!("{line}\n")));
        }
        self
    }
}

impl Read for ScriptedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.lines.pop_front() {
                Some((at, line)) => {
                    self.clock.set(at);
                    self.pending = line.into_bytes();
                }
                None => return Ok(0),
            }
        }
        Ok(serve(&mut self.pending, buf))
    }
}

/// Input that blocks until a test sends more bytes, like an idle stdin.
#[derive(Debug)]
pub struct ChannelInput {
    rx: Receiver<String>,
    pending: Vec<u8>,
}

impl ChannelInput {
    pub fn new(rx: Receiver<String>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
        }
    }
}

impl Read for ChannelInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.rx.recv() {
                Ok(chunk) => self.pending = chunk.into_bytes(),
                // sender gone: end of input
                Err(_) => return Ok(0),
            }
        }
        Ok(serve(&mut self.pending, buf))
    }
}
