//! Line-driven reconstruction of request/response messages.
//!
//! A message is a first line, any number of header lines and a terminating
//! blank line. Only the pieces the aggregation needs are kept: the path of a
//! request, the result code of a response and the `X-Trace-ID` header.
//!
//! The parser is a plain state machine owned by a single consumer. State
//! carries over between calls, so a message may be fed across several line
//! windows.

use crate::message::TraceId;

pub const RESPONSE_PREFIX: &str = "HTTP/";
pub const TRACE_ID_HEADER: &str = "X-Trace-ID: ";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ParserState {
    #[default]
    AwaitingFirstLine,
    CollectingHeaders,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum MessageKind {
    #[default]
    Request,
    Response,
}

#[derive(Debug, Default)]
pub struct MessageParser {
    state: ParserState,
    // set by a blank line, cleared by the next first line
    done: bool,
    kind: MessageKind,
    trace_id: TraceId,
    request_path: String,
    result_code: String,
}

impl MessageParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line (without its line terminator).
    ///
    /// Returns `true` when this line completed a message; the message fields
    /// are then available through the accessors until the next first line.
    /// Extra blank lines after a completed message return `false`.
    pub fn process_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            let completed = !self.done && self.state == ParserState::CollectingHeaders;
            self.done = true;
            return completed;
        }

        if self.done || self.state == ParserState::AwaitingFirstLine {
            self.reset();
            self.process_first_line(line);
            self.state = ParserState::CollectingHeaders;
        } else {
            self.process_header_line(line);
        }
        false
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Whether a blank line has been seen since the last first line.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_response(&self) -> bool {
        self.kind == MessageKind::Response
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn result_code(&self) -> &str {
        &self.result_code
    }

    /// The path of a request or the result code of a response.
    pub fn payload(&self) -> &str {
        match self.kind {
            MessageKind::Request => &self.request_path,
            MessageKind::Response => &self.result_code,
        }
    }

    fn reset(&mut self) {
        self.done = false;
        self.kind = MessageKind::Request;
        self.trace_id = TraceId::default();
        self.request_path.clear();
        self.result_code.clear();
    }

    fn process_first_line(&mut self, line: &str) {
        self.kind = if line.starts_with(RESPONSE_PREFIX) {
            MessageKind::Response
        } else {
            MessageKind::Request
        };

        // `GET /path HTTP/1.1` or `HTTP/1.1 200 OK`: the second token is what we keep
        let Some(token) = line.split_whitespace().nth(1) else {
            return;
        };

        match self.kind {
            MessageKind::Request => self.request_path = token.to_string(),
            MessageKind::Response => self.result_code = token.to_string(),
        }
    }

    fn process_header_line(&mut self, line: &str) {
        // last occurrence wins
        if let Some(value) = line.strip_prefix(TRACE_ID_HEADER) {
            self.trace_id = TraceId::from(value);
        }
    }
}
