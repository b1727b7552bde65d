use std::borrow::Borrow;
use std::fmt;

/// Caller-supplied correlation key linking a request to its response.
///
/// Messages without an `X-Trace-ID` header carry the empty id, so all such
/// messages within one event window share a single slot.
#[derive(Debug, Clone, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for TraceId {
    fn from(s: String) -> Self {
        TraceId(s)
    }
}

impl From<&str> for TraceId {
    fn from(s: &str) -> Self {
        TraceId(s.to_owned())
    }
}

impl Borrow<str> for TraceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
