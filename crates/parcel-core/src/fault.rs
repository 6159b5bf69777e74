// crates/parcel-core/src/fault.rs
//
// The business fault returned in place of a response.
//
// A Fault is a plain value: a message, an optional cause, and optional
// suppressed faults. It has no backtrace field and never captures one, so
// building and propagating it costs the same at any call depth.

use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A declared, boundary-crossing failure value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FaultRecord", into = "FaultRecord")]
pub struct Fault {
    message: Option<String>,
    cause: Option<Box<Fault>>,
    suppressed: Vec<Fault>,
    enable_suppression: bool,
    writable_trace: bool,
}

impl Fault {
    /// A fault with neither message nor cause.
    pub fn new() -> Self {
        Self::with_trace_policy(None, None, true, true)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self::with_trace_policy(Some(message.into()), None, true, true)
    }

    pub fn with_cause(message: impl Into<String>, cause: Fault) -> Self {
        Self::with_trace_policy(Some(message.into()), Some(cause), true, true)
    }

    /// Wrap a cause; the message becomes the cause's rendering.
    pub fn from_cause(cause: Fault) -> Self {
        let message = cause.to_string();
        Self::with_trace_policy(Some(message), Some(cause), true, true)
    }

    /// Restricted form for specialised constructors that need to pin the
    /// suppression and trace flags.
    pub(crate) fn with_trace_policy(
        message: Option<String>,
        cause: Option<Fault>,
        enable_suppression: bool,
        writable_trace: bool,
    ) -> Self {
        Self {
            message,
            cause: cause.map(Box::new),
            suppressed: Vec::new(),
            enable_suppression,
            writable_trace,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    pub fn suppressed(&self) -> &[Fault] {
        &self.suppressed
    }

    /// Record a secondary fault. Ignored when suppression is disabled.
    pub fn add_suppressed(&mut self, fault: Fault) {
        if self.enable_suppression {
            self.suppressed.push(fault);
        }
    }

    pub fn is_suppression_enabled(&self) -> bool {
        self.enable_suppression
    }

    /// Whether the fault would accept a trace. None is ever captured.
    pub fn is_trace_writable(&self) -> bool {
        self.writable_trace
    }

    /// Always `None`: faults do not capture call stacks.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        None
    }

    /// This fault followed by each cause, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Fault> {
        std::iter::successors(Some(self), |f| f.cause.as_deref())
    }
}

impl Default for Fault {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality covers what crosses the wire: message, cause chain, suppressed.
impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.cause == other.cause && self.suppressed == other.suppressed
    }
}

impl Eq for Fault {}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("fault"))
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

// ---------------------------------------------------------------------------
// Wire form
// ---------------------------------------------------------------------------

/// What a fault looks like on the wire. The flags stay local to each side.
#[derive(Serialize, Deserialize)]
struct FaultRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<Box<Fault>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suppressed: Vec<Fault>,
}

impl From<Fault> for FaultRecord {
    fn from(fault: Fault) -> Self {
        Self {
            message: fault.message,
            cause: fault.cause,
            suppressed: fault.suppressed,
        }
    }
}

impl From<FaultRecord> for Fault {
    /// A reconstructed fault is a frozen copy of the remote one: it keeps
    /// accepting suppressed faults locally but never takes a trace.
    fn from(record: FaultRecord) -> Self {
        let mut fault = Fault::with_trace_policy(record.message, record.cause.map(|c| *c), true, false);
        fault.suppressed = record.suppressed;
        fault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_forms() -> Vec<Fault> {
        vec![
            Fault::new(),
            Fault::with_message("exception"),
            Fault::with_cause("outer", Fault::with_message("inner")),
            Fault::from_cause(Fault::with_message("inner")),
            Fault::with_trace_policy(Some("restricted".into()), None, false, false),
        ]
    }

    #[test]
    fn test_no_form_captures_a_backtrace() {
        for fault in all_forms() {
            assert!(fault.backtrace().is_none(), "{:?} carries a trace", fault);
        }
    }

    #[test]
    fn test_construction_is_depth_independent() {
        fn nest(depth: usize) -> Fault {
            if depth == 0 {
                Fault::with_message("bottom")
            } else {
                nest(depth - 1)
            }
        }
        let shallow = nest(0);
        let deep = nest(2_000);
        assert_eq!(shallow, deep);
        assert!(deep.backtrace().is_none());
    }

    #[test]
    fn test_message_forms() {
        assert_eq!(Fault::new().message(), None);
        assert_eq!(Fault::new().to_string(), "fault");
        assert_eq!(Fault::with_message("exception").message(), Some("exception"));

        let wrapped = Fault::from_cause(Fault::with_message("inner"));
        assert_eq!(wrapped.message(), Some("inner"));
        assert_eq!(wrapped.cause().and_then(Fault::message), Some("inner"));
    }

    #[test]
    fn test_source_walks_cause_chain() {
        let fault = Fault::with_cause("outer", Fault::with_cause("middle", Fault::with_message("root")));
        let messages: Vec<&str> = fault.chain().filter_map(Fault::message).collect();
        assert_eq!(messages, vec!["outer", "middle", "root"]);

        let source = fault.source().expect("has a source");
        assert_eq!(source.to_string(), "middle");
    }

    #[test]
    fn test_suppression_respects_flag() {
        let mut open = Fault::with_message("open");
        open.add_suppressed(Fault::with_message("secondary"));
        assert_eq!(open.suppressed().len(), 1);

        let mut closed = Fault::with_trace_policy(Some("closed".into()), None, false, false);
        closed.add_suppressed(Fault::with_message("secondary"));
        assert!(closed.suppressed().is_empty());
        assert!(!closed.is_suppression_enabled());
    }

    #[test]
    fn test_wire_roundtrip_preserves_message_and_chain() {
        let mut fault = Fault::with_cause("outer", Fault::with_message("inner"));
        fault.add_suppressed(Fault::with_message("cleanup failed"));

        let json = serde_json::to_string(&fault).unwrap();
        let back: Fault = serde_json::from_str(&json).unwrap();

        assert_eq!(back, fault);
        assert!(back.backtrace().is_none());
        assert!(!back.is_trace_writable(), "reconstructed faults never take a trace");
    }

    #[test]
    fn test_wire_shape_omits_absent_parts() {
        let value = serde_json::to_value(Fault::with_message("exception")).unwrap();
        assert_eq!(value, serde_json::json!({ "message": "exception" }));

        let empty = serde_json::to_value(Fault::new()).unwrap();
        assert_eq!(empty, serde_json::json!({}));
    }
}
