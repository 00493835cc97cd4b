//! Report generation
//!
//! Renders the outcome of a scenario run as plain text or JSON.

use crate::events::TraceEvent;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Outcome of one scenario run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Flags the list was built with
    pub flags: String,
    /// Every callback invocation, in order
    pub trace: Vec<TraceEvent>,
    pub fired: bool,
    pub locked: bool,
    pub disabled: bool,
    /// Callbacks left in the list at the end
    pub remaining: usize,
}

impl Report {
    /// Plain-text listing of the trace and final state
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let flags = if self.flags.is_empty() { "(none)" } else { self.flags.as_str() };
        let _ = writeln!(out, "Flags: {}", flags);
        let _ = writeln!(out, "Invocations: {}", self.trace.len());

        for event in &self.trace {
            let _ = writeln!(
                out,
                "  [step {}] {}(context={:?}, args={})",
                event.step,
                event.callback,
                event.context,
                Value::from(event.args.clone())
            );
        }

        let _ = writeln!(
            out,
            "Final state: fired={} locked={} disabled={} remaining={}",
            self.fired, self.locked, self.disabled, self.remaining
        );
        out
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
