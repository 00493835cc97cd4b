//! Invocation trace
//!
//! Every scripted callback appends one event per call, tagged with the
//! top-level step that was being applied at the time.

use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One callback invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    /// Index of the scenario step that caused this call
    pub step: usize,
    /// Name of the callback that ran
    pub callback: String,
    /// Fire context
    pub context: String,
    /// Fire arguments
    pub args: Vec<Value>,
}

/// Shared recorder handed to every scripted callback
#[derive(Debug, Clone, Default)]
pub struct Trace {
    events: Rc<RefCell<Vec<TraceEvent>>>,
    step: Rc<Cell<usize>>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a new top-level step
    pub fn begin_step(&self, step: usize) {
        self.step.set(step);
    }

    pub fn record(&self, callback: &str, context: &str, args: &[Value]) {
        log::trace!("step {}: {}({:?}, {:?})", self.step.get(), callback, context, args);
        self.events.borrow_mut().push(TraceEvent {
            step: self.step.get(),
            callback: callback.to_string(),
            context: context.to_string(),
            args: args.to_vec(),
        });
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }
}
