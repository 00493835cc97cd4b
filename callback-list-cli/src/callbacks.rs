//! Scripted callbacks
//!
//! Turns the `[[callbacks]]` section of a scenario into real callbacks that
//! record themselves in the trace and replay their actions against the list
//! they are running in.

use crate::config::{CallbackConfig, Operation};
use crate::events::Trace;
use crate::scenario::{apply, ScenarioList};
use anyhow::{anyhow, Result};
use callback_list::{Callback, WeakCallbackList};
use serde_json::Value;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Callback type used by scenarios: string context, JSON arguments
pub type ScenarioCallback = Callback<String, Vec<Value>>;

/// Named callbacks of one scenario run
pub struct Registry {
    callbacks: HashMap<String, ScenarioCallback>,
}

impl Registry {
    /// Build every configured callback
    ///
    /// Callbacks hold weak handles to both the list and this registry, so the
    /// registry can be dropped normally after the run.
    pub fn build(configs: &[CallbackConfig], list: &ScenarioList, trace: &Trace) -> Rc<Self> {
        Rc::new_cyclic(|registry: &Weak<Registry>| {
            let callbacks = configs
                .iter()
                .map(|config| {
                    let callback = scripted(config, list.downgrade(), registry.clone(), trace.clone());
                    (config.name.clone(), callback)
                })
                .collect();
            Registry { callbacks }
        })
    }

    /// Look up a callback by name
    pub fn get(&self, name: &str) -> Result<&ScenarioCallback> {
        self.callbacks
            .get(name)
            .ok_or_else(|| anyhow!("Unknown callback: {:?}", name))
    }

    /// Look up several callbacks, preserving order
    pub fn get_all(&self, names: &[String]) -> Result<Vec<ScenarioCallback>> {
        names
            .iter()
            .map(|name| self.get(name).cloned())
            .collect()
    }
}

fn scripted(
    config: &CallbackConfig,
    list: WeakCallbackList<String, Vec<Value>>,
    registry: Weak<Registry>,
    trace: Trace,
) -> ScenarioCallback {
    let name = config.name.clone();
    let returns = config.returns;
    let actions: Vec<Operation> = config.actions.clone();
    let repeat = config.repeat_actions;
    let calls = Cell::new(0usize);

    Callback::new(move |context: &String, args: &Vec<Value>| {
        trace.record(&name, context, args);

        let call = calls.get();
        calls.set(call + 1);
        if call > 0 && !repeat {
            return returns;
        }

        if let (Some(list), Some(registry)) = (list.upgrade(), registry.upgrade()) {
            for action in &actions {
                if let Err(e) = apply(&list, &registry, action) {
                    log::error!("Action {:?} in callback {:?} failed: {}", action, name, e);
                }
            }
        }
        returns
    })
}
