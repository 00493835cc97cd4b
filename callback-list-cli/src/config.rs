//! Scenario loading and parsing
//!
//! A scenario is a TOML file describing the list flags, a set of named
//! scripted callbacks, and the operations to apply to the list in order.

use anyhow::{bail, Context, Result};
use callback_list::Flags;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Main scenario configuration (loaded from a .toml file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub flags: FlagsConfig,
    #[serde(default)]
    pub callbacks: Vec<CallbackConfig>,
    #[serde(default)]
    pub steps: Vec<Operation>,
}

/// List flags, as a string (`"once memory"`) or a table of booleans
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlagsConfig {
    Names(String),
    Table(Flags),
}

impl Default for FlagsConfig {
    fn default() -> Self {
        FlagsConfig::Names(String::new())
    }
}

impl FlagsConfig {
    /// Resolve to structured flags, rejecting unknown names
    pub fn flags(&self) -> Result<Flags> {
        match self {
            FlagsConfig::Names(names) => names
                .parse()
                .with_context(|| format!("Invalid flags: {:?}", names)),
            FlagsConfig::Table(flags) => Ok(*flags),
        }
    }
}

/// A named callback and what it does when called
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackConfig {
    pub name: String,
    /// Value returned to the list; `false` stops a `stopOnFalse` pass
    pub returns: Option<bool>,
    /// Operations applied to the list from inside the callback
    #[serde(default)]
    pub actions: Vec<Operation>,
    /// Run `actions` on every call instead of only the first
    #[serde(default)]
    pub repeat_actions: bool,
}

/// One operation on the list, used both for steps and callback actions
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Add {
        callbacks: Vec<String>,
    },
    Remove {
        callbacks: Vec<String>,
    },
    Fire {
        #[serde(default)]
        args: Vec<Value>,
    },
    FireWith {
        context: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Lock,
    Disable,
    Empty,
}

impl Operation {
    /// Callback names this operation refers to
    pub fn callback_names(&self) -> &[String] {
        match self {
            Operation::Add { callbacks } | Operation::Remove { callbacks } => callbacks,
            _ => &[],
        }
    }
}

impl ScenarioConfig {
    /// Check flags and that every referenced callback is defined exactly once
    pub fn validate(&self) -> Result<()> {
        self.flags.flags()?;

        let mut names = HashSet::new();
        for callback in &self.callbacks {
            if !names.insert(callback.name.as_str()) {
                bail!("Callback {:?} is defined more than once", callback.name);
            }
        }

        let actions = self
            .callbacks
            .iter()
            .flat_map(|callback| callback.actions.iter());
        for operation in self.steps.iter().chain(actions) {
            for name in operation.callback_names() {
                if !names.contains(name.as_str()) {
                    bail!("Unknown callback {:?} referenced by {:?}", name, operation);
                }
            }
        }

        Ok(())
    }
}

/// Load a scenario from a TOML file
pub fn load_config(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

    let config: ScenarioConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid scenario file: {:?}", path))?;

    Ok(config)
}
