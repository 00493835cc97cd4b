//! Behavior flags and the flag-string resolver
//!
//! A callback list is configured once, at construction, with any combination
//! of four flags. They can be given either in structured form ([`Flags`]) or
//! as a whitespace-separated string such as `"once memory"`, which is turned
//! into a [`FlagSet`] by [`FlagSet::parse`] or, memoized, by a [`FlagCache`].

use crate::types::{FlagError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// A single recognized option name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    /// The list can be fired at most once
    Once,
    /// The last fire is remembered and replayed to callbacks added later
    Memory,
    /// A callback can only be in the list once
    Unique,
    /// A callback returning `false` ends the current pass
    StopOnFalse,
}

impl Flag {
    /// All recognized flags, in their canonical order
    pub const ALL: [Flag; 4] = [Flag::Once, Flag::Memory, Flag::Unique, Flag::StopOnFalse];

    /// The name used for this flag in configuration strings
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Once => "once",
            Flag::Memory => "memory",
            Flag::Unique => "unique",
            Flag::StopOnFalse => "stopOnFalse",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flag {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self> {
        Flag::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| FlagError::UnknownFlag(s.to_string()))
    }
}

/// Structured list configuration
///
/// Every field defaults to `false`, which gives an indefinitely repeatable
/// list with no memory, duplicates allowed and no early stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    /// Fire at most once
    pub once: bool,
    /// Remember the last fire and replay it to late additions
    pub memory: bool,
    /// Reject duplicate callbacks
    pub unique: bool,
    /// Stop a pass when a callback returns `false`
    #[serde(rename = "stopOnFalse")]
    pub stop_on_false: bool,
}

impl Flags {
    /// Create a configuration with every flag off
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set `once`
    pub fn with_once(mut self, enabled: bool) -> Self {
        self.once = enabled;
        self
    }

    /// Builder method: set `memory`
    pub fn with_memory(mut self, enabled: bool) -> Self {
        self.memory = enabled;
        self
    }

    /// Builder method: set `unique`
    pub fn with_unique(mut self, enabled: bool) -> Self {
        self.unique = enabled;
        self
    }

    /// Builder method: set `stopOnFalse`
    pub fn with_stop_on_false(mut self, enabled: bool) -> Self {
        self.stop_on_false = enabled;
        self
    }

    /// Check whether a flag is set
    pub fn contains(&self, flag: Flag) -> bool {
        match flag {
            Flag::Once => self.once,
            Flag::Memory => self.memory,
            Flag::Unique => self.unique,
            Flag::StopOnFalse => self.stop_on_false,
        }
    }

    /// Set or clear a flag
    pub fn set(&mut self, flag: Flag, enabled: bool) {
        match flag {
            Flag::Once => self.once = enabled,
            Flag::Memory => self.memory = enabled,
            Flag::Unique => self.unique = enabled,
            Flag::StopOnFalse => self.stop_on_false = enabled,
        }
    }
}

/// Strict parsing: unlike [`FlagSet::parse`], unknown tokens are an error.
impl FromStr for Flags {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = Flags::new();
        for token in s.split_whitespace() {
            flags.set(token.parse()?, true);
        }
        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Flag::ALL
            .into_iter()
            .filter(|flag| self.contains(*flag))
            .map(Flag::as_str)
            .collect();
        f.write_str(&names.join(" "))
    }
}

/// The set of option names present in a configuration string
///
/// Unrecognized tokens are kept but have no effect on behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    tokens: BTreeSet<String>,
}

impl FlagSet {
    /// Resolve a configuration string without caching
    pub fn parse(config: &str) -> Self {
        Self {
            tokens: config.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Check whether a recognized flag is present
    pub fn contains(&self, flag: Flag) -> bool {
        self.tokens.contains(flag.as_str())
    }

    /// Check whether an arbitrary token is present
    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Tokens that are not recognized flags
    pub fn unrecognized(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|token| token.parse::<Flag>().is_err())
    }

    /// True if no token was given at all
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The structured form of the recognized flags
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::new();
        for flag in Flag::ALL {
            flags.set(flag, self.contains(flag));
        }
        flags
    }
}

impl From<&FlagSet> for Flags {
    fn from(set: &FlagSet) -> Self {
        set.flags()
    }
}

/// Memoizes resolved configuration strings
///
/// Owned by whatever builds callback lists; resolving the same string twice
/// hands back the same shared [`FlagSet`].
#[derive(Debug, Default)]
pub struct FlagCache {
    entries: HashMap<String, Rc<FlagSet>>,
}

impl FlagCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a configuration string, reusing an earlier result if any
    pub fn resolve(&mut self, config: &str) -> Rc<FlagSet> {
        if let Some(set) = self.entries.get(config) {
            return Rc::clone(set);
        }

        let set = Rc::new(FlagSet::parse(config));
        for token in set.unrecognized() {
            log::debug!("Ignoring unrecognized flag {:?} in {:?}", token, config);
        }
        self.entries.insert(config.to_string(), Rc::clone(&set));
        set
    }

    /// Number of distinct strings resolved so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every memoized entry
    ///
    /// Lists built earlier keep their own reference to their flag set.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
