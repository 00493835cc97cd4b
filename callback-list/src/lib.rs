//! Callback List
//!
//! A configurable list of callbacks that can be fired together with a shared
//! context and arguments. It is the building block for event notification and
//! deferred/promise-like primitives.
//!
//! # Flags
//!
//! Behavior is chosen once, at construction:
//! - `once`: the list fires at most one time
//! - `memory`: the last fire is remembered; callbacks added afterwards are
//!   invoked immediately with the remembered context and arguments
//! - `unique`: a callback can only be added once
//! - `stopOnFalse`: a callback returning `false` ends the current pass
//!
//! # Reentrancy
//!
//! Callbacks may add or remove callbacks, fire, lock or disable the list
//! they are running in. Callbacks added during a pass run in that same
//! pass; removals never make a pass skip or repeat a neighbor; a fire
//! requested during a pass is queued and runs as a separate pass afterwards
//! (or is dropped on a `once` list).
//!
//! The list is single-threaded: handles are `Rc`-based and are neither
//! `Send` nor `Sync`.
//!
//! # Example Usage
//!
//! ```
//! use callback_list::{Callback, CallbackList, FlagCache};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut cache = FlagCache::new();
//! let list: CallbackList<(), i32> = cache.build("once memory");
//!
//! let sink = Rc::clone(&seen);
//! list.add(Callback::new(move |_: &(), n: &i32| sink.borrow_mut().push(*n)));
//! list.fire(1);
//!
//! // Late callbacks see the remembered arguments right away
//! let sink = Rc::clone(&seen);
//! list.add(Callback::new(move |_: &(), n: &i32| sink.borrow_mut().push(n * 10)));
//!
//! // `once`: further fires are ignored
//! list.fire(2);
//!
//! assert_eq!(*seen.borrow(), vec![1, 10]);
//! assert!(list.fired());
//! ```

// Public modules
pub mod flags;
pub mod list;
pub mod types;

// Re-export main types for convenience
pub use flags::{Flag, FlagCache, FlagSet, Flags};
pub use list::{CallbackList, WeakCallbackList, MAX_NESTING_DEPTH};
pub use types::{Callback, CallbackResult, FlagError, Item, Result};

// Internal modules (not exposed in public API)
mod cursor;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
