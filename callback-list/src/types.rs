//! Core types for the callback list
//!
//! This module defines the callback handle stored in a list, the convention
//! for what a callback may return, the nested item shape accepted by `add`,
//! and the internal state enums the dispatcher is built from.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Result type for fallible library operations (flag parsing)
pub type Result<T> = std::result::Result<T, FlagError>;

/// Errors that can occur while parsing flags strictly
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    #[error("Unknown flag: {0:?} (expected one of once, memory, unique, stopOnFalse)")]
    UnknownFlag(String),
}

/// Values a callback may return
///
/// Only a literal `false` counts as a request to stop; callbacks that return
/// `()` never stop a pass.
pub trait CallbackResult {
    /// True if this value is the "false" that `stopOnFalse` reacts to
    fn is_false(&self) -> bool;
}

impl CallbackResult for () {
    fn is_false(&self) -> bool {
        false
    }
}

impl CallbackResult for bool {
    fn is_false(&self) -> bool {
        !*self
    }
}

impl<T: CallbackResult> CallbackResult for Option<T> {
    fn is_false(&self) -> bool {
        self.as_ref().is_some_and(CallbackResult::is_false)
    }
}

type CallbackFn<C, A> = dyn Fn(&C, &A) -> bool;

/// A shared handle to a callable
///
/// Cloning a `Callback` produces another handle to the *same* callable;
/// lists compare callbacks by that identity, never by behavior. Keep a clone
/// around to `remove` or query it later.
pub struct Callback<C, A> {
    func: Rc<CallbackFn<C, A>>,
}

impl<C, A> Callback<C, A> {
    /// Wrap a closure or function
    ///
    /// The closure receives the fire context and arguments; its return value
    /// is inspected through [`CallbackResult`].
    pub fn new<F, R>(func: F) -> Self
    where
        F: Fn(&C, &A) -> R + 'static,
        R: CallbackResult,
    {
        Self {
            func: Rc::new(move |context: &C, args: &A| func(context, args).is_false()),
        }
    }

    /// Invoke the callable; returns true if it returned `false`
    pub(crate) fn call(&self, context: &C, args: &A) -> bool {
        (self.func)(context, args)
    }

    /// True if both handles refer to the same callable
    pub fn same(&self, other: &Self) -> bool {
        // Compare data pointers only; vtable pointers are not unique.
        std::ptr::eq(
            Rc::as_ptr(&self.func) as *const (),
            Rc::as_ptr(&other.func) as *const (),
        )
    }
}

impl<C, A> Clone for Callback<C, A> {
    fn clone(&self) -> Self {
        Self {
            func: Rc::clone(&self.func),
        }
    }
}

impl<C, A> PartialEq for Callback<C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<C, A> Eq for Callback<C, A> {}

impl<C, A> fmt::Debug for Callback<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&(Rc::as_ptr(&self.func) as *const ()))
            .finish()
    }
}

/// Input accepted by `add`: a single callback or a nested sequence of them
#[derive(Debug)]
pub enum Item<C, A> {
    /// A single callback
    One(Callback<C, A>),
    /// A sequence, flattened in order
    Many(Vec<Item<C, A>>),
}

impl<C, A> Clone for Item<C, A> {
    fn clone(&self) -> Self {
        match self {
            Item::One(callback) => Item::One(callback.clone()),
            Item::Many(items) => Item::Many(items.clone()),
        }
    }
}

impl<C, A> From<Callback<C, A>> for Item<C, A> {
    fn from(callback: Callback<C, A>) -> Self {
        Item::One(callback)
    }
}

impl<C, A> From<&Callback<C, A>> for Item<C, A> {
    fn from(callback: &Callback<C, A>) -> Self {
        Item::One(callback.clone())
    }
}

impl<C, A> From<Vec<Callback<C, A>>> for Item<C, A> {
    fn from(callbacks: Vec<Callback<C, A>>) -> Self {
        Item::Many(callbacks.into_iter().map(Item::One).collect())
    }
}

impl<C, A> From<Vec<Item<C, A>>> for Item<C, A> {
    fn from(items: Vec<Item<C, A>>) -> Self {
        Item::Many(items)
    }
}

impl<C, A, const N: usize> From<[Callback<C, A>; N]> for Item<C, A> {
    fn from(callbacks: [Callback<C, A>; N]) -> Self {
        Item::Many(callbacks.into_iter().map(Item::One).collect())
    }
}

/// A context/arguments pair captured by a fire
pub(crate) type Payload<C, A> = Rc<(C, A)>;

/// What the list remembers about its last fire
pub(crate) enum Invocation<C, A> {
    /// Never fired (or disabled)
    Unset,
    /// Fired without memory, or the last pass was stopped by a `false`
    Halted,
    /// Fired with memory; replayed to callbacks added later
    Recorded(Payload<C, A>),
}

impl<C, A> Invocation<C, A> {
    pub(crate) fn recorded(&self) -> Option<&Payload<C, A>> {
        match self {
            Invocation::Recorded(payload) => Some(payload),
            _ => None,
        }
    }
}

/// The callback collection, or nothing once disabled
pub(crate) enum ListState<C, A> {
    Active(Vec<Callback<C, A>>),
    Disabled,
}

/// Fire requests waiting for the running pass to finish
pub(crate) enum ReplayQueue<C, A> {
    Open(VecDeque<Payload<C, A>>),
    Locked,
}
