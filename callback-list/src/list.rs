//! The callback list dispatcher
//!
//! [`CallbackList`] is a cheap, clonable handle to shared list state. All
//! methods take `&self` so that callbacks can hold a handle (usually a
//! [`WeakCallbackList`]) and add, remove, fire, lock or disable the list while
//! a pass is running. The internal `RefCell` is never borrowed while a
//! callback executes.

use crate::cursor::FiringCursor;
use crate::flags::{FlagCache, FlagSet, Flags};
use crate::types::{Callback, Invocation, Item, ListState, Payload, ReplayQueue};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// Nesting deeper than this in a single `add` call is skipped
pub const MAX_NESTING_DEPTH: usize = 32;

struct State<C, A> {
    callbacks: ListState<C, A>,
    queue: ReplayQueue<C, A>,
    memory: Invocation<C, A>,
    /// Sticky: survives `disable()`
    fired: bool,
    /// `Some` exactly while a pass is invoking callbacks
    cursor: Option<FiringCursor>,
}

struct Shared<C, A> {
    flags: Flags,
    state: RefCell<State<C, A>>,
}

/// An ordered list of callbacks fired together with a shared context and
/// arguments
///
/// `C` is the context type and `A` the arguments type; every callback receives
/// `(&C, &A)`. Behavior is fixed at construction by [`Flags`].
pub struct CallbackList<C, A> {
    inner: Rc<Shared<C, A>>,
}

/// A non-owning handle to a [`CallbackList`]
///
/// Callbacks that need to reach their own list should capture one of these
/// to avoid a reference cycle.
pub struct WeakCallbackList<C, A> {
    inner: Weak<Shared<C, A>>,
}

impl<C, A> CallbackList<C, A> {
    /// Create a list with every flag off
    pub fn new() -> Self {
        Self::with_flags(Flags::default())
    }

    /// Create a list with the given flags
    pub fn with_flags(flags: Flags) -> Self {
        log::trace!("Creating callback list with flags [{}]", flags);
        Self {
            inner: Rc::new(Shared {
                flags,
                state: RefCell::new(State {
                    callbacks: ListState::Active(Vec::new()),
                    queue: ReplayQueue::Open(VecDeque::new()),
                    memory: Invocation::Unset,
                    fired: false,
                    cursor: None,
                }),
            }),
        }
    }

    /// Create a list from a resolved flag set
    pub fn with_flag_set(set: &FlagSet) -> Self {
        Self::with_flags(set.flags())
    }

    /// Create a list from a configuration string such as `"once memory"`
    ///
    /// The string is resolved through `cache`, so repeated configurations
    /// share one [`FlagSet`].
    pub fn from_config(cache: &mut FlagCache, config: &str) -> Self {
        Self::with_flag_set(&cache.resolve(config))
    }

    /// The flags this list was built with
    pub fn flags(&self) -> Flags {
        self.inner.flags
    }

    /// Create a weak handle to this list
    pub fn downgrade(&self) -> WeakCallbackList<C, A> {
        WeakCallbackList {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Add a callback or a (possibly nested) sequence of callbacks
    ///
    /// With `unique`, callbacks already in the list are skipped. If a pass is
    /// running, the new callbacks run later in that same pass. Otherwise, on
    /// a `memory` list that has a recorded fire, the new callbacks are
    /// invoked right away with the recorded context and arguments.
    pub fn add(&self, item: impl Into<Item<C, A>>) -> &Self {
        let catch_up = {
            let mut guard = self.inner.state.borrow_mut();
            let state = &mut *guard;
            let ListState::Active(callbacks) = &mut state.callbacks else {
                return self;
            };

            let start = callbacks.len();
            let unique = self.inner.flags.unique;
            flatten(item.into(), |callback| {
                if !unique || !callbacks.iter().any(|c| c.same(&callback)) {
                    callbacks.push(callback);
                }
            });

            let len = callbacks.len();
            if let Some(cursor) = state.cursor.as_mut() {
                cursor.extend_to(len);
                None
            } else if len > start {
                state.memory.recorded().map(|payload| (Rc::clone(payload), start))
            } else {
                None
            }
        };

        if let Some((payload, start)) = catch_up {
            log::debug!("Replaying recorded fire to {} late callback(s)", self.len() - start);
            self.drain(payload, start);
        }
        self
    }

    /// Remove every occurrence of `callback`
    pub fn remove(&self, callback: &Callback<C, A>) -> &Self {
        self.remove_all(std::iter::once(callback))
    }

    /// Remove every occurrence of each given callback
    ///
    /// Safe to call from inside a running pass, including for the callback
    /// currently executing; the pass neither skips nor repeats a neighbor.
    pub fn remove_all<'a, I>(&self, callbacks: I) -> &Self
    where
        I: IntoIterator<Item = &'a Callback<C, A>>,
        C: 'a,
        A: 'a,
    {
        // Dropped only after the borrow is released
        let mut removed = Vec::new();
        let mut guard = self.inner.state.borrow_mut();
        let state = &mut *guard;
        let ListState::Active(list) = &mut state.callbacks else {
            return self;
        };

        for target in callbacks {
            let mut index = 0;
            while index < list.len() {
                if !list[index].same(target) {
                    index += 1;
                    continue;
                }
                removed.push(list.remove(index));
                if let Some(cursor) = state.cursor.as_mut() {
                    cursor.removed(index);
                }
                // At most one match exists
                if self.inner.flags.unique {
                    break;
                }
            }
        }
        drop(guard);
        drop(removed);
        self
    }

    /// Check whether `callback` is in the list
    pub fn has(&self, callback: &Callback<C, A>) -> bool {
        match &self.inner.state.borrow().callbacks {
            ListState::Active(list) => list.iter().any(|c| c.same(callback)),
            ListState::Disabled => false,
        }
    }

    /// Number of callbacks in the list (0 once disabled)
    pub fn len(&self) -> usize {
        match &self.inner.state.borrow().callbacks {
            ListState::Active(list) => list.len(),
            ListState::Disabled => 0,
        }
    }

    /// True if the list holds no callbacks
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all callbacks
    ///
    /// The list stays enabled and keeps its fired/memory state. A running
    /// pass ends after the current callback returns.
    pub fn empty(&self) -> &Self {
        let mut guard = self.inner.state.borrow_mut();
        let state = &mut *guard;
        let ListState::Active(list) = &mut state.callbacks else {
            return self;
        };
        let removed = std::mem::take(list);
        if let Some(cursor) = state.cursor.as_mut() {
            cursor.clear();
        }
        drop(guard);
        drop(removed);
        self
    }

    /// Permanently disable the list
    ///
    /// Drops every callback, pending fire and recorded invocation; all later
    /// operations are no-ops. [`fired`](Self::fired) keeps its value.
    pub fn disable(&self) -> &Self {
        let released = {
            let mut state = self.inner.state.borrow_mut();
            if !matches!(state.callbacks, ListState::Disabled) {
                log::debug!("Disabling callback list");
            }
            (
                std::mem::replace(&mut state.callbacks, ListState::Disabled),
                std::mem::replace(&mut state.queue, ReplayQueue::Locked),
                std::mem::replace(&mut state.memory, Invocation::Unset),
            )
        };
        drop(released);
        self
    }

    /// True once [`disable`](Self::disable) has been called (directly or by
    /// `lock`/`once`)
    pub fn disabled(&self) -> bool {
        matches!(self.inner.state.borrow().callbacks, ListState::Disabled)
    }

    /// Refuse any further fire
    ///
    /// A list with a recorded `memory` invocation stays enabled: callbacks
    /// added later are still invoked with the recorded arguments. Any other
    /// list has nothing left to offer and is disabled.
    pub fn lock(&self) -> &Self {
        let (keeps_memory, pending) = {
            let mut state = self.inner.state.borrow_mut();
            let pending = std::mem::replace(&mut state.queue, ReplayQueue::Locked);
            (state.memory.recorded().is_some(), pending)
        };
        drop(pending);

        if keeps_memory {
            log::debug!("Locking callback list at its recorded invocation");
        } else {
            self.disable();
        }
        self
    }

    /// True if the list no longer accepts fires
    pub fn locked(&self) -> bool {
        matches!(self.inner.state.borrow().queue, ReplayQueue::Locked)
    }

    /// True if the list has fired at least once
    pub fn fired(&self) -> bool {
        self.inner.state.borrow().fired
    }

    /// True while a pass is invoking callbacks
    pub fn is_firing(&self) -> bool {
        self.inner.state.borrow().cursor.is_some()
    }

    /// Invoke every callback with `context` and `args`
    ///
    /// Ignored when locked. Called from inside a running pass, the request is
    /// queued and runs as its own pass once the current one finishes, or is
    /// dropped on a `once` list. A `once` list that already fired ignores it.
    pub fn fire_with(&self, context: C, args: A) -> &Self {
        let payload = {
            let mut guard = self.inner.state.borrow_mut();
            let state = &mut *guard;
            let ReplayQueue::Open(queue) = &mut state.queue else {
                log::trace!("Ignoring fire on locked callback list");
                return self;
            };

            if state.cursor.is_some() {
                if self.inner.flags.once {
                    log::trace!("Dropping reentrant fire on once list");
                } else {
                    queue.push_back(Rc::new((context, args)));
                }
                return self;
            }

            if self.inner.flags.once && state.fired {
                log::trace!("Ignoring repeated fire on once list");
                return self;
            }

            Rc::new((context, args))
        };

        self.drain(payload, 0);
        self
    }

    /// Invoke every callback with `args` and a default context
    pub fn fire(&self, args: A) -> &Self
    where
        C: Default,
    {
        self.fire_with(C::default(), args)
    }

    /// Run a pass, then keep running queued fires one pass at a time
    fn drain(&self, mut payload: Payload<C, A>, mut start: usize) {
        loop {
            self.run_pass(&payload, start);
            start = 0;

            let mut state = self.inner.state.borrow_mut();
            if matches!(state.callbacks, ListState::Disabled) {
                return;
            }

            if !self.inner.flags.once {
                let next = match &mut state.queue {
                    ReplayQueue::Open(queue) => queue.pop_front(),
                    ReplayQueue::Locked => None,
                };
                match next {
                    Some(next) => payload = next,
                    None => return,
                }
            } else if state.memory.recorded().is_some() {
                // Fired for good; nothing left to call but memory stays
                let spent =
                    std::mem::replace(&mut state.callbacks, ListState::Active(Vec::new()));
                drop(state);
                drop(spent);
                return;
            } else {
                drop(state);
                self.disable();
                return;
            }
        }
    }

    /// One pass over the callbacks from `start`
    fn run_pass(&self, payload: &Payload<C, A>, start: usize) {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            state.fired = true;
            let memory = if self.inner.flags.memory {
                Invocation::Recorded(Rc::clone(payload))
            } else {
                Invocation::Halted
            };
            let len = match &state.callbacks {
                ListState::Active(list) => list.len(),
                ListState::Disabled => 0,
            };
            state.cursor = Some(FiringCursor::new(start, len));
            std::mem::replace(&mut state.memory, memory)
        };
        drop(previous);

        let _firing = FiringGuard {
            state: &self.inner.state,
        };
        let (context, args) = &**payload;

        loop {
            let callback = {
                let mut guard = self.inner.state.borrow_mut();
                let state = &mut *guard;
                let ListState::Active(list) = &state.callbacks else {
                    break;
                };
                let Some(index) = state.cursor.as_mut().and_then(FiringCursor::advance) else {
                    break;
                };
                match list.get(index) {
                    Some(callback) => callback.clone(),
                    None => break,
                }
            };

            if callback.call(context, args) && self.inner.flags.stop_on_false {
                let previous = {
                    let mut state = self.inner.state.borrow_mut();
                    if matches!(state.callbacks, ListState::Disabled) {
                        Invocation::Unset
                    } else {
                        std::mem::replace(&mut state.memory, Invocation::Halted)
                    }
                };
                drop(previous);
                log::trace!("Callback returned false; stopping pass");
                break;
            }
        }
    }
}

/// Leaves the firing state when a pass ends, including by panic
struct FiringGuard<'a, C, A> {
    state: &'a RefCell<State<C, A>>,
}

impl<C, A> Drop for FiringGuard<'_, C, A> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.cursor = None;
        }
    }
}

/// Walk `item` depth-first, handing each callback to `push` in order
fn flatten<C, A>(item: Item<C, A>, mut push: impl FnMut(Callback<C, A>)) {
    let mut stack = match item {
        Item::One(callback) => return push(callback),
        Item::Many(items) => vec![(items.into_iter(), 1)],
    };

    while let Some((iter, depth)) = stack.last_mut() {
        let depth = *depth;
        match iter.next() {
            None => {
                stack.pop();
            }
            Some(Item::One(callback)) => push(callback),
            Some(Item::Many(items)) => {
                if depth >= MAX_NESTING_DEPTH {
                    log::warn!("Skipping callbacks nested deeper than {}", MAX_NESTING_DEPTH);
                } else {
                    stack.push((items.into_iter(), depth + 1));
                }
            }
        }
    }
}

impl<C, A> WeakCallbackList<C, A> {
    /// Get a strong handle if the list is still alive
    pub fn upgrade(&self) -> Option<CallbackList<C, A>> {
        self.inner.upgrade().map(|inner| CallbackList { inner })
    }
}

impl<C, A> Clone for CallbackList<C, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C, A> Clone for WeakCallbackList<C, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<C, A> Default for CallbackList<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A> fmt::Debug for CallbackList<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("flags", &self.inner.flags)
            .field("len", &self.len())
            .field("fired", &self.fired())
            .field("locked", &self.locked())
            .field("disabled", &self.disabled())
            .finish()
    }
}

impl<C, A> fmt::Debug for WeakCallbackList<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakCallbackList")
    }
}

impl FlagCache {
    /// Build a callback list from a configuration string, resolved through
    /// this cache
    pub fn build<C, A>(&mut self, config: &str) -> CallbackList<C, A> {
        CallbackList::from_config(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    /// A callback that records `name:args` and returns `result`
    fn recorder(log: &Log, name: &'static str, result: bool) -> Callback<(), &'static str> {
        let log = Rc::clone(log);
        Callback::new(move |_: &(), args: &&'static str| {
            log.borrow_mut().push(format!("{}:{}", name, args));
            result
        })
    }

    fn calls(log: &Log) -> Vec<String> {
        log.borrow_mut().drain(..).collect()
    }

    #[test]
    fn test_fire_in_insertion_order() {
        let log = Log::default();
        let list = CallbackList::new();
        list.add(recorder(&log, "f1", true)).add(recorder(&log, "f2", true));

        list.fire("x");
        assert_eq!(calls(&log), vec!["f1:x", "f2:x"]);
        assert!(list.fired());

        // Repeatable without `once`
        list.fire("y");
        assert_eq!(calls(&log), vec!["f1:y", "f2:y"]);
    }

    #[test]
    fn test_fire_with_context() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let list: CallbackList<String, i32> = CallbackList::new();
        let sink = Rc::clone(&seen);
        list.add(Callback::new(move |ctx: &String, n: &i32| {
            sink.borrow_mut().push((ctx.clone(), *n));
        }));

        list.fire_with("ctx".to_string(), 7);
        list.fire(8);
        assert_eq!(
            *seen.borrow(),
            vec![("ctx".to_string(), 7), (String::new(), 8)]
        );
    }

    #[test]
    fn test_duplicates_allowed_by_default() {
        let log = Log::default();
        let list = CallbackList::new();
        let f = recorder(&log, "f", true);
        list.add(&f).add(&f);
        assert_eq!(list.len(), 2);

        list.fire("x");
        assert_eq!(calls(&log), vec!["f:x", "f:x"]);

        // remove drops every occurrence
        list.remove(&f);
        assert!(!list.has(&f));
        assert!(list.is_empty());
    }

    #[test]
    fn test_unique() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_unique(true));
        let f = recorder(&log, "f", true);
        list.add(&f).add(vec![f.clone(), f.clone()]);
        assert_eq!(list.len(), 1);
        assert!(list.has(&f));

        list.remove(&f);
        assert!(!list.has(&f));
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_nested_items_flatten_in_order() {
        let log = Log::default();
        let list = CallbackList::new();
        list.add(Item::Many(vec![
            recorder(&log, "a", true).into(),
            Item::Many(vec![
                recorder(&log, "b", true).into(),
                Item::Many(vec![recorder(&log, "c", true).into()]),
            ]),
            recorder(&log, "d", true).into(),
        ]));

        list.fire("x");
        assert_eq!(calls(&log), vec!["a:x", "b:x", "c:x", "d:x"]);
    }

    #[test]
    fn test_excessive_nesting_is_skipped() {
        let log = Log::default();
        let mut item: Item<(), &'static str> = recorder(&log, "deep", true).into();
        for _ in 0..MAX_NESTING_DEPTH + 1 {
            item = Item::Many(vec![item]);
        }

        let list = CallbackList::new();
        list.add(Item::Many(vec![recorder(&log, "shallow", true).into(), item]));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_stop_on_false() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_stop_on_false(true));
        list.add(recorder(&log, "f1", false)).add(recorder(&log, "f2", true));

        list.fire("x");
        assert_eq!(calls(&log), vec!["f1:x"]);
    }

    #[test]
    fn test_false_ignored_without_stop_on_false() {
        let log = Log::default();
        let list = CallbackList::new();
        list.add(recorder(&log, "f1", false)).add(recorder(&log, "f2", true));

        list.fire("x");
        assert_eq!(calls(&log), vec!["f1:x", "f2:x"]);
    }

    #[test]
    fn test_memory_replays_to_late_callbacks() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_memory(true));
        list.add(recorder(&log, "f1", true));
        list.fire("a");
        assert_eq!(calls(&log), vec!["f1:a"]);

        list.add(recorder(&log, "f2", true));
        assert_eq!(calls(&log), vec!["f2:a"]);

        list.fire("b");
        list.add(recorder(&log, "f3", true));
        assert_eq!(calls(&log), vec!["f1:b", "f2:b", "f3:b"]);
    }

    #[test]
    fn test_memory_halted_by_false_stops_replay() {
        let log = Log::default();
        let flags = Flags::new().with_memory(true).with_stop_on_false(true);
        let list = CallbackList::with_flags(flags);
        list.add(recorder(&log, "f1", false));
        list.fire("a");
        assert_eq!(calls(&log), vec!["f1:a"]);

        list.add(recorder(&log, "f2", true));
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_once_without_memory_disables() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_once(true));
        list.add(recorder(&log, "f1", true));

        list.fire("a");
        assert_eq!(calls(&log), vec!["f1:a"]);
        assert!(list.fired());
        assert!(list.disabled());
        assert!(list.locked());

        list.fire("b");
        list.add(recorder(&log, "f2", true));
        assert!(calls(&log).is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_once_memory_scenario() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_once(true).with_memory(true));
        list.add(recorder(&log, "f1", true));

        list.fire("1");
        assert_eq!(calls(&log), vec!["f1:1"]);
        assert!(!list.disabled());
        assert!(list.is_empty());
        assert!(list.fired());

        list.add(recorder(&log, "f3", true));
        assert_eq!(calls(&log), vec!["f3:1"]);
        assert!(list.is_empty());

        list.fire("2");
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_once_halted_disables_even_with_memory() {
        let log = Log::default();
        let flags = Flags::new()
            .with_once(true)
            .with_memory(true)
            .with_stop_on_false(true);
        let list = CallbackList::with_flags(flags);
        list.add(recorder(&log, "f1", false));

        list.fire("x");
        assert!(list.disabled());
        assert!(list.fired());
    }

    #[test]
    fn test_lock_without_memory_disables() {
        let log = Log::default();
        let list = CallbackList::new();
        list.add(recorder(&log, "f1", true));

        list.lock();
        assert!(list.locked());
        assert!(list.disabled());
        assert!(!list.fired());

        list.fire("x");
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_lock_with_recorded_memory_keeps_replaying() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_memory(true));
        list.add(recorder(&log, "f1", true));
        list.fire("a");
        calls(&log);

        list.lock();
        assert!(list.locked());
        assert!(!list.disabled());

        list.fire("b");
        assert!(calls(&log).is_empty());

        list.add(recorder(&log, "f2", true));
        assert_eq!(calls(&log), vec!["f2:a"]);
    }

    #[test]
    fn test_lock_after_halted_memory_fire_disables() {
        let log = Log::default();
        let flags = Flags::new().with_memory(true).with_stop_on_false(true);
        let list = CallbackList::with_flags(flags);
        list.add(recorder(&log, "f1", false)).add(recorder(&log, "f2", true));
        list.fire("a");
        assert_eq!(calls(&log), vec!["f1:a"]);

        list.lock();
        assert!(list.disabled());
        assert!(list.locked());
        assert!(list.fired());

        list.add(recorder(&log, "f3", true));
        list.fire("b");
        assert!(calls(&log).is_empty());
        assert_eq!(list.len(), 0);
    }

    /// Reports the list length when the owning callback is dropped
    struct LenOnDrop {
        list: WeakCallbackList<(), &'static str>,
        seen: Rc<RefCell<Vec<usize>>>,
    }

    impl Drop for LenOnDrop {
        fn drop(&mut self) {
            if let Some(list) = self.list.upgrade() {
                self.seen.borrow_mut().push(list.len());
            }
        }
    }

    fn dropping(
        list: &CallbackList<(), &'static str>,
        seen: &Rc<RefCell<Vec<usize>>>,
    ) -> Callback<(), &'static str> {
        let hook = LenOnDrop {
            list: list.downgrade(),
            seen: Rc::clone(seen),
        };
        Callback::new(move |_: &(), _: &&'static str| {
            let _hook = &hook;
        })
    }

    #[test]
    fn test_released_callbacks_may_reenter_list() {
        let seen = Rc::new(RefCell::new(Vec::new()));

        let list = CallbackList::new();
        list.add(dropping(&list, &seen)).add(dropping(&list, &seen));
        list.empty();
        assert_eq!(*seen.borrow(), vec![0, 0]);

        seen.borrow_mut().clear();
        list.add(dropping(&list, &seen));
        list.disable();
        assert_eq!(*seen.borrow(), vec![0]);

        seen.borrow_mut().clear();
        let list = CallbackList::with_flags(Flags::new().with_once(true).with_memory(true));
        list.add(dropping(&list, &seen));
        list.fire("a");
        assert_eq!(*seen.borrow(), vec![0]);
        assert!(!list.disabled());
    }

    #[test]
    fn test_empty_keeps_list_enabled() {
        let log = Log::default();
        let list = CallbackList::with_flags(Flags::new().with_memory(true));
        list.add(recorder(&log, "f1", true));
        list.fire("a");
        calls(&log);

        list.empty();
        assert!(list.is_empty());
        assert!(!list.disabled());
        assert!(list.fired());

        // Memory survives emptying
        list.add(recorder(&log, "f2", true));
        assert_eq!(calls(&log), vec!["f2:a"]);
    }

    #[test]
    fn test_disable_is_terminal() {
        let log = Log::default();
        let list = CallbackList::new();
        let f = recorder(&log, "f", true);
        list.add(&f);
        list.fire("a");
        calls(&log);

        list.disable().disable();
        assert!(list.disabled());
        assert!(list.locked());
        assert!(list.fired());
        assert!(!list.has(&f));

        list.add(&f).empty().fire("b");
        assert!(list.disabled());
        assert_eq!(list.len(), 0);
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_from_config_uses_cache() {
        let mut cache = FlagCache::new();
        let a: CallbackList<(), ()> = cache.build("once unique");
        let b: CallbackList<(), ()> = CallbackList::from_config(&mut cache, "once unique");

        assert_eq!(a.flags(), Flags::new().with_once(true).with_unique(true));
        assert_eq!(a.flags(), b.flags());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_weak_handle() {
        let list: CallbackList<(), ()> = CallbackList::new();
        let weak = list.downgrade();
        assert!(weak.upgrade().is_some());

        drop(list);
        assert!(weak.upgrade().is_none());
    }
}
