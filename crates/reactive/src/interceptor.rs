//! Pre/post operation interception.
//!
//! An `Interceptor` is an explicit, ordered hook list decorating one
//! operation from the outside: pre-hooks may rewrite or veto the input,
//! post-hooks may rewrite or veto the result. Hooks run in descending
//! priority order; equal priorities keep insertion order.

use std::cell::RefCell;
use std::rc::Rc;

/// Unique identifier for an installed hook.
pub type HookId = u64;

/// Hook priority; higher runs earlier.
pub type Priority = i32;

type Hook<T> = Rc<dyn Fn(T) -> Option<T>>;

struct HookEntry<T> {
    id: HookId,
    priority: Priority,
    hook: Hook<T>,
}

struct Inner<T> {
    entries: Vec<HookEntry<T>>,
    next_id: HookId,
}

/// An ordered list of hooks for one side (pre or post) of an operation.
pub struct HookList<T> {
    inner: RefCell<Inner<T>>,
}

impl<T> Default for HookList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HookList<T> {
    /// Creates an empty hook list.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Installs a hook at the given priority.
    ///
    /// The list stays sorted by descending priority; among equal
    /// priorities the earlier installation runs first.
    pub fn add<F>(&self, hook: F, priority: Priority) -> HookId
    where
        F: Fn(T) -> Option<T> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let at = inner
            .entries
            .partition_point(|entry| entry.priority >= priority);
        inner.entries.insert(
            at,
            HookEntry {
                id,
                priority,
                hook: Rc::new(hook),
            },
        );
        id
    }

    /// Removes a hook by id. Returns true if it was present.
    pub fn remove(&self, id: HookId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|entry| entry.id != id);
        inner.entries.len() != before
    }

    /// Threads a value through every hook in order.
    ///
    /// Returns `None` as soon as any hook vetoes; the remaining hooks are
    /// not consulted.
    pub fn run(&self, value: T) -> Option<T> {
        let hooks: Vec<Hook<T>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.hook.clone())
            .collect();
        let mut value = value;
        for hook in hooks {
            value = hook(value)?;
        }
        Some(value)
    }

    /// Returns the number of installed hooks.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns true if no hooks are installed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all hooks.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }
}

/// Pre/post hook pair decorating a single operation.
pub struct Interceptor<A, R> {
    /// Hooks consulted with the operation input before it runs.
    pub pre: HookList<A>,
    /// Hooks consulted with the operation result after it runs.
    pub post: HookList<R>,
}

impl<A, R> Default for Interceptor<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Interceptor<A, R> {
    /// Creates an interceptor with empty hook lists.
    pub fn new() -> Self {
        Self {
            pre: HookList::new(),
            post: HookList::new(),
        }
    }
}
