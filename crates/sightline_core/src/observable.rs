//! Observable values
//!
//! An `Observable<T>` is a shared, clonable cell that notifies subscribers
//! when its value changes. It is how the engine publishes its outputs
//! (active section, indicator geometry, overlay state) to a renderer without
//! any two-way binding: the engine writes, renderers subscribe and read.
//!
//! Writes that do not change the value are swallowed, so subscribers never see
//! redundant notifications.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use sightline_core::Observable;
//!
//! let count = Observable::new(0u32);
//! let seen = Arc::new(AtomicU32::new(0));
//!
//! let seen_in_cb = Arc::clone(&seen);
//! let sub = count.subscribe(move |v| {
//!     seen_in_cb.store(*v, Ordering::SeqCst);
//! });
//!
//! count.set(3);
//! assert_eq!(seen.load(Ordering::SeqCst), 3);
//!
//! count.unsubscribe(sub);
//! count.set(4);
//! assert_eq!(seen.load(Ordering::SeqCst), 3);
//! ```

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, RwLock};

new_key_type! {
    /// Handle returned by `Observable::subscribe`
    pub struct SubscriptionId;
}

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    subscribers: RwLock<SlotMap<SubscriptionId, Subscriber<T>>>,
}

/// A shared value with change notification
pub struct Observable<T: Clone + PartialEq + Send + Sync + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug
    for Observable<T>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(initial),
                subscribers: RwLock::new(SlotMap::with_key()),
            }),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        match self.inner.value.read() {
            Ok(value) => value.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the value, notifying subscribers if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        self.update(|current| *current = value)
    }

    /// Mutate the value in place, notifying subscribers if it changed.
    ///
    /// Returns whether the value changed.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let changed = {
            let Ok(mut value) = self.inner.value.write() else {
                return false;
            };
            let before = value.clone();
            f(&mut *value);
            if *value == before {
                None
            } else {
                Some(value.clone())
            }
        };

        match changed {
            Some(value) => {
                self.notify(&value);
                true
            }
            None => false,
        }
    }

    /// Register a callback invoked with the new value after every change
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        match self.inner.subscribers.write() {
            Ok(mut subs) => subs.insert(Arc::new(callback)),
            Err(_) => SubscriptionId::default(),
        }
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner
            .subscribers
            .write()
            .ok()
            .is_some_and(|mut subs| subs.remove(id).is_some())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    fn notify(&self, value: &T) {
        // Snapshot so callbacks may subscribe/unsubscribe without deadlocking
        let callbacks: Vec<Subscriber<T>> = match self.inner.subscribers.read() {
            Ok(subs) => subs.values().cloned().collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            callback(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_set_notifies_only_on_change() {
        let obs = Observable::new(1);
        let calls = Arc::new(AtomicU32::new(0));

        let c = Arc::clone(&calls);
        obs.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(obs.set(2));
        assert!(!obs.set(2));
        assert!(obs.set(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(obs.get(), 3);
    }

    #[test]
    fn test_update_in_place() {
        let obs = Observable::new(vec![1, 2]);
        assert!(obs.update(|v| v.push(3)));
        assert!(!obs.update(|_| {}));
        assert_eq!(obs.get(), vec![1, 2, 3]);
    }

    #[test]
    fn test_clones_share_state() {
        let a = Observable::new(String::from("x"));
        let b = a.clone();
        a.set("y".into());
        assert_eq!(b.get(), "y");
    }

    #[test]
    fn test_unsubscribe() {
        let obs = Observable::new(0);
        let id = obs.subscribe(|_| {});
        assert_eq!(obs.subscriber_count(), 1);
        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_can_read_value() {
        let obs = Observable::new(0);
        let reader = obs.clone();
        let seen = Arc::new(AtomicU32::new(0));

        let s = Arc::clone(&seen);
        obs.subscribe(move |_| {
            s.store(reader.get(), Ordering::SeqCst);
        });

        obs.set(7);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }
}
