//! Generic config store with change notification.
//!
//! `ConfigStore<T>` keeps the current value in a `watch` channel so that
//! readers get a cheap `Arc<T>` and long-running processors can `await` the
//! next change instead of polling.

use std::sync::Arc;
use tokio::sync::watch;

/// A shared configuration section that can be swapped at runtime.
pub struct ConfigStore<T> {
    tx: Arc<watch::Sender<Arc<T>>>,
}

/// Receives notifications when a [`ConfigStore`] is updated.
pub struct ConfigWatcher<T> {
    rx: watch::Receiver<Arc<T>>,
}

impl<T> ConfigStore<T> {
    /// Create a new `ConfigStore` with the given initial value.
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// Replace the stored value and notify all watchers.
    pub fn update(&self, value: T) {
        // `send_replace` succeeds even when nobody is subscribed.
        self.tx.send_replace(Arc::new(value));
    }

    /// The current value.
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.tx.borrow())
    }

    /// Subscribe to change notifications. The current value counts as seen.
    pub fn subscribe(&self) -> ConfigWatcher<T> {
        ConfigWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> ConfigWatcher<T> {
    /// Wait until the config store is updated.
    ///
    /// Returns `Err` once every [`ConfigStore`] handle has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }

    /// The latest value, marking it as seen.
    pub fn current(&mut self) -> Arc<T> {
        Arc::clone(&self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watcher_sees_update() {
        let store = ConfigStore::new(1u32);
        let mut watcher = store.subscribe();
        assert_eq!(*watcher.current(), 1);

        store.update(2);
        assert!(watcher.changed().await.is_ok());
        assert_eq!(*watcher.current(), 2);
        assert_eq!(*store.get(), 2);
    }
}
