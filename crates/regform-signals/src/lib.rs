//! # regform-signals
//!
//! A small synchronous signal dispatcher. Forms use it to notify observers
//! when a field value changes, without the observers being known to the
//! form.
//!
//! ## Usage
//!
//! ```
//! use regform_signals::Signal;
//! use std::sync::Arc;
//!
//! let signal: Signal<String> = Signal::new();
//!
//! signal.connect("logger", Arc::new(|value: &String| {
//!     println!("changed to {value}");
//! }));
//!
//! assert_eq!(signal.send(&"alice".to_string()), 1);
//! ```

use std::sync::{Arc, RwLock};

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that signals can be dispatched from
/// any thread.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Each signal carries a payload type `T`. Receivers are called in the order
/// they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_count())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub const fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// If a receiver with the same ID is already connected, it is replaced
    /// and keeps its position.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().expect("signal lock poisoned");

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            tracing::trace!(receiver = %id, "signal receiver connected");
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// Returns the number of receivers that were called. The receiver list is
    /// snapshotted first, so a receiver may connect or disconnect others
    /// without deadlocking.
    pub fn send(&self, payload: &T) -> usize {
        let receivers: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &receivers {
            callback(payload);
        }
        receivers.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }
}
