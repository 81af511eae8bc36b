//! Observable per-resource request state.
//!
//! Each accessor owns one `StateCell` per resource it serves. The UI either
//! polls `snapshot()` or holds a `watch::Receiver` from `subscribe()` and is
//! woken on every transition.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// `idle -> loading -> idle-with-data | idle-with-error`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_updated: None,
        }
    }
}

impl<T> RequestState<T> {
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Replace the data without a loading phase (cache hits, fresh values
    /// returned by a mutation). A prior error is left as is.
    pub(crate) fn set_data(&mut self, data: T) {
        self.data = Some(data);
        self.last_updated = Some(Utc::now());
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.last_updated = Some(Utc::now());
        self.loading = false;
    }

    /// Data from the previous success is kept alongside the error.
    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }
}

#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<RequestState<T>>,
}

impl<T> Default for StateCell<T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(RequestState::default());
        Self { tx }
    }
}

impl<T> StateCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.tx.subscribe()
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut RequestState<T>)) {
        self.tx.send_modify(f);
    }

    pub fn has_data(&self) -> bool {
        self.tx.borrow().has_data()
    }

    pub fn has_error(&self) -> bool {
        self.tx.borrow().has_error()
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.tx.borrow().last_updated
    }

    pub fn error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }
}

impl<T: Clone> StateCell<T> {
    pub fn snapshot(&self) -> RequestState<T> {
        self.tx.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.tx.borrow().data.clone()
    }
}
