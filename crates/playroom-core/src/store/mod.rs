//! Application state store
//!
//! A small publish/subscribe cell holding the state the shell shares with
//! every activity. Subscribers register per field and are notified
//! synchronously, in registration order, whenever that field is written.
//! The mute flag is written through to [`Storage`].

mod preferences;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::host::{MemoryStorage, Storage};

/// Snapshot of shared state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Audio and speech are silenced
    pub muted: bool,
    /// Identifier of the mounted activity, `None` on the menu
    pub current_activity: Option<String>,
}

/// Field of [`AppState`] a subscriber listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreField {
    Muted,
    CurrentActivity,
}

/// One write to the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateChange {
    Muted(bool),
    CurrentActivity(Option<String>),
}

impl StateChange {
    /// Field this change writes
    pub fn field(&self) -> StoreField {
        match self {
            StateChange::Muted(_) => StoreField::Muted,
            StateChange::CurrentActivity(_) => StoreField::CurrentActivity,
        }
    }
}

/// Token returned by [`Store::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&AppState)>;

/// Shared, cloneable handle to the application state
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

struct StoreInner {
    state: RefCell<AppState>,
    subscribers: RefCell<HashMap<StoreField, Vec<(SubscriptionId, Subscriber)>>>,
    next_id: Cell<u64>,
    storage: Rc<dyn Storage>,
    key: String,
}

impl Store {
    /// Create a store whose mute flag is read from and written to `storage` under `key`
    pub fn load(storage: Rc<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let muted = preferences::load_muted(storage.as_ref(), &key);
        debug!(key = %key, muted, "store loaded");
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(AppState {
                    muted,
                    current_activity: None,
                }),
                subscribers: RefCell::new(HashMap::new()),
                next_id: Cell::new(1),
                storage,
                key,
            }),
        }
    }

    /// Store backed by throwaway in-memory storage
    pub fn in_memory() -> Self {
        Self::load(Rc::new(MemoryStorage::new()), "playroom.muted")
    }

    /// Current state
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Whether audio and speech are silenced
    pub fn is_muted(&self) -> bool {
        self.inner.state.borrow().muted
    }

    /// Identifier of the mounted activity
    pub fn current_activity(&self) -> Option<String> {
        self.inner.state.borrow().current_activity.clone()
    }

    /// Apply one change, persist it if needed and notify the field's subscribers.
    ///
    /// Subscribers are notified on every write, including writes that leave the
    /// value unchanged.
    pub fn set(&self, change: StateChange) {
        let field = change.field();
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            match &change {
                StateChange::Muted(muted) => state.muted = *muted,
                StateChange::CurrentActivity(id) => state.current_activity = id.clone(),
            }
            state.clone()
        };

        if let StateChange::Muted(muted) = change {
            if let Err(err) =
                preferences::save_muted(self.inner.storage.as_ref(), &self.inner.key, muted)
            {
                warn!(key = %self.inner.key, error = %err, "failed to persist mute flag");
            }
        }

        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .get(&field)
            .map(|list| list.iter().map(|(_, f)| Rc::clone(f)).collect())
            .unwrap_or_default();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }

    /// Set the mute flag
    pub fn set_muted(&self, muted: bool) {
        self.set(StateChange::Muted(muted));
    }

    /// Flip the mute flag and return the new value
    pub fn toggle_muted(&self) -> bool {
        let muted = !self.is_muted();
        self.set_muted(muted);
        muted
    }

    /// Call `subscriber` with a state snapshot after every write to `field`
    pub fn subscribe(&self, field: StoreField, subscriber: impl Fn(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .entry(field)
            .or_default()
            .push((id, Rc::new(subscriber)));
        id
    }

    /// Remove a subscription; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        for list in subscribers.values_mut() {
            if let Some(index) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("key", &self.inner.key)
            .finish()
    }
}
