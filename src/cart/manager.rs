//! Cart lifecycle management
//!
//! `CartManager` is the single owner of the in-memory cart. Mutations are
//! synchronous and atomic; persistence happens on a background task that
//! always writes the snapshot current at write time, so the last completed
//! write carries the last mutation even when calls overlap an in-flight
//! write.

use crate::cart::state::{Cart, LineItem, NewItem};
use crate::error::{CartError, CartResult};
use crate::store::{CartStore, STORAGE_KEY};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Health of the durable snapshot relative to the in-memory cart
///
/// `Degraded` means the last store operation failed; the in-memory cart is
/// still correct and the next successful write restores `Ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Durability {
    Ok,
    Degraded { reason: String },
}

/// Handle returned by [`CartManager::subscribe`], used to unsubscribe
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

type Listener = Arc<dyn Fn(&[LineItem]) + Send + Sync>;

struct Shared {
    /// `None` until hydration has completed
    cart: Option<Cart>,
    /// Bumped once per mutation; the writer reports the sequence it persisted
    seq: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cart state manager: owns the cart, notifies subscribers, persists snapshots
pub struct CartManager {
    shared: Arc<Mutex<Shared>>,
    store: Arc<dyn CartStore>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
    dirty_tx: watch::Sender<u64>,
    persisted_rx: watch::Receiver<u64>,
    durability_tx: Arc<watch::Sender<Durability>>,
}

impl CartManager {
    /// Create a manager backed by the given durable store
    ///
    /// Spawns the persistence writer task, so this must be called from within
    /// a tokio runtime. The cart starts unhydrated: call [`hydrate`] before
    /// any mutation or accessor.
    ///
    /// [`hydrate`]: CartManager::hydrate
    pub fn init(store: Arc<dyn CartStore>) -> Arc<Self> {
        let shared = Arc::new(Mutex::new(Shared { cart: None, seq: 0 }));
        let (dirty_tx, dirty_rx) = watch::channel(0u64);
        let (persisted_tx, persisted_rx) = watch::channel(0u64);
        let durability_tx = Arc::new(watch::channel(Durability::Ok).0);

        tokio::spawn(run_writer(
            Arc::clone(&shared),
            Arc::clone(&store),
            dirty_rx,
            persisted_tx,
            Arc::clone(&durability_tx),
        ));

        Arc::new(Self {
            shared,
            store,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            dirty_tx,
            persisted_rx,
            durability_tx,
        })
    }

    /// Load the persisted cart, once per session
    ///
    /// An absent key or a malformed blob yields an empty cart; a store read
    /// failure also yields an empty cart and flips [`durability`] to
    /// `Degraded` rather than failing startup. Idempotent: once hydrated,
    /// further calls return the current snapshot without touching the store.
    ///
    /// [`durability`]: CartManager::durability
    pub async fn hydrate(&self) -> Vec<LineItem> {
        {
            let shared = lock(&self.shared);
            if let Some(cart) = &shared.cart {
                return cart.items().to_vec();
            }
        }

        let cart = match self.store.get(STORAGE_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Cart>(&bytes) {
                Ok(cart) => {
                    info!(items = cart.len(), "Hydrated cart from durable store");
                    cart
                }
                Err(e) => {
                    warn!("Stored cart snapshot is malformed, starting empty: {e}");
                    Cart::new()
                }
            },
            Ok(None) => {
                debug!("No stored cart snapshot, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!("Durable store read failed, starting empty: {e}");
                self.durability_tx.send_replace(Durability::Degraded {
                    reason: e.to_string(),
                });
                Cart::new()
            }
        };

        let mut shared = lock(&self.shared);
        // A concurrent hydrate may have won the race; keep its result
        match &shared.cart {
            Some(existing) => existing.items().to_vec(),
            None => {
                let items = cart.items().to_vec();
                shared.cart = Some(cart);
                items
            }
        }
    }

    /// Add a product, merging with an existing line item of the same id
    pub fn add_to_cart(&self, item: NewItem) -> CartResult<()> {
        self.mutate("add_to_cart", |cart| cart.add(item))
    }

    /// Increase the quantity of the matching line item by one
    ///
    /// An absent id leaves the cart unchanged but still persists.
    pub fn increment(&self, id: &str) -> CartResult<()> {
        self.mutate("increment", |cart| cart.increment(id))
    }

    /// Decrease the quantity of the matching line item by one
    ///
    /// A line item at quantity 1 is removed. An absent id leaves the cart
    /// unchanged but still persists.
    pub fn decrement(&self, id: &str) -> CartResult<()> {
        self.mutate("decrement", |cart| cart.decrement(id))
    }

    /// Read-only snapshot of the current cart
    ///
    /// Reflects every mutation already applied in memory, independent of
    /// whether the corresponding persistence write has completed.
    pub fn products(&self) -> CartResult<Vec<LineItem>> {
        let shared = lock(&self.shared);
        shared
            .cart
            .as_ref()
            .map(|cart| cart.items().to_vec())
            .ok_or(CartError::NotInitialized)
    }

    /// Register a listener invoked synchronously after each mutation
    ///
    /// The listener receives the post-mutation snapshot. Dropping the handle
    /// does nothing; pass it to [`unsubscribe`] to stop notifications.
    ///
    /// [`unsubscribe`]: CartManager::unsubscribe
    pub fn subscribe(&self, listener: impl Fn(&[LineItem]) + Send + Sync + 'static) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        lock_listeners(&self.listeners).push((id, Arc::new(listener)));
        Subscription { id }
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&self, sub: Subscription) {
        lock_listeners(&self.listeners).retain(|(id, _)| *id != sub.id);
    }

    /// Watch the durability indicator
    ///
    /// Stays `Ok` while writes succeed, switches to `Degraded` after a failed
    /// store operation, and recovers on the next successful write.
    pub fn durability(&self) -> watch::Receiver<Durability> {
        self.durability_tx.subscribe()
    }

    /// Wait until every mutation issued so far has had a persistence attempt
    ///
    /// Resolves even when writes are failing (the cart runs with degraded
    /// durability in that case); errors only if the writer task is gone.
    pub async fn flush(&self) -> CartResult<()> {
        let target = lock(&self.shared).seq;
        let mut rx = self.persisted_rx.clone();
        while *rx.borrow_and_update() < target {
            rx.changed()
                .await
                .map_err(|_| CartError::PersistenceStopped)?;
        }
        Ok(())
    }

    /// Apply a mutation under the state lock, then notify and schedule a write
    ///
    /// The dirty nudge happens while the lock is held, so the writer can
    /// never observe (or persist) a snapshot older than the one this mutation
    /// produced.
    fn mutate(&self, op: &'static str, apply: impl FnOnce(&mut Cart)) -> CartResult<()> {
        let snapshot = {
            let mut shared = lock(&self.shared);
            let shared = &mut *shared;
            let cart = shared.cart.as_mut().ok_or(CartError::NotInitialized)?;
            apply(cart);
            shared.seq += 1;
            self.dirty_tx.send_replace(shared.seq);
            cart.items().to_vec()
        };

        debug!(op, items = snapshot.len(), "Applied cart mutation");
        self.notify(&snapshot);
        Ok(())
    }

    fn notify(&self, items: &[LineItem]) {
        // Clone handles out so a listener can re-enter the manager
        let listeners: Vec<Listener> = lock_listeners(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(items);
        }
    }
}

fn lock_listeners(listeners: &Mutex<Vec<(u64, Listener)>>) -> MutexGuard<'_, Vec<(u64, Listener)>> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Background persistence writer
///
/// Wakes on each dirty nudge, captures the current snapshot and sequence,
/// and writes the whole cart under the fixed storage key. Consecutive
/// mutations coalesce into one write of the latest state. Failed writes
/// degrade durability but still advance the persisted sequence so `flush`
/// terminates.
async fn run_writer(
    shared: Arc<Mutex<Shared>>,
    store: Arc<dyn CartStore>,
    mut dirty_rx: watch::Receiver<u64>,
    persisted_tx: watch::Sender<u64>,
    durability_tx: Arc<watch::Sender<Durability>>,
) {
    while dirty_rx.changed().await.is_ok() {
        let (cart, seq) = {
            let shared = lock(&shared);
            (shared.cart.clone(), shared.seq)
        };
        // Mutations are rejected before hydration, so the cart is present
        // whenever a nudge arrives
        let Some(cart) = cart else { continue };

        match serde_json::to_vec(&cart) {
            Ok(bytes) => match store.set(STORAGE_KEY, bytes).await {
                Ok(()) => {
                    debug!(seq, items = cart.len(), "Persisted cart snapshot");
                    durability_tx.send_if_modified(|d| match d {
                        Durability::Ok => false,
                        Durability::Degraded { .. } => {
                            *d = Durability::Ok;
                            true
                        }
                    });
                }
                Err(e) => {
                    warn!("Cart persistence failed: {e}");
                    durability_tx.send_replace(Durability::Degraded {
                        reason: e.to_string(),
                    });
                }
            },
            Err(e) => warn!("Failed to serialize cart snapshot: {e}"),
        }

        persisted_tx.send_replace(seq);
    }
}
