//! The cart store: in-memory cart state synchronized to a key-value record.
//!
//! Mutations apply to memory immediately and then schedule a write of the
//! whole cart on the tokio runtime. Each mutation hands back a
//! [`PersistHandle`]; drop it to fire-and-forget, or `wait` on it to learn
//! whether the write landed.
//!
//! Every mutation is stamped with a generation number while the state lock is
//! held. A write task that finds a newer generation already on disk skips its
//! stale snapshot, so once all handles settle the stored record matches the
//! latest in-memory cart regardless of task scheduling order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use go_marketplace_core::{Cart, CartItem, NewCartItem, Price, ProductId};
use tokio::runtime::Handle;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::storage::KeyValueStore;

/// What a finished persistence task did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The snapshot for this generation was written.
    Written { generation: u64 },
    /// A newer snapshot had already been written, so this one was skipped.
    Superseded { generation: u64 },
}

impl PersistOutcome {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Written { generation } | Self::Superseded { generation } => *generation,
        }
    }
}

/// Handle to the write scheduled by a cart mutation.
///
/// Dropping the handle detaches the task; the write still happens.
#[derive(Debug)]
pub struct PersistHandle {
    generation: u64,
    task: JoinHandle<Result<PersistOutcome>>,
}

impl PersistHandle {
    /// Generation of the mutation that scheduled this write.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the write task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns the storage or serialization error the write hit, or
    /// `CartError::TaskFailed` if the task panicked or the runtime shut down.
    pub async fn wait(self) -> Result<PersistOutcome> {
        self.task
            .await
            .map_err(|e| CartError::TaskFailed(e.to_string()))?
    }

    /// Let the write finish in the background without observing it.
    pub fn detach(self) {
        drop(self);
    }
}

/// Cart state shared by every consumer.
///
/// Construct once with [`CartStore::load`] and hand clones to whatever needs
/// the cart; clones share the same state and storage.
pub struct CartStore<S> {
    inner: Arc<CartStoreInner<S>>,
}

struct CartStoreInner<S> {
    state: watch::Sender<Cart>,
    storage: Arc<S>,
    key: String,
    runtime: Handle,
    generation: AtomicU64,
    last_written: Arc<Mutex<u64>>,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("cart", &*self.inner.state.borrow())
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the cart persisted under `key` and build a store around it.
    ///
    /// Loading is best-effort: a missing record, a storage error, or a record
    /// that fails to parse all leave the cart empty. Failures are logged and
    /// never retried. Writes scheduled by later mutations run on the runtime
    /// this is awaited on.
    #[instrument(skip(storage, key), fields(key = %key.as_ref()))]
    pub async fn load(storage: S, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_owned();
        let cart = match Self::try_read(&storage, &key).await {
            Ok(cart) => {
                info!(products = cart.len(), items = cart.item_count(), "Cart loaded");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Failed to load persisted cart, starting empty");
                Cart::new()
            }
        };

        let (state, _) = watch::channel(cart);
        Self {
            inner: Arc::new(CartStoreInner {
                state,
                storage: Arc::new(storage),
                key,
                runtime: Handle::current(),
                generation: AtomicU64::new(0),
                last_written: Arc::new(Mutex::new(0)),
            }),
        }
    }

    /// Read and decode the record under `key` without touching any store.
    ///
    /// A missing record is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the backend read fails and
    /// `CartError::Serialization` if the record is not a valid cart.
    pub async fn try_read(storage: &S, key: &str) -> Result<Cart> {
        match storage.get_item(key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                debug!("No persisted cart");
                Ok(Cart::new())
            }
        }
    }

    /// Add one unit of `product`, appending it if it is not in the cart yet.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: NewCartItem) -> PersistHandle {
        self.mutate(|cart| {
            cart.add(product);
            true
        })
    }

    /// Add one unit of an item already in the cart. Unknown IDs change nothing.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn increment(&self, id: &ProductId) -> PersistHandle {
        self.mutate(|cart| cart.increment(id))
    }

    /// Remove one unit of an item, dropping it at zero. Unknown IDs change
    /// nothing.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn decrement(&self, id: &ProductId) -> PersistHandle {
        self.mutate(|cart| cart.decrement(id))
    }

    /// Apply `op` to the cart and schedule a write of the result.
    ///
    /// The write is scheduled even when `op` reports no change, so the stored
    /// record is refreshed after every call.
    fn mutate(&self, op: impl FnOnce(&mut Cart) -> bool) -> PersistHandle {
        let inner = &self.inner;
        let mut generation = 0;
        let mut snapshot = Cart::new();

        inner.state.send_if_modified(|cart| {
            let changed = op(cart);
            generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            snapshot = cart.clone();
            changed
        });

        debug!(generation, items = snapshot.item_count(), "Cart mutated");

        let task = inner.runtime.spawn(persist(
            Arc::clone(&inner.storage),
            inner.key.clone(),
            Arc::clone(&inner.last_written),
            generation,
            snapshot,
        ));

        PersistHandle { generation, task }
    }
}

impl<S> CartStore<S> {
    /// Snapshot of the products currently in the cart.
    #[must_use]
    pub fn products(&self) -> Vec<CartItem> {
        self.inner.state.borrow().items().to_vec()
    }

    /// Snapshot of the whole cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Run `f` against a snapshot of the current cart.
    ///
    /// No lock is held while `f` runs, so it may mutate the store; those
    /// changes are not visible in the snapshot it was given.
    pub fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        let cart = self.cart();
        f(&cart)
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.inner.state.borrow().item_count()
    }

    /// Sum of price times quantity across the cart.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.inner.state.borrow().subtotal()
    }

    /// Receiver that is notified after every mutation that changes the cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Key the cart record is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// The storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Generation of the most recent mutation (0 before any mutation).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }
}

async fn persist<S: KeyValueStore>(
    storage: Arc<S>,
    key: String,
    last_written: Arc<Mutex<u64>>,
    generation: u64,
    snapshot: Cart,
) -> Result<PersistOutcome> {
    let payload = serde_json::to_string(&snapshot)?;

    let mut last = last_written.lock().await;
    if *last > generation {
        debug!(generation, newest = *last, "Skipping superseded cart snapshot");
        return Ok(PersistOutcome::Superseded { generation });
    }

    if let Err(e) = storage.set_item(&key, &payload).await {
        warn!(generation, error = %e, "Failed to persist cart");
        return Err(e.into());
    }
    *last = generation;

    debug!(generation, bytes = payload.len(), "Cart persisted");
    Ok(PersistOutcome::Written { generation })
}
