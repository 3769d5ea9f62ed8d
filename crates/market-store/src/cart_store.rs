//! # Cart Store
//!
//! Owns the live cart, mirrors every change to the key-value store, and
//! publishes each new cart to subscribers.
//!
//! ## Single-Writer Queue
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI / caller             CartHandle              CartStore worker       │
//! │  ───────────             ──────────              ────────────────       │
//! │                                                                         │
//! │  tap "add" ────────────► add_to_cart() ──┐                              │
//! │  tap "+" ──────────────► increment()  ───┼──► mpsc queue ──► one at a   │
//! │  tap "-" ──────────────► decrement()  ───┘                   time:      │
//! │                                                                         │
//! │                            1. read current cart (owned by worker)       │
//! │                            2. compute next cart (market-core, pure)     │
//! │                            3. write snapshot ── fails? reply Err, stop  │
//! │                            4. publish on watch channel                  │
//! │                            5. reply Ok(next) on oneshot                 │
//! │                                                                         │
//! │  listener(&cart) ◄────── Subscription ◄──── watch::Receiver<Cart>       │
//! │                                                                         │
//! │  NOTE: Steps 1-5 never interleave between operations, so two callers   │
//! │        racing on the same product both land (no lost updates).         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Hydration
//! `hydrate()` loads the stored snapshot. A mutation that reaches the worker
//! before any successful hydration hydrates first, so the first write never
//! replaces a snapshot nobody has read.

use market_core::{snapshot, Cart, CartOp, CartTotals, CatalogItem};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{CartConfig, HydrationPolicy};
use crate::error::{AccessOp, StoreError, StoreResult};
use crate::kv::KeyValueStore;

// =============================================================================
// Commands
// =============================================================================

type Reply = oneshot::Sender<StoreResult<Cart>>;

/// Messages processed by the cart worker, in arrival order.
#[derive(Debug)]
enum CartCommand {
    Hydrate { reply: Reply },
    Apply { op: CartOp, reply: Reply },
    Shutdown { reply: oneshot::Sender<()> },
}

// =============================================================================
// Cart Store (worker)
// =============================================================================

/// The cart worker. Build it, then [`start`](CartStore::start) it to get a
/// [`CartHandle`].
pub struct CartStore {
    kv: Box<dyn KeyValueStore>,
    key: String,
    policy: HydrationPolicy,
    queue_capacity: usize,
    cart: Cart,
    hydrated: bool,
    state_tx: watch::Sender<Cart>,
}

impl CartStore {
    /// Creates a worker over `kv` using the key and policy from `config`.
    pub fn new<S>(kv: S, config: &CartConfig) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let (state_tx, _) = watch::channel(Cart::new());

        CartStore {
            kv: Box::new(kv),
            key: config.storage_key(),
            policy: config.hydration(),
            queue_capacity: config.cart.queue_capacity.max(1),
            cart: Cart::new(),
            hydrated: false,
            state_tx,
        }
    }

    /// Spawns the worker loop and returns a handle.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(self) -> CartHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(self.queue_capacity);
        let state_rx = self.state_tx.subscribe();

        tokio::spawn(self.run(cmd_rx));

        CartHandle { cmd_tx, state_rx }
    }

    /// Main worker loop. Ends on `Shutdown` or when every handle is gone.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<CartCommand>) {
        info!(key = %self.key, policy = %self.policy, "Cart store started");

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                CartCommand::Hydrate { reply } => {
                    let result = self.hydrate().await;
                    // The caller has seen the decode error; later writes may
                    // replace the stored blob.
                    if matches!(result, Err(StoreError::HydrationDecode(_))) {
                        self.hydrated = true;
                    }
                    let _ = reply.send(result);
                }
                CartCommand::Apply { op, reply } => {
                    let result = self.apply(op).await;
                    let _ = reply.send(result);
                }
                CartCommand::Shutdown { reply } => {
                    info!("Cart store shutting down");
                    let _ = reply.send(());
                    break;
                }
            }
        }

        info!(items = self.cart.item_count(), "Cart store stopped");
    }

    /// Reads and decodes the stored snapshot, then publishes it.
    ///
    /// ## Outcomes
    /// - No snapshot: empty cart
    /// - Read failure: `Access` error, nothing changes, hydration can be retried
    /// - Decode failure: empty cart; `Strict` also returns `HydrationDecode`
    ///   and leaves the store unhydrated, so mutations keep failing until
    ///   an explicit `hydrate()` call has reported the error
    async fn hydrate(&mut self) -> StoreResult<Cart> {
        let raw = self.kv.read(&self.key).await?;

        let loaded = match raw {
            None => {
                debug!(key = %self.key, "No stored cart, starting empty");
                Ok(Cart::new())
            }
            Some(raw) => match snapshot::decode(&raw) {
                Ok(cart) => Ok(cart),
                Err(e) => match self.policy {
                    HydrationPolicy::Lenient => {
                        warn!(key = %self.key, error = %e, "Stored cart is unreadable, starting empty");
                        Ok(Cart::new())
                    }
                    HydrationPolicy::Strict => {
                        error!(key = %self.key, error = %e, "Stored cart is unreadable");
                        Err(StoreError::HydrationDecode(e))
                    }
                },
            },
        };

        match loaded {
            Ok(cart) => {
                self.hydrated = true;
                info!(
                    items = cart.item_count(),
                    quantity = cart.total_quantity(),
                    "Cart hydrated"
                );
                self.publish(cart.clone());
                Ok(cart)
            }
            Err(e) => {
                self.publish(Cart::new());
                Err(e)
            }
        }
    }

    /// Computes, persists, then publishes the next cart.
    ///
    /// If encoding or the write fails the current cart is kept and the
    /// error returned. Encoding rejects carts that would not decode again,
    /// such as a product with a non-finite price.
    async fn apply(&mut self, op: CartOp) -> StoreResult<Cart> {
        if !self.hydrated {
            debug!(op = op.name(), "Mutation before hydration, hydrating first");
            self.hydrate().await?;
        }

        let next = self.cart.apply(&op);

        let raw = snapshot::encode(&next)
            .map_err(|e| StoreError::access(AccessOp::Encode, &self.key, e))?;

        if let Err(e) = self.kv.write(&self.key, &raw).await {
            error!(
                op = op.name(),
                id = %op.target_id(),
                error = %e,
                "Failed to persist cart, keeping previous state"
            );
            return Err(e);
        }

        debug!(
            op = op.name(),
            id = %op.target_id(),
            items = next.item_count(),
            quantity = next.total_quantity(),
            "Cart updated"
        );

        self.publish(next.clone());
        Ok(next)
    }

    /// Replaces the current cart; subscribers are woken only on a change.
    fn publish(&mut self, next: Cart) {
        self.cart = next;

        let cart = &self.cart;
        self.state_tx.send_if_modified(|current| {
            if current != cart {
                *current = cart.clone();
                true
            } else {
                false
            }
        });
    }
}

// =============================================================================
// Cart Handle
// =============================================================================

/// Cloneable access to a running [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<CartCommand>,
    state_rx: watch::Receiver<Cart>,
}

impl CartHandle {
    /// Loads the stored cart. Call once at startup.
    pub async fn hydrate(&self) -> StoreResult<Cart> {
        self.request(|reply| CartCommand::Hydrate { reply }).await
    }

    /// Adds one unit of a product, appending it if new.
    pub async fn add_to_cart(&self, item: CatalogItem) -> StoreResult<Cart> {
        self.apply(CartOp::Add(item)).await
    }

    /// Adds one unit to the line with `id`. Unknown ids are a no-op.
    pub async fn increment(&self, id: impl Into<String>) -> StoreResult<Cart> {
        self.apply(CartOp::Increment(id.into())).await
    }

    /// Removes one unit from the line with `id`, dropping it at zero.
    /// Unknown ids are a no-op.
    pub async fn decrement(&self, id: impl Into<String>) -> StoreResult<Cart> {
        self.apply(CartOp::Decrement(id.into())).await
    }

    /// Queues any cart operation.
    pub async fn apply(&self, op: CartOp) -> StoreResult<Cart> {
        self.request(|reply| CartCommand::Apply { op, reply }).await
    }

    /// Returns the last published cart.
    pub fn current(&self) -> Cart {
        self.state_rx.borrow().clone()
    }

    /// Returns line and unit counts of the last published cart.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&*self.state_rx.borrow())
    }

    /// Returns a watch receiver over published carts.
    pub fn watch(&self) -> watch::Receiver<Cart> {
        self.state_rx.clone()
    }

    /// Calls `listener` with every cart published after this call.
    ///
    /// Bursts of changes may be coalesced: a slow listener sees the latest
    /// cart, not every intermediate one. Dropping the returned
    /// [`Subscription`] detaches the listener.
    pub fn subscribe<F>(&self, mut listener: F) -> Subscription
    where
        F: FnMut(&Cart) + Send + 'static,
    {
        let mut rx = self.state_rx.clone();
        let _ = rx.borrow_and_update();

        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let cart = rx.borrow_and_update().clone();
                listener(&cart);
            }
        });

        Subscription { task }
    }

    /// Stops the worker after the operations already queued.
    pub async fn shutdown(&self) -> StoreResult<()> {
        let (reply, done) = oneshot::channel();

        self.cmd_tx
            .send(CartCommand::Shutdown { reply })
            .await
            .map_err(|_| StoreError::ShuttingDown)?;

        done.await.map_err(|_| StoreError::ShuttingDown)
    }

    /// Returns true once the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn request(&self, command: impl FnOnce(Reply) -> CartCommand) -> StoreResult<Cart> {
        let (reply, response) = oneshot::channel();

        self.cmd_tx
            .send(command(reply))
            .await
            .map_err(|_| StoreError::ShuttingDown)?;

        response.await.map_err(|_| StoreError::ShuttingDown)?
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// A listener attached with [`CartHandle::subscribe`].
///
/// The listener stops when this is dropped or [`unsubscribe`]d.
///
/// [`unsubscribe`]: Subscription::unsubscribe
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Detaches the listener.
    pub fn unsubscribe(self) {}

    /// Returns true while the listener is attached and the store is running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
