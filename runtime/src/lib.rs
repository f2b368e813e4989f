//! # Ferry Seating Runtime
//!
//! Runtime implementation for the ferry seating editor.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation table**: Keyed handles for `Effect::Cancellable`, owned by
//!   one store so that a debounce timer in one editing session can never be
//!   superseded by another session
//!
//! ## Example
//!
//! ```ignore
//! use ferry_seating_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use ferry_seating_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// An effect execution failed
        ///
        /// This error is logged but does not halt the store.
        /// Effects are fire-and-forget operations.
        #[error("Effect execution failed: {0}")]
        EffectFailed(String),

        /// A spawned effect task panicked or was aborted
        #[error("Effect task failed: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),

        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

/// Store module - The runtime for reducers
///
/// The Store owns state, runs the reducer under a write lock, and spawns the
/// returned effects on the tokio runtime. Actions produced by effects are fed
/// back into the same store.
pub mod store {
    use super::{Arc, Effect, Reducer, RwLock};
    use crate::error::StoreError;
    use ferry_seating_core::effect::EffectId;
    use futures::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use tokio::sync::broadcast;
    use tokio::task::AbortHandle;

    /// Running cancellable effects, keyed by effect id.
    ///
    /// The generation number lets a finishing task remove its own entry
    /// without clobbering a newer registration under the same key.
    type CancellationTable = Arc<Mutex<HashMap<EffectId, (u64, AbortHandle)>>>;

    /// Decrements the pending effect counter on drop (including on abort)
    struct PendingGuard(Arc<AtomicUsize>);

    impl Drop for PendingGuard {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// The Store - runtime for a reducer
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellables: CancellationTable,
        generation: Arc<AtomicU64>,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (action_broadcast, _) = broadcast::channel(16);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellables: Arc::new(Mutex::new(HashMap::new())),
                generation: Arc::new(AtomicU64::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects
        ///
        /// `send()` returns once effects are started, not completed.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let seat_count = store.state(|s| s.grid.seat_count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Number of effects still running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Whether an effect is currently registered under `id`
        #[must_use]
        pub fn is_scheduled(&self, id: EffectId) -> bool {
            self.cancellables
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .contains_key(&id)
        }

        /// Abort every cancellable effect owned by this store
        pub fn cancel_all(&self) {
            let drained: Vec<_> = self
                .cancellables
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .drain()
                .collect();

            for (id, (_, handle)) in drained {
                tracing::debug!(effect_id = %id, "Cancelling effect");
                metrics::counter!("store.effects.cancelled").increment(1);
                handle.abort();
            }
        }

        /// Stop accepting actions and abort pending cancellable effects
        ///
        /// Effects that are not cancellable (an in-flight save, for instance)
        /// keep running, but any action they produce is rejected.
        pub fn shutdown(&self) {
            tracing::info!("Shutting down store");
            self.shutdown.store(true, Ordering::Release);
            self.cancel_all();
        }

        /// Whether `shutdown` has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        fn track(&self) -> PendingGuard {
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            PendingGuard(Arc::clone(&self.pending_effects))
        }

        async fn feed_back(&self, action: A) {
            let _ = self.action_broadcast.send(action.clone());
            if let Err(error) = self.send(action).await {
                tracing::debug!(error = %error, "Dropped action produced by effect");
            }
        }

        /// Run an effect to completion inside the current task.
        ///
        /// Used for the body of `Cancellable` and `Sequential`, where the
        /// caller needs to know when the effect is done.
        fn drive(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();
            Box::pin(async move {
                match effect {
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            store.drive(effect).await;
                        }
                    },
                    other => store.execute_effect(other),
                }
            })
        }

        /// Execute an effect
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        /// - `Cancellable`: Like its inner effect, but aborts the previous
        ///   effect registered under the same key first
        /// - `Cancel`: Aborts the effect registered under a key
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(_) | Effect::Delay { .. } | Effect::Sequential(_) => {
                    metrics::counter!("store.effects.executed", "type" => "async").increment(1);
                    let guard = self.track();
                    let task = self.drive(effect);
                    tokio::spawn(async move {
                        let _guard = guard;
                        task.await;
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
                Effect::Cancellable { id, effect } => {
                    metrics::counter!("store.effects.executed", "type" => "cancellable")
                        .increment(1);
                    self.spawn_cancellable(id, *effect);
                },
                Effect::Cancel(id) => {
                    let removed = self
                        .cancellables
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner)
                        .remove(&id);
                    if let Some((_, handle)) = removed {
                        tracing::debug!(effect_id = %id, "Cancelling effect");
                        metrics::counter!("store.effects.cancelled").increment(1);
                        handle.abort();
                    }
                },
            }
        }

        fn spawn_cancellable(&self, id: EffectId, effect: Effect<A>) {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst);
            let guard = self.track();
            let task = self.drive(effect);
            let table = Arc::clone(&self.cancellables);

            // Hold the table lock across spawn so the task cannot finish and
            // try to deregister before it is registered.
            let mut cancellables = self
                .cancellables
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);

            let handle = tokio::spawn(async move {
                let _guard = guard;
                task.await;
                let mut cancellables = table
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if cancellables.get(&id).is_some_and(|(g, _)| *g == generation) {
                    cancellables.remove(&id);
                }
            })
            .abort_handle();

            if let Some((_, previous)) = cancellables.insert(id, (generation, handle)) {
                tracing::trace!(effect_id = %id, "Superseding pending effect");
                metrics::counter!("store.effects.cancelled").increment(1);
                previous.abort();
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellables: Arc::clone(&self.cancellables),
                generation: Arc::clone(&self.generation),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use error::StoreError;
pub use store::Store;
