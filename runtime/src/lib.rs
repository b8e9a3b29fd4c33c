//! # Airseat Runtime
//!
//! Runtime implementation for the Airseat reducer architecture.
//!
//! Domain aggregates are single-threaded values; the [`Store`] is the
//! mutual-exclusion layer callers put around them. One store owns one piece
//! of state (for example one flight's seat inventory) behind an async
//! `RwLock`, so concurrent bookers are serialized at the reducer.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//!
//! ## Example
//!
//! ```ignore
//! use airseat_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use airseat_core::{effect::Effect, reducer::Reducer};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub use error::StoreError;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// A task join error occurred while waiting for effects
        ///
        /// This typically means a spawned effect task panicked.
        #[error("Effect task failed: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),

        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

/// Handle to the effects started by a single `send()`
///
/// `send()` returns once the reducer has run; effects keep running in the
/// background. Await [`EffectHandle::wait`] to block until they are done.
#[derive(Debug)]
pub struct EffectHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl EffectHandle {
    /// Number of effect tasks still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Wait for every effect started by the originating `send()`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskJoinError`] if an effect task panicked.
    pub async fn wait(self) -> Result<(), StoreError> {
        for task in self.tasks {
            task.await?;
        }
        Ok(())
    }
}

/// Decrements the store's pending-effect counter when an effect task ends
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, BoxFuture, Duration, Effect, EffectHandle, Ordering,
        PendingGuard, Reducer, RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a store is cheap and every clone shares the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Spawns the returned effects
        ///
        /// Concurrent `send()` calls serialize at the reducer, so the state
        /// never observes two actions at once.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            let mut tasks = Vec::new();
            for effect in effects {
                if effect.is_noop() {
                    continue;
                }

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let guard = PendingGuard(Arc::clone(&self.pending_effects));
                let run = self.execute_effect(effect);

                tasks.push(tokio::spawn(async move {
                    let _guard = guard;
                    run.await;
                }));
            }

            Ok(EffectHandle { tasks })
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let remaining = store.state(|s| s.flight.remaining_number_of_seats()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Stop accepting actions and wait for running effects to finish
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// when `timeout` elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);
                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Whether `shutdown()` has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Build the future that runs one effect to completion
        ///
        /// Actions produced by `Effect::Future` are fed back through `send()`.
        fn execute_effect(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            match effect {
                Effect::None => Box::pin(async {}),
                Effect::Future(fut) => {
                    let store = self.clone();
                    Box::pin(async move {
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped action produced by effect");
                            }
                        }
                    })
                }
                Effect::Parallel(effects) => {
                    let runs: Vec<_> = effects
                        .into_iter()
                        .map(|effect| self.execute_effect(effect))
                        .collect();
                    Box::pin(async move {
                        futures::future::join_all(runs).await;
                    })
                }
                Effect::Sequential(effects) => {
                    let store = self.clone();
                    Box::pin(async move {
                        for effect in effects {
                            store.execute_effect(effect).await;
                        }
                    })
                }
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use airseat_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, Default)]
    struct TallyState {
        total: u32,
        echoes: u32,
    }

    #[derive(Debug, Clone)]
    enum TallyAction {
        Add(u32),
        AddThenEcho(u32),
        AddThenEchoTwice(u32),
        Echo,
        Stall,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    smallvec![Effect::None]
                }
                TallyAction::AddThenEcho(n) => {
                    state.total += n;
                    smallvec![Effect::future(async { Some(TallyAction::Echo) })]
                }
                TallyAction::AddThenEchoTwice(n) => {
                    state.total += n;
                    smallvec![Effect::chain(vec![
                        Effect::future(async { Some(TallyAction::Echo) }),
                        Effect::merge(vec![
                            Effect::future(async { Some(TallyAction::Echo) }),
                            Effect::future(async { None }),
                        ]),
                    ])]
                }
                TallyAction::Echo => {
                    state.echoes += 1;
                    SmallVec::new()
                }
                TallyAction::Stall => smallvec![Effect::future(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    None
                })],
            }
        }
    }

    #[tokio::test]
    async fn send_applies_action_under_lock() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let handle = store.send(TallyAction::Add(3)).await.unwrap();
        assert_eq!(handle.pending(), 0);
        handle.wait().await.unwrap();

        assert_eq!(store.state(|s| s.total).await, 3);
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        store.send(TallyAction::AddThenEcho(1)).await.unwrap().wait().await.unwrap();

        assert_eq!(store.state(|s| (s.total, s.echoes)).await, (1, 1));
    }

    #[tokio::test]
    async fn sequential_and_parallel_effects_all_run() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        store
            .send(TallyAction::AddThenEchoTwice(2))
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert_eq!(store.state(|s| (s.total, s.echoes)).await, (2, 2));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let other = store.clone();

        other.send(TallyAction::Add(5)).await.unwrap();

        assert_eq!(store.state(|s| s.total).await, 5);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert!(store.is_shutting_down());

        let result = store.send(TallyAction::Add(1)).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert_eq!(store.state(|s| s.total).await, 0);
    }

    #[tokio::test]
    async fn shutdown_times_out_on_stuck_effect() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let handle = store.send(TallyAction::Stall).await.unwrap();
        assert_eq!(handle.pending(), 1);

        let result = store.shutdown(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
    }
}
