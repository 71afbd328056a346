use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use shopsearch_core::build_query_args;
use shopsearch_query::QueryExecutor;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::DispatchError;
use crate::location::LocationSource;
use crate::state::{Phase, SearchState};

/// Quiet period after the last keystroke before a search is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounced search dispatcher for one search screen.
///
/// Every keystroke marks the state pending and restarts a debounce timer.
/// Only the timer armed by the most recent keystroke may fire; when it does,
/// the dispatcher builds the query arguments (reading the user's location at
/// that moment), hands the arguments to the [`QueryExecutor`] and then clears
/// the pending flag. The dispatcher never looks at the query's result.
///
/// Dropping the dispatcher disposes it.
pub struct SearchDispatcher<Q, L>
where
    Q: QueryExecutor,
    L: LocationSource,
{
    inner: Arc<Inner<Q, L>>,
}

struct Inner<Q, L> {
    executor: Q,
    location: L,
    debounce: Duration,
    runtime: Handle,
    state: watch::Sender<SearchState>,
    timer: Mutex<Timer>,
}

/// Debounce bookkeeping. `generation` increases with every arm, and a firing
/// timer only dispatches if its generation is still the current one.
#[derive(Default)]
struct Timer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
    phase: Phase,
}

impl Timer {
    fn is_current(&self, generation: u64) -> bool {
        self.phase != Phase::Cancelled && self.generation == generation
    }
}

impl<Q, L> SearchDispatcher<Q, L>
where
    Q: QueryExecutor,
    L: LocationSource,
{
    /// Creates an idle dispatcher with the default 500ms debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoRuntime`] when called outside a Tokio runtime.
    pub fn new(executor: Q, location: L) -> Result<Self, DispatchError> {
        Self::with_debounce(executor, location, DEFAULT_DEBOUNCE)
    }

    /// Creates an idle dispatcher with a custom debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ZeroDebounce`] for a zero window and
    /// [`DispatchError::NoRuntime`] when called outside a Tokio runtime.
    pub fn with_debounce(
        executor: Q,
        location: L,
        debounce: Duration,
    ) -> Result<Self, DispatchError> {
        if debounce.is_zero() {
            return Err(DispatchError::ZeroDebounce);
        }
        let runtime = Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;
        let (state, _) = watch::channel(SearchState::default());

        Ok(Self {
            inner: Arc::new(Inner {
                executor,
                location,
                debounce,
                runtime,
                state,
                timer: Mutex::new(Timer::default()),
            }),
        })
    }

    /// Screen mounted: schedules the initial location search for the empty
    /// text. The pending flag is left alone.
    pub fn mount(&self) {
        let mut timer = self.inner.lock_timer();
        if timer.phase == Phase::Cancelled {
            return;
        }
        let text = self.inner.state.borrow().text.clone();
        self.inner.schedule_dispatch(&mut timer, text);
    }

    /// Keystroke handler. Marks the state pending and stores `text` right
    /// away, then restarts the debounce window. Ignored after [`Self::dispose`].
    pub fn on_text_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let mut timer = self.inner.lock_timer();
        if timer.phase == Phase::Cancelled {
            tracing::debug!("search input after dispose ignored");
            return;
        }

        self.inner.state.send_modify(|state| {
            state.text.clone_from(&text);
            state.is_pending = true;
        });
        self.inner.schedule_dispatch(&mut timer, text);
    }

    /// Screen unmounted: cancels any armed timer. No query is sent by this
    /// dispatcher afterwards.
    pub fn dispose(&self) {
        let mut timer = self.inner.lock_timer();
        if timer.phase == Phase::Cancelled {
            return;
        }
        if let Some(handle) = timer.handle.take() {
            handle.abort();
            tracing::debug!(generation = timer.generation, "pending search cancelled on dispose");
        }
        timer.phase = Phase::Cancelled;
    }

    /// Snapshot of the current text and pending flag.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to state changes. The receiver starts at the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.lock_timer().phase
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }
}

impl<Q, L> Drop for SearchDispatcher<Q, L>
where
    Q: QueryExecutor,
    L: LocationSource,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<Q, L> Inner<Q, L>
where
    Q: QueryExecutor,
    L: LocationSource,
{
    fn lock_timer(&self) -> MutexGuard<'_, Timer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancels the armed timer, if any, and arms a new one for `text`.
    fn schedule_dispatch(self: &Arc<Self>, timer: &mut Timer, text: String) {
        if let Some(previous) = timer.handle.take() {
            previous.abort();
        }
        timer.generation += 1;
        timer.phase = Phase::Pending;

        let generation = timer.generation;
        let delay = self.debounce;
        let weak: Weak<Self> = Arc::downgrade(self);
        timer.handle = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire(generation, &text);
            }
        }));
    }

    /// Hands the search for `text` to the executor if `generation` is still
    /// the newest armed timer.
    ///
    /// The location is read without holding the timer lock. The generation is
    /// checked again afterwards, so a keystroke or dispose that lands during
    /// the read wins. The pending flag is only cleared once the executor has
    /// taken the search, so a watcher always sees either the pending flag or
    /// the query's loading flag.
    fn fire(&self, generation: u64, text: &str) {
        {
            let mut timer = self.lock_timer();
            if !timer.is_current(generation) {
                tracing::debug!(
                    generation,
                    current = timer.generation,
                    "stale debounce timer skipped"
                );
                return;
            }
            timer.handle = None;
            timer.phase = Phase::Dispatched;
        }

        let profile = self.location.current();
        let args = build_query_args(text, &profile);

        let mut timer = self.lock_timer();
        if timer.phase != Phase::Dispatched || timer.generation != generation {
            tracing::debug!(generation, "search superseded while reading location");
            return;
        }
        tracing::debug!(
            generation,
            location_search = args.is_location_search(),
            "dispatching merchant search"
        );
        self.executor.execute(args);
        self.state.send_modify(|state| state.is_pending = false);
        timer.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use shopsearch_core::{SearchQueryArgs, UserLocationProfile};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<SearchQueryArgs>>,
    }

    impl QueryExecutor for Recorder {
        fn execute(&self, args: SearchQueryArgs) {
            self.calls.lock().unwrap().push(args);
        }
    }

    #[test]
    fn new_outside_runtime_fails() {
        let result = SearchDispatcher::new(Recorder::default(), UserLocationProfile::default());
        assert!(matches!(result, Err(DispatchError::NoRuntime)));
    }

    #[tokio::test]
    async fn zero_debounce_is_rejected() {
        let result = SearchDispatcher::with_debounce(
            Recorder::default(),
            UserLocationProfile::default(),
            Duration::ZERO,
        );
        assert!(matches!(result, Err(DispatchError::ZeroDebounce)));
    }

    #[tokio::test(start_paused = true)]
    async fn new_dispatcher_is_idle() {
        let dispatcher =
            SearchDispatcher::new(Recorder::default(), UserLocationProfile::default()).unwrap();
        assert_eq!(dispatcher.phase(), Phase::Idle);
        assert_eq!(dispatcher.state(), SearchState::default());
        assert_eq!(dispatcher.debounce(), DEFAULT_DEBOUNCE);
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_moves_to_pending_and_back_to_idle() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher =
            SearchDispatcher::new(Arc::clone(&recorder), UserLocationProfile::default()).unwrap();

        dispatcher.on_text_changed("tea");
        assert_eq!(dispatcher.phase(), Phase::Pending);

        tokio::time::sleep(Duration::from_millis(501)).await;
        assert_eq!(dispatcher.phase(), Phase::Idle);
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
    }

    type PhaseCheck = Box<dyn Fn() -> Phase + Send + Sync>;

    /// Location source that asks the dispatcher for its phase while being read.
    struct CallbackLocation {
        check: Arc<OnceLock<PhaseCheck>>,
        seen: Arc<Mutex<Vec<Phase>>>,
    }

    impl LocationSource for CallbackLocation {
        fn current(&self) -> UserLocationProfile {
            if let Some(check) = self.check.get() {
                self.seen.lock().unwrap().push(check());
            }
            UserLocationProfile::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn location_may_call_back_into_the_dispatcher() {
        let check: Arc<OnceLock<PhaseCheck>> = Arc::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::new(Recorder::default());
        let location = CallbackLocation {
            check: Arc::clone(&check),
            seen: Arc::clone(&seen),
        };
        let dispatcher = Arc::new(SearchDispatcher::new(Arc::clone(&recorder), location).unwrap());
        let weak = Arc::downgrade(&dispatcher);
        assert!(check
            .set(Box::new(move || weak.upgrade().map_or(Phase::Cancelled, |d| d.phase())))
            .is_ok());

        dispatcher.on_text_changed("tea");
        tokio::time::sleep(Duration::from_millis(501)).await;

        assert_eq!(*seen.lock().unwrap(), vec![Phase::Dispatched]);
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
        assert_eq!(dispatcher.phase(), Phase::Idle);
        assert!(!dispatcher.state().is_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_is_terminal_and_idempotent() {
        let dispatcher =
            SearchDispatcher::new(Recorder::default(), UserLocationProfile::default()).unwrap();
        dispatcher.dispose();
        dispatcher.dispose();
        assert_eq!(dispatcher.phase(), Phase::Cancelled);

        dispatcher.on_text_changed("late");
        dispatcher.mount();
        assert_eq!(dispatcher.phase(), Phase::Cancelled);
        assert_eq!(dispatcher.state(), SearchState::default());
    }
}
