use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shopsearch_core::SearchQueryArgs;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::error::QueryError;
use crate::outcome::QueryOutcome;
use crate::source::MerchantSource;

/// Fire-and-forget trigger for a merchant search.
///
/// Callers never see the result directly; it is published separately by the
/// implementation.
pub trait QueryExecutor: Send + Sync + 'static {
    fn execute(&self, args: SearchQueryArgs);
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    fn execute(&self, args: SearchQueryArgs) {
        (**self).execute(args);
    }
}

/// [`QueryExecutor`] backed by a [`MerchantSource`], publishing into a
/// [`QueryOutcome`] cell.
///
/// Every `execute` marks the cell loading and runs the source call on the
/// Tokio runtime the query was created on. When calls overlap, only the most
/// recently issued one may write its result; earlier completions are dropped.
pub struct MerchantQuery<S> {
    source: Arc<S>,
    outcome: Arc<watch::Sender<QueryOutcome>>,
    latest_request: Arc<AtomicU64>,
    timeout: Option<Duration>,
    runtime: Handle,
}

impl<S: MerchantSource> MerchantQuery<S> {
    /// Creates a query capability bound to the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoRuntime`] when called outside a Tokio runtime.
    pub fn new(source: S) -> Result<Self, QueryError> {
        let runtime = Handle::try_current().map_err(|_| QueryError::NoRuntime)?;
        let (outcome, _) = watch::channel(QueryOutcome::default());
        Ok(Self {
            source: Arc::new(source),
            outcome: Arc::new(outcome),
            latest_request: Arc::new(AtomicU64::new(0)),
            timeout: None,
            runtime,
        })
    }

    /// Fails searches that take longer than `limit` with [`QueryError::Timeout`].
    #[must_use]
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Subscribes to outcome updates. The receiver starts at the current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryOutcome> {
        self.outcome.subscribe()
    }

    /// Snapshot of the current outcome.
    #[must_use]
    pub fn outcome(&self) -> QueryOutcome {
        self.outcome.borrow().clone()
    }
}

impl<S: MerchantSource> QueryExecutor for MerchantQuery<S> {
    fn execute(&self, args: SearchQueryArgs) {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.outcome.send_modify(|outcome| {
            outcome.is_loading = true;
            outcome.data = None;
            outcome.error = None;
        });

        tracing::debug!(
            request_id,
            location_search = args.is_location_search(),
            "executing merchant search"
        );

        let source = Arc::clone(&self.source);
        let outcome = Arc::clone(&self.outcome);
        let latest_request = Arc::clone(&self.latest_request);
        let timeout = self.timeout;

        self.runtime.spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, source.search(args))
                    .await
                    .unwrap_or_else(|_| {
                        Err(QueryError::Timeout {
                            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        })
                    }),
                None => source.search(args).await,
            };

            outcome.send_if_modified(|current| {
                if latest_request.load(Ordering::SeqCst) != request_id {
                    tracing::debug!(request_id, "discarding superseded merchant search result");
                    return false;
                }
                current.is_loading = false;
                match result {
                    Ok(merchants) => {
                        tracing::debug!(
                            request_id,
                            count = merchants.len(),
                            "merchant search settled"
                        );
                        current.data = Some(merchants);
                        current.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(request_id, error = %err, "merchant search failed");
                        current.data = None;
                        current.error = Some(Arc::new(err));
                    }
                }
                true
            });
        });
    }
}
