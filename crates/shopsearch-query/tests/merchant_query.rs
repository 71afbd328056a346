//! Integration tests for `MerchantQuery` against a scripted in-memory source.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shopsearch_core::{build_query_args, MerchantSummary, SearchQueryArgs, UserLocationProfile};
use shopsearch_query::{MerchantQuery, MerchantSource, QueryError, QueryExecutor};

/// Answers after a delay encoded in the search text: `"slow"` takes 300ms,
/// everything else 10ms. `"boom"` fails and `"hang"` never answers in time.
#[derive(Clone, Default)]
struct ScriptedSource {
    calls: Arc<AtomicUsize>,
}

impl MerchantSource for ScriptedSource {
    fn search(
        &self,
        args: SearchQueryArgs,
    ) -> impl Future<Output = Result<Vec<MerchantSummary>, QueryError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = args.search_name().to_owned();
        async move {
            let delay = match name.as_str() {
                "slow" => 300,
                "hang" => 60_000,
                _ => 10,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if name == "boom" {
                return Err(QueryError::Source("directory offline".to_owned()));
            }
            Ok(vec![MerchantSummary {
                id: format!("id-{name}"),
                name,
                logo: String::new(),
            }])
        }
    }
}

fn args(text: &str) -> SearchQueryArgs {
    build_query_args(text, &UserLocationProfile::default())
}

#[tokio::test(start_paused = true)]
async fn execute_marks_loading_then_publishes_results() {
    let query = MerchantQuery::new(ScriptedSource::default()).unwrap();
    let mut rx = query.subscribe();
    assert!(!rx.borrow().is_loading);

    query.execute(args("tea"));
    assert!(query.outcome().is_loading, "loading must be set synchronously");

    let outcome = rx.wait_for(|o| o.is_settled()).await.unwrap().clone();
    assert!(outcome.error.is_none());
    assert_eq!(outcome.merchants().len(), 1);
    assert_eq!(outcome.merchants()[0].name, "tea");
}

#[tokio::test(start_paused = true)]
async fn superseded_result_is_discarded() {
    let source = ScriptedSource::default();
    let query = MerchantQuery::new(source.clone()).unwrap();
    let mut rx = query.subscribe();

    query.execute(args("slow"));
    query.execute(args("fast"));

    let settled = rx.wait_for(|o| o.is_settled()).await.unwrap().clone();
    assert_eq!(settled.merchants()[0].name, "fast");

    // Let the slow request finish; it must not overwrite the newer result.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let outcome = query.outcome();
    assert!(!outcome.is_loading);
    assert_eq!(outcome.merchants()[0].name, "fast");
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn source_error_is_surfaced_unmodified() {
    let query = MerchantQuery::new(ScriptedSource::default()).unwrap();
    let mut rx = query.subscribe();

    query.execute(args("boom"));
    let outcome = rx.wait_for(|o| o.is_settled()).await.unwrap().clone();

    assert!(outcome.data.is_none());
    assert!(outcome.merchants().is_empty());
    let err = outcome.error.expect("error should be recorded");
    assert!(matches!(*err, QueryError::Source(ref msg) if msg == "directory offline"));
}

#[tokio::test(start_paused = true)]
async fn new_search_clears_previous_error() {
    let query = MerchantQuery::new(ScriptedSource::default()).unwrap();
    let mut rx = query.subscribe();

    query.execute(args("boom"));
    rx.wait_for(|o| o.is_settled()).await.unwrap();

    query.execute(args("tea"));
    let loading = query.outcome();
    assert!(loading.is_loading);
    assert!(loading.error.is_none());

    let outcome = rx.wait_for(|o| o.is_settled()).await.unwrap().clone();
    assert!(outcome.error.is_none());
    assert_eq!(outcome.merchants()[0].name, "tea");
}

#[tokio::test(start_paused = true)]
async fn slow_source_times_out() {
    let query = MerchantQuery::new(ScriptedSource::default())
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    let mut rx = query.subscribe();

    query.execute(args("hang"));
    let outcome = rx.wait_for(|o| o.is_settled()).await.unwrap().clone();

    let err = outcome.error.expect("timeout should be recorded");
    assert!(matches!(*err, QueryError::Timeout { after_ms: 5_000 }));
}

#[test]
fn new_outside_runtime_fails() {
    let result = MerchantQuery::new(ScriptedSource::default());
    assert!(matches!(result, Err(QueryError::NoRuntime)));
}
