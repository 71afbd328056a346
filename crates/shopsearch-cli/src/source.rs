//! Merchant source answering from a YAML directory loaded at startup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shopsearch_core::{DirectoryFile, MerchantSummary, SearchQueryArgs};
use shopsearch_query::{MerchantSource, QueryError};

pub(crate) struct DirectorySource {
    directory: Arc<DirectoryFile>,
    /// Artificial delay so the loading state is visible in the terminal.
    latency: Duration,
}

impl DirectorySource {
    pub(crate) fn new(directory: DirectoryFile, latency: Duration) -> Self {
        Self {
            directory: Arc::new(directory),
            latency,
        }
    }
}

impl MerchantSource for DirectorySource {
    fn search(
        &self,
        args: SearchQueryArgs,
    ) -> impl Future<Output = Result<Vec<MerchantSummary>, QueryError>> + Send {
        let directory = Arc::clone(&self.directory);
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(directory.matching(&args))
        }
    }
}
