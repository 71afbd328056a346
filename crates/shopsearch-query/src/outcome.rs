use std::sync::Arc;

use shopsearch_core::MerchantSummary;

use crate::error::QueryError;

/// Observable state of the most recent merchant search.
///
/// `data` is `None` until a search has succeeded and while a newer one is
/// loading. Errors are shared behind an `Arc` so the cell stays cheap to clone
/// for every observer.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub is_loading: bool,
    pub data: Option<Vec<MerchantSummary>>,
    pub error: Option<Arc<QueryError>>,
}

impl QueryOutcome {
    /// The result list, or an empty slice when there is none.
    #[must_use]
    pub fn merchants(&self) -> &[MerchantSummary] {
        self.data.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}
