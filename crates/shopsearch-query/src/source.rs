use std::future::Future;

use shopsearch_core::{MerchantSummary, SearchQueryArgs};

use crate::error::QueryError;

/// Where merchant searches are actually answered.
///
/// Implementations own the transport. [`crate::MerchantQuery`] only needs a
/// future that resolves to the merchant list or an error.
pub trait MerchantSource: Send + Sync + 'static {
    fn search(
        &self,
        args: SearchQueryArgs,
    ) -> impl Future<Output = Result<Vec<MerchantSummary>, QueryError>> + Send;
}
