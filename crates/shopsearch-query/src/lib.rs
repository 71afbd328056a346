//! Query-execution capability for merchant searches.
//!
//! [`QueryExecutor::execute`] is fire-and-forget. Results arrive later in an
//! observable [`QueryOutcome`] cell published through a `tokio::sync::watch`
//! channel; see [`MerchantQuery::subscribe`].

pub mod error;
pub mod executor;
pub mod outcome;
pub mod source;

pub use error::QueryError;
pub use executor::{MerchantQuery, QueryExecutor};
pub use outcome::QueryOutcome;
pub use source::MerchantSource;
