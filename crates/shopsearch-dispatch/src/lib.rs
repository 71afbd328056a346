//! Debounced search dispatch for the merchant search screen.
//!
//! [`SearchDispatcher`] turns text-field input into at most one merchant
//! query per pause in typing. Presentation code observes the dispatcher's
//! [`SearchState`] and the query capability's outcome, and renders whatever
//! [`SearchView::derive`] returns.

pub mod dispatcher;
pub mod error;
pub mod location;
pub mod state;
pub mod view;

pub use dispatcher::{SearchDispatcher, DEFAULT_DEBOUNCE};
pub use error::DispatchError;
pub use location::LocationSource;
pub use state::{Phase, SearchState};
pub use view::{search_settled, SearchHeading, SearchView};
