//! What the search screen should show.

use shopsearch_core::{is_blank, MerchantSummary};
use shopsearch_query::QueryOutcome;

use crate::state::{Phase, SearchState};

/// Body of the search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    /// Typing has not settled yet, or the query is in flight.
    Loading,
    Results(Vec<MerchantSummary>),
    /// The query settled with no merchants, or failed.
    NotFound,
}

impl SearchView {
    /// Merges the dispatcher's pending flag with the query outcome.
    #[must_use]
    pub fn derive(state: &SearchState, outcome: &QueryOutcome) -> Self {
        if state.is_pending || outcome.is_loading {
            return Self::Loading;
        }
        match outcome.data.as_deref() {
            Some(merchants) if !merchants.is_empty() => Self::Results(merchants.to_vec()),
            _ => Self::NotFound,
        }
    }
}

/// True once nothing is left in flight: no armed timer or handoff, no
/// unsent keystroke and no loading query.
///
/// Read `phase` before `state` and `outcome`. The dispatcher only returns to
/// `Idle` after the executor has marked its outcome loading, so that order
/// cannot pair an `Idle` phase with the previous search's outcome.
#[must_use]
pub fn search_settled(phase: Phase, state: &SearchState, outcome: &QueryOutcome) -> bool {
    matches!(phase, Phase::Idle | Phase::Cancelled) && !state.is_pending && outcome.is_settled()
}

/// Caption above the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHeading {
    /// Merchants matching the typed name.
    WithName(String),
    /// Merchants near the user's stored location.
    CloseToYou,
}

impl SearchHeading {
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        if is_blank(text) {
            Self::CloseToYou
        } else {
            Self::WithName(text.to_owned())
        }
    }
}
