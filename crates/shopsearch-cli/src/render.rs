//! Plain-text rendering of the search screen.

use std::fmt::Write as _;

use shopsearch_dispatch::{SearchHeading, SearchState, SearchView};
use shopsearch_query::QueryOutcome;

/// Produces a frame only when the heading or the view changed since the last one.
#[derive(Debug, Default)]
pub(crate) struct Renderer {
    last: Option<(SearchHeading, SearchView)>,
}

impl Renderer {
    pub(crate) fn frame(&mut self, state: &SearchState, outcome: &QueryOutcome) -> Option<String> {
        let heading = SearchHeading::for_text(&state.text);
        let view = SearchView::derive(state, outcome);
        let current = (heading, view);
        if self.last.as_ref() == Some(&current) {
            return None;
        }
        let frame = format_frame(&current.0, &current.1);
        self.last = Some(current);
        Some(frame)
    }
}

pub(crate) fn format_frame(heading: &SearchHeading, view: &SearchView) -> String {
    let mut out = match heading {
        SearchHeading::WithName(name) => format!("== With name \"{name}\" ==\n"),
        SearchHeading::CloseToYou => "== Close to you ==\n".to_string(),
    };
    match view {
        SearchView::Loading => out.push_str("   searching...\n"),
        SearchView::NotFound => out.push_str("   no merchants found\n"),
        SearchView::Results(merchants) => {
            for merchant in merchants {
                // Writing to a String cannot fail.
                let _ = writeln!(out, " - {} [{}]", merchant.name, merchant.id);
            }
        }
    }
    out
}
