/// Text-field state owned by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub text: String,
    /// Set on every keystroke and cleared when the debounced search is sent.
    pub is_pending: bool,
}

/// Lifecycle of a [`crate::SearchDispatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No timer armed.
    #[default]
    Idle,
    /// A debounce timer is armed.
    Pending,
    /// The timer fired and the location is being read. Transient: the
    /// dispatcher is back to `Idle` once the executor has taken the search and
    /// the pending flag is cleared.
    Dispatched,
    /// Disposed. Terminal.
    Cancelled,
}
