use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no Tokio runtime available to run the debounce timer")]
    NoRuntime,

    #[error("debounce window must be greater than zero")]
    ZeroDebounce,
}
