//! Errors raised by the client when the controller cannot be reached.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("Controller closed")]
    Closed,
    #[error("Controller dropped response channel")]
    Dropped,
}
