#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoerceError {
    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Not a finite number: {0}")]
    NonFinite(f64),

    #[error("Not an integer: {0}")]
    NotAnInteger(String),

    #[error("Not a flag: {0}")]
    NotAFlag(String),
}
