use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown address field: {0}")]
    UnknownField(String),
}
