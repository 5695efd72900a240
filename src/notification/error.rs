#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifierError {
    #[error("unknown notification policy: {0}")]
    InvalidPolicy(String),
}
