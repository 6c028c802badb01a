// ============================================================================
// Customer Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerError {
    #[error("unknown profile field: {0}")]
    UnknownField(String),
}
