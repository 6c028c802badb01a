// ============================================================================
// Order Errors
// ============================================================================

/// Malformed order-line syntax. Carries the offending segment verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("failed to parse item: {segment} (expected item:amount)")]
    MissingSeparator { segment: String },

    #[error("failed to parse item number in: {segment}")]
    InvalidItemNumber { segment: String },
}

impl ParseError {
    pub fn segment(&self) -> &str {
        match self {
            ParseError::MissingSeparator { segment } => segment,
            ParseError::InvalidItemNumber { segment } => segment,
        }
    }
}

/// Pricing an order against the catalogue failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TallyError {
    #[error("item {0} is not on the price list")]
    UnknownItem(u32),

    #[error("item {item} has no option {option}")]
    UnknownOption { item: u32, option: u32 },

    #[error("invalid amount for item {item}: {amount}")]
    InvalidAmount { item: u32, amount: String },

    #[error("order total is too large")]
    TotalOverflow,

    #[error("there is no pending order to check out")]
    EmptyOrder,
}
