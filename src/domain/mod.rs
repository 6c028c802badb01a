// ============================================================================
// Domain Layer
// ============================================================================
//
// Plain data and pure rules: users, orders, the order-line grammar and the
// catalogue. Nothing here talks to a store or a transport.
//
// ============================================================================

pub mod catalogue;
pub mod customer;
pub mod order;
