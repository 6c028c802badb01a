// ============================================================================
// Order Domain
// ============================================================================
//
// - Value objects (MenuIndication, OrderItems, CustomerOrder)
// - Grammar (the `update order` mini-language)
// - Tally (pricing against the catalogue)
// - Errors (ParseError, TallyError)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod grammar;
pub mod tally;

pub use value_objects::*;
pub use errors::*;
pub use grammar::{parse_order_item, parse_update_order};
pub use tally::{describe_order, tally_order, Tally, TallyLine};
