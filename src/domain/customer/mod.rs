// ============================================================================
// Customer Domain
// ============================================================================
//
// - Value objects (UserInfo, ProfileField)
// - Errors (CustomerError)
//
// ============================================================================

pub mod value_objects;
pub mod errors;

pub use value_objects::*;
pub use errors::*;
