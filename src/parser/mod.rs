//! Parser module - Decoding of the specification and order record inputs

pub mod orders;
pub mod spec;

// Re-export key functions
pub use orders::{ORDER_FIELD_COUNT, OrderReader, parse_order_fields};
pub use spec::{load_spec, parse_spec};
